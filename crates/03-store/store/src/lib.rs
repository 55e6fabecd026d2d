//! Store owning the application state and the reducer that advances it.
//!
//! A [`Store`] is created explicitly with a reducer and a [`StoreConfig`],
//! dispatches the init action once, and afterwards applies one action at a
//! time. Readers take cheap `Arc` snapshots of the current state without
//! blocking dispatch.

/// Store configuration values.
pub mod config;
/// Store error types.
pub mod error;
/// Dispatch loop, subscriptions, and reducer replacement.
pub mod store;

pub use crate::config::StoreConfig;
pub use crate::error::{StoreError, StoreResult};
pub use crate::store::{Store, StoreStats, SubscriptionId};
pub use reducer::{Action, Reducer, TryReducer};
