//! Reducer primitives shared by every state slice and the store.
//!
//! The crate stays deliberately small: an [`Action`] descriptor, the typed
//! [`Reducer`] trait, its fallible counterpart [`TryReducer`], and a dynamic
//! [`CombinedReducer`] that composes JSON-backed slices under named keys.

/// Action descriptors dispatched to reducers.
pub mod action;
/// Dynamic composition of named slice reducers.
pub mod combine;
/// Error types for slice and composition failures.
pub mod error;
/// Typed reducer traits and adapters.
pub mod reduce;
/// Composite state shape descriptors.
pub mod shape;
/// Object-safe JSON slice reducers.
pub mod slice;

pub use crate::action::Action;
pub use crate::combine::{combine_reducers, CombinedReducer, CombinedReducerBuilder};
pub use crate::error::{CombineError, CombineResult, SliceError};
pub use crate::reduce::{FnReducer, Reducer, TryReducer};
pub use crate::shape::StateShape;
pub use crate::slice::{erase, JsonSlice, SliceReducer};
