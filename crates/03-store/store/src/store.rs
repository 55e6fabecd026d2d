//! Dispatch loop over a single reducer.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use arc_swap::ArcSwap;
use log::{debug, trace};
use parking_lot::{Mutex, MutexGuard, ReentrantMutex, RwLock};
use reducer::{Action, TryReducer};
use smallvec::SmallVec;
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Dispatch counters accumulated over the life of a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Actions successfully reduced, excluding the init action.
    pub dispatched: u64,
    /// Dispatches whose resulting state equalled the previous one.
    pub unchanged: u64,
    /// Individual listener invocations.
    pub notifications: u64,
}

/// Outcome of one reducer run, carried from the dispatch lock to notification.
struct Reduced<S> {
    state: Arc<S>,
    version: u64,
    changed: bool,
}

#[derive(Default)]
struct Counters {
    dispatched: AtomicU64,
    unchanged: AtomicU64,
    notifications: AtomicU64,
}

/// Owns the current state and applies actions to it through a reducer.
///
/// Dispatches are serialized. A reducer that dispatches into its own store
/// gets [`StoreError::ReentrantDispatch`]; listeners run after the reducer
/// has finished and may dispatch freely. Listeners see states in publish
/// order: a state superseded before it reached them is not delivered.
pub struct Store<R: TryReducer> {
    config: StoreConfig,
    reducer: RwLock<Arc<R>>,
    state: ArcSwap<R::State>,
    version: AtomicU64,
    dispatch_lock: Mutex<()>,
    reducing_on: Mutex<Option<ThreadId>>,
    notify_lock: ReentrantMutex<Cell<u64>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<R::State>)>>,
    next_subscription: AtomicU64,
    counters: Counters,
}

impl<R> Store<R>
where
    R: TryReducer,
    R::State: PartialEq,
{
    /// Creates a store whose initial state is the reducer's output for the
    /// init action with no previous state.
    pub fn new(reducer: R, config: StoreConfig) -> StoreResult<Self> {
        Self::build(reducer, None, config)
    }

    /// Creates a store seeded with `preloaded`, still passed through the init action.
    pub fn with_state(reducer: R, preloaded: R::State, config: StoreConfig) -> StoreResult<Self> {
        Self::build(reducer, Some(preloaded), config)
    }

    fn build(reducer: R, preloaded: Option<R::State>, config: StoreConfig) -> StoreResult<Self> {
        let initial = reducer
            .try_reduce(preloaded.as_ref(), &Action::init())
            .map_err(StoreError::reducer)?;
        debug!(
            "{}: store initialised (preloaded: {})",
            config.name,
            preloaded.is_some()
        );

        Ok(Self {
            config,
            reducer: RwLock::new(Arc::new(reducer)),
            state: ArcSwap::from_pointee(initial),
            version: AtomicU64::new(0),
            dispatch_lock: Mutex::new(()),
            reducing_on: Mutex::new(None),
            notify_lock: ReentrantMutex::new(Cell::new(0)),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            counters: Counters::default(),
        })
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> Arc<R::State> {
        self.state.load_full()
    }

    /// Configuration the store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Applies `action` and returns the resulting state.
    ///
    /// When the reducer yields a state equal to the previous one the previous
    /// `Arc` is returned and kept, so callers can detect no-ops with
    /// [`Arc::ptr_eq`]. On reducer failure the state is left untouched.
    pub fn dispatch(&self, action: Action) -> StoreResult<Arc<R::State>> {
        if action.kind().is_empty() {
            return Err(StoreError::InvalidAction("action type must not be empty"));
        }
        if self.config.log_actions {
            debug!("{}: dispatch {action}", self.config.name);
        }

        let serial = self.serialize(&action)?;
        let reduced = self.reduce(&action)?;
        drop(serial);
        Ok(self.publish(&action, reduced))
    }

    /// Takes the dispatch lock, refusing a reducer that dispatches into its own store.
    fn serialize(&self, action: &Action) -> StoreResult<MutexGuard<'_, ()>> {
        if *self.reducing_on.lock() == Some(thread::current().id()) {
            return Err(StoreError::ReentrantDispatch {
                action: action.kind().to_owned(),
            });
        }
        Ok(self.dispatch_lock.lock())
    }

    /// Runs the reducer and stores a changed result. Caller holds the dispatch lock.
    fn reduce(&self, action: &Action) -> StoreResult<Reduced<R::State>> {
        let _marker = ReducingMarker::enter(&self.reducing_on, thread::current().id());

        let reducer = Arc::clone(&self.reducer.read());
        let previous = self.state.load_full();
        let next = reducer
            .try_reduce(Some(&*previous), action)
            .map_err(StoreError::reducer)?;

        if next == *previous {
            return Ok(Reduced {
                state: previous,
                version: self.version.load(Ordering::Acquire),
                changed: false,
            });
        }

        let next = Arc::new(next);
        self.state.store(Arc::clone(&next));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        Ok(Reduced {
            state: next,
            version,
            changed: true,
        })
    }

    fn publish(&self, action: &Action, reduced: Reduced<R::State>) -> Arc<R::State> {
        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        if !reduced.changed {
            self.counters.unchanged.fetch_add(1, Ordering::Relaxed);
            trace!("{}: {} left state unchanged", self.config.name, action.kind());
        }

        if reduced.changed || self.config.notify_unchanged {
            self.notify(&reduced.state, reduced.version);
        }
        reduced.state
    }

    /// Delivers `state` unless a newer state has already reached the listeners.
    ///
    /// Deliveries are serialized, so listeners never observe versions going
    /// backwards. A listener that dispatches on its own thread re-enters here
    /// and its newer state cuts the stale delivery short.
    fn notify(&self, state: &Arc<R::State>, version: u64) {
        let delivered = self.notify_lock.lock();
        let snapshot: SmallVec<[Listener<R::State>; 4]> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let mut calls = 0u64;
        for listener in &snapshot {
            if delivered.get() > version {
                trace!("{}: skipping stale notification v{version}", self.config.name);
                break;
            }
            delivered.set(version);
            listener(state);
            calls += 1;
        }
        self.counters.notifications.fetch_add(calls, Ordering::Relaxed);
    }

    /// Registers `listener`, called with the new state after each dispatch.
    ///
    /// Listeners added or removed while a notification is in flight take
    /// effect from the next dispatch.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Arc<R::State>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Swaps in a new reducer and dispatches the replace action through it.
    ///
    /// No other dispatch runs between the swap and the replace action. If the
    /// new reducer fails on it, or the call comes from inside a reducer, the
    /// previous reducer stays installed.
    pub fn replace_reducer(&self, reducer: R) -> StoreResult<Arc<R::State>> {
        let action = Action::replace();
        let serial = self.serialize(&action)?;

        let previous = std::mem::replace(&mut *self.reducer.write(), Arc::new(reducer));
        let reduced = match self.reduce(&action) {
            Ok(reduced) => reduced,
            Err(err) => {
                *self.reducer.write() = previous;
                return Err(err);
            }
        };
        drop(serial);

        debug!("{}: reducer replaced", self.config.name);
        Ok(self.publish(&action, reduced))
    }

    /// Snapshot of the dispatch counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            dispatched: self.counters.dispatched.load(Ordering::Relaxed),
            unchanged: self.counters.unchanged.load(Ordering::Relaxed),
            notifications: self.counters.notifications.load(Ordering::Relaxed),
        }
    }
}

impl<R> fmt::Debug for Store<R>
where
    R: TryReducer,
    R::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.config.name)
            .field("state", &self.state.load_full())
            .finish_non_exhaustive()
    }
}

/// Records which thread is inside the reducer; cleared on drop, including unwinds.
struct ReducingMarker<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> ReducingMarker<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>, thread: ThreadId) -> Self {
        *slot.lock() = Some(thread);
        Self { slot }
    }
}

impl Drop for ReducingMarker<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}
