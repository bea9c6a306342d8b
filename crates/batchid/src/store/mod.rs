mod memory;

pub use memory::*;

use crate::{CounterState, Result, StoreError};
#[cfg(feature = "futures")]
use core::future::Future;

/// Contract between a generator and the shared counter store.
///
/// Implementations are expected to be remote (a document database, a SQL
/// table, a KV namespace); the generator only ever touches them through this
/// trait. The crate ships [`MemoryStore`] as the in-process reference
/// implementation.
///
/// ## First access
///
/// [`counter_state`] must create and durably persist a default record the
/// first time a scope is seen. Creation must be safe under concurrent first
/// access from multiple processes: at most one creation wins, and a loser
/// swallows the "record already exists" signal, either re-reading the winning
/// record or returning the default it just computed. The lenient option means
/// a loser whose configured starting number differs may observe its own value
/// once; implementations that need strict agreement should re-read.
///
/// [`counter_state`]: OptimisticStore::counter_state
pub trait OptimisticStore {
    /// Reads the persisted counter state for `scope`, creating a default
    /// record on first access.
    fn counter_state(&self, scope: &str) -> Result<CounterState, StoreError>;

    /// Attempts to persist `state`, keyed on the version token it carries.
    ///
    /// Returns `Ok(true)` when the write applied, and `Ok(false)` when the
    /// token was stale: a lost race, not an error, signalling the caller to
    /// re-read and retry. Every other failure (connectivity, authorization,
    /// malformed record) uses the `Err` channel and is never retried by the
    /// generator.
    fn try_write(&self, state: &CounterState) -> Result<bool, StoreError>;
}

// Lets a generator borrow a store owned elsewhere, e.g. one shared between a
// blocking and an async generator.
impl<S> OptimisticStore for &S
where
    S: OptimisticStore,
{
    fn counter_state(&self, scope: &str) -> Result<CounterState, StoreError> {
        (**self).counter_state(scope)
    }

    fn try_write(&self, state: &CounterState) -> Result<bool, StoreError> {
        (**self).try_write(state)
    }
}

/// Async twin of [`OptimisticStore`], identical in behavior and differing only
/// in suspension semantics.
#[cfg(feature = "futures")]
pub trait AsyncOptimisticStore {
    /// See [`OptimisticStore::counter_state`].
    fn counter_state(&self, scope: &str)
    -> impl Future<Output = Result<CounterState, StoreError>> + Send;

    /// See [`OptimisticStore::try_write`].
    fn try_write(&self, state: &CounterState) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

#[cfg(feature = "futures")]
impl<S> AsyncOptimisticStore for &S
where
    S: AsyncOptimisticStore + Sync,
{
    fn counter_state(
        &self,
        scope: &str,
    ) -> impl Future<Output = Result<CounterState, StoreError>> + Send {
        (**self).counter_state(scope)
    }

    fn try_write(&self, state: &CounterState) -> impl Future<Output = Result<bool, StoreError>> + Send {
        (**self).try_write(state)
    }
}
