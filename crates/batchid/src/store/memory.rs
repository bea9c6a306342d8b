use std::collections::HashMap;

use crate::{
    CounterState, OptimisticStore, Result, StoreError, VersionToken,
    mutex::{self, Mutex},
};
#[cfg(feature = "futures")]
use crate::AsyncOptimisticStore;

#[derive(Debug)]
struct Record {
    next_available: i64,
    revision: u64,
}

/// In-process [`OptimisticStore`] backend.
///
/// Serves as the reference implementation of the store contract and as the
/// backend for tests and single-process use. Revisions play the role of the
/// version token, so a `try_write` carrying a token from before another
/// writer's commit is rejected with `Ok(false)` exactly like a remote store
/// would reject a stale entity tag.
///
/// State lives in one process; it offers no cross-process coordination.
///
/// # Example
///
/// ```
/// use batchid::{MemoryStore, UniqueIdGenerator};
///
/// let store = MemoryStore::new().initial_value("invoices", 1000);
/// let generator = UniqueIdGenerator::new(store);
/// assert_eq!(generator.next_id("invoices")?, 1000);
/// assert_eq!(generator.next_id("orders")?, 1);
/// # Ok::<(), batchid::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Record>>,
    initial_values: HashMap<String, i64>,
}

impl MemoryStore {
    /// Creates an empty store. Records are created lazily, on first read of a
    /// scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first number handed out for `scope`.
    ///
    /// Applies only when the scope's record is first created; it never rewinds
    /// an existing record.
    pub fn initial_value(mut self, scope: impl Into<String>, first: i64) -> Self {
        self.initial_values.insert(scope.into(), first);
        self
    }

    fn read_or_create(&self, scope: &str) -> Result<CounterState, StoreError> {
        let mut records = self.records()?;
        let record = records.entry(scope.to_owned()).or_insert_with(|| Record {
            next_available: self.initial_values.get(scope).copied().unwrap_or(1),
            revision: 0,
        });
        Ok(CounterState::new(
            scope,
            record.next_available,
            record.revision.to_string(),
        ))
    }

    fn write_if_current(&self, state: &CounterState) -> Result<bool, StoreError> {
        let mut records = self.records()?;
        let record = records.get_mut(&state.scope).ok_or_else(|| {
            StoreError::new(format!("no counter record for scope `{}`", state.scope))
        })?;

        if VersionToken::from(record.revision.to_string()) != state.version {
            return Ok(false);
        }

        record.next_available = state.next_available;
        record.revision += 1;
        Ok(true)
    }

    fn records(&self) -> Result<mutex::MutexGuard<'_, HashMap<String, Record>>, StoreError> {
        mutex::lock(&self.records).map_err(|_| StoreError::new("memory store lock poisoned"))
    }
}

impl OptimisticStore for MemoryStore {
    fn counter_state(&self, scope: &str) -> Result<CounterState, StoreError> {
        self.read_or_create(scope)
    }

    fn try_write(&self, state: &CounterState) -> Result<bool, StoreError> {
        self.write_if_current(state)
    }
}

#[cfg(feature = "futures")]
impl AsyncOptimisticStore for MemoryStore {
    async fn counter_state(&self, scope: &str) -> Result<CounterState, StoreError> {
        self.read_or_create(scope)
    }

    async fn try_write(&self, state: &CounterState) -> Result<bool, StoreError> {
        self.write_if_current(state)
    }
}

#[cfg(test)]
mod tests {
    // `AsyncOptimisticStore` stays out of scope so the method calls below
    // resolve unambiguously to the blocking trait.
    use super::MemoryStore;
    use crate::{CounterState, OptimisticStore, StoreError};
    use std::collections::HashMap;

    #[test]
    fn records_are_created_lazily_with_configured_defaults() -> Result<(), StoreError> {
        let store = MemoryStore::new().initial_value("invoices", 500);

        assert_eq!(store.counter_state("invoices")?.next_available, 500);
        assert_eq!(store.counter_state("orders")?.next_available, 1);
        Ok(())
    }

    #[test]
    fn initial_values_never_rewind_existing_records() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        let mut state = store.counter_state("orders")?;
        state.next_available = 50;
        assert!(store.try_write(&state)?);

        // Would have applied on creation only.
        let store = MemoryStore { initial_values: HashMap::from([("orders".into(), 9)]), ..store };
        assert_eq!(store.counter_state("orders")?.next_available, 50);
        Ok(())
    }

    #[test]
    fn stale_tokens_are_rejected_not_errors() -> Result<(), StoreError> {
        let store = MemoryStore::new();
        let stale = store.counter_state("orders")?;

        let mut winner = stale.clone();
        winner.next_available = 50;
        assert!(store.try_write(&winner)?);

        let mut loser = stale;
        loser.next_available = 99;
        assert!(!store.try_write(&loser)?);

        // The winning reservation stands.
        assert_eq!(store.counter_state("orders")?.next_available, 50);
        Ok(())
    }

    #[test]
    fn writes_to_unknown_scopes_are_errors() {
        let store = MemoryStore::new();
        let state = CounterState::new("orders", 10, "0");

        assert!(store.try_write(&state).is_err());
    }
}
