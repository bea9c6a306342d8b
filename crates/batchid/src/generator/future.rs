use std::collections::HashMap;
use std::sync::Arc;

use futures::lock::Mutex as AsyncMutex;

use crate::{
    AsyncOptimisticStore, Error, GeneratorOptions, Result,
    generator::scope::{self, BatchLease, ScopeState},
    mutex::{self, RwLock},
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Async twin of [`UniqueIdGenerator`], identical in algorithm and outcome.
///
/// The per-scope lock is an async mutex so a refill awaiting the store
/// suspends the task instead of blocking the executor. The scope map keeps its
/// synchronous read/write lock: it is never held across an await.
///
/// # Example
///
/// ```
/// use batchid::{AsyncUniqueIdGenerator, MemoryStore};
///
/// futures::executor::block_on(async {
///     let generator = AsyncUniqueIdGenerator::new(MemoryStore::new());
///     assert_eq!(generator.next_id("orders").await?, 1);
///     assert_eq!(generator.next_id("orders").await?, 2);
///     Ok::<(), batchid::Error>(())
/// })
/// # .unwrap();
/// ```
///
/// [`UniqueIdGenerator`]: crate::UniqueIdGenerator
pub struct AsyncUniqueIdGenerator<S> {
    store: S,
    options: GeneratorOptions,
    scopes: RwLock<HashMap<String, Arc<AsyncMutex<ScopeState>>>>,
}

impl<S> AsyncUniqueIdGenerator<S>
where
    S: AsyncOptimisticStore,
{
    /// Creates a generator with [`GeneratorOptions::default`].
    ///
    /// Construction touches the store for nothing; the first read happens on
    /// the first [`Self::next_id`] call for a scope.
    pub fn new(store: S) -> Self {
        Self::with_options(store, GeneratorOptions::default())
    }

    /// Creates a generator with explicit, already validated options.
    pub fn with_options(store: S, options: GeneratorOptions) -> Self {
        Self {
            store,
            options,
            scopes: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the next ID for `scope`.
    ///
    /// Behaves exactly like [`UniqueIdGenerator::next_id`], suspending instead
    /// of blocking while the store is consulted during a refill.
    ///
    /// # Errors
    ///
    /// - [`Error::Contention`] when a refill exhausts its attempt budget.
    /// - [`Error::Store`] for any store failure other than a stale token.
    ///
    /// [`UniqueIdGenerator::next_id`]: crate::UniqueIdGenerator::next_id
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub async fn next_id(&self, scope: &str) -> Result<i64> {
        let state = self.scope_state(scope)?;
        let mut state = state.lock().await;

        if state.is_exhausted() {
            let lease = self.claim_batch(scope).await?;
            state.install(lease);
        }

        Ok(state.issue())
    }

    // Same double-checked creation as the blocking generator.
    fn scope_state(&self, scope: &str) -> Result<Arc<AsyncMutex<ScopeState>>> {
        if let Some(state) = mutex::read(&self.scopes)?.get(scope) {
            return Ok(Arc::clone(state));
        }

        let mut scopes = mutex::write(&self.scopes)?;
        Ok(Arc::clone(scopes.entry(scope.to_owned()).or_default()))
    }

    async fn claim_batch(&self, scope: &str) -> Result<BatchLease> {
        let attempts = self.options.max_write_attempts;

        for _ in 0..attempts {
            let persisted = self.store.counter_state(scope).await?;
            let (lease, proposed) = scope::reserve(persisted, self.options.batch_size);

            if self.store.try_write(&proposed).await? {
                return Ok(lease);
            }
        }

        Err(Error::Contention {
            scope: scope.to_owned(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, UniqueIdGenerator};
    use std::collections::HashSet;

    const TOTAL_IDS: usize = 1024;
    const TASKS: usize = 8;
    const IDS_PER_TASK: usize = TOTAL_IDS / TASKS;

    #[tokio::test]
    async fn ids_roll_over_between_windows() -> Result<()> {
        let options = GeneratorOptions::new().batch_size(3)?;
        let generator = AsyncUniqueIdGenerator::with_options(MemoryStore::new(), options);

        for expected in 1..=9 {
            assert_eq!(generator.next_id("orders").await?, expected);
        }

        Ok(())
    }

    #[tokio::test]
    async fn outcome_matches_blocking_generator() -> Result<()> {
        let blocking = UniqueIdGenerator::with_options(
            MemoryStore::new(),
            GeneratorOptions::new().batch_size(4)?,
        );
        let suspending = AsyncUniqueIdGenerator::with_options(
            MemoryStore::new(),
            GeneratorOptions::new().batch_size(4)?,
        );

        for _ in 0..10 {
            assert_eq!(
                blocking.next_id("orders")?,
                suspending.next_id("orders").await?
            );
        }

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_allocation_yields_unique_gap_free_ids() -> Result<()> {
        let options = GeneratorOptions::new().batch_size(10)?;
        let generator = Arc::new(AsyncUniqueIdGenerator::with_options(
            MemoryStore::new(),
            options,
        ));

        let mut tasks = Vec::with_capacity(TASKS);
        for _ in 0..TASKS {
            let generator = Arc::clone(&generator);
            tasks.push(tokio::spawn(async move {
                let mut ids = Vec::with_capacity(IDS_PER_TASK);
                for _ in 0..IDS_PER_TASK {
                    ids.push(generator.next_id("orders").await?);
                }
                Ok::<_, Error>(ids)
            }));
        }

        let mut seen = HashSet::with_capacity(TOTAL_IDS);
        for task in tasks {
            for id in task.await.expect("task panicked")? {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }

        assert_eq!(seen.len(), TOTAL_IDS);
        assert!((1..=TOTAL_IDS as i64).all(|id| seen.contains(&id)));

        Ok(())
    }
}
