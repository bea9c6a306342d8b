use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    Error, GeneratorOptions, OptimisticStore, Result,
    generator::scope::{self, BatchLease, ScopeState},
    mutex::{self, Mutex, RwLock},
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Hands out unique, strictly increasing integer IDs partitioned by scope,
/// refilling from a shared store in batches.
///
/// Each scope keeps a private window of reserved numbers served without any
/// store contact; when the window is exhausted, the generator claims the next
/// one with a single conditional write, retrying on lost races up to the
/// configured attempt budget. Processes sharing one store therefore never hold
/// overlapping ranges, while IDs within one process and scope stay gap-free
/// and strictly increasing.
///
/// The generator is safe to share across threads. Unrelated scopes never
/// contend: each has its own lock, and the scope map itself is only
/// write-locked when a scope is first seen.
///
/// # Example
///
/// ```
/// use batchid::{MemoryStore, UniqueIdGenerator};
///
/// let generator = UniqueIdGenerator::new(MemoryStore::new());
/// assert_eq!(generator.next_id("orders")?, 1);
/// assert_eq!(generator.next_id("orders")?, 2);
/// # Ok::<(), batchid::Error>(())
/// ```
pub struct UniqueIdGenerator<S> {
    store: S,
    options: GeneratorOptions,
    scopes: RwLock<HashMap<String, Arc<Mutex<ScopeState>>>>,
}

impl<S> UniqueIdGenerator<S>
where
    S: OptimisticStore,
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
    /// Serves from the scope's current window when capacity remains; otherwise
    /// performs a refill first, which costs one store read plus one
    /// conditional write per attempt.
    ///
    /// # Errors
    ///
    /// - [`Error::Contention`] when a refill exhausts its attempt budget. The
    ///   call may be retried later; no ID was consumed.
    /// - [`Error::Store`] for any store failure other than a stale token,
    ///   surfaced unchanged and never retried.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self, scope: &str) -> Result<i64> {
        let state = self.scope_state(scope)?;
        let mut state = mutex::lock(&state)?;

        if state.is_exhausted() {
            let lease = self.claim_batch(scope)?;
            state.install(lease);
        }

        Ok(state.issue())
    }

    // Double-checked creation: the read lock covers the common path, and the
    // write lock re-checks before inserting so racing first callers share one
    // entry.
    fn scope_state(&self, scope: &str) -> Result<Arc<Mutex<ScopeState>>> {
        if let Some(state) = mutex::read(&self.scopes)?.get(scope) {
            return Ok(Arc::clone(state));
        }

        let mut scopes = mutex::write(&self.scopes)?;
        Ok(Arc::clone(scopes.entry(scope.to_owned()).or_default()))
    }

    /// Negotiates a fresh window with the store.
    ///
    /// Only the stale-token outcome is retried; store errors propagate on
    /// first occurrence.
    fn claim_batch(&self, scope: &str) -> Result<BatchLease> {
        let attempts = self.options.max_write_attempts;

        for _ in 0..attempts {
            let persisted = self.store.counter_state(scope)?;
            let (lease, proposed) = scope::reserve(persisted, self.options.batch_size);

            if self.store.try_write(&proposed)? {
                return Ok(lease);
            }
        }

        Err(Error::Contention {
            scope: scope.to_owned(),
            attempts,
        })
    }
}
