/// A result type defaulting to the crate-wide [`Error`].
///
/// Store implementations use the second parameter to surface [`StoreError`]
/// directly from their trait methods.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors a generator can surface.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A tunable was assigned a value outside its permitted range.
    ///
    /// Raised at the point of assignment, never deferred to `next_id` and
    /// never silently clamped.
    #[error("{name} must be a positive number (got {value})")]
    OutOfRange { name: &'static str, value: i64 },

    /// The conditional-write retry budget was exhausted without claiming a
    /// batch.
    ///
    /// Transient contention is expected to clear, so the caller may retry the
    /// whole `next_id` invocation later. Persistent contention usually means
    /// the batch size is too small for the generation load.
    #[error(
        "failed to update the data store after {attempts} attempts for scope `{scope}`; \
         this likely represents too much contention against the store, consider \
         increasing the batch size"
    )]
    Contention { scope: String, attempts: u32 },

    /// The store reported a failure other than a stale version token.
    ///
    /// Surfaced unchanged on first occurrence; the generator never retries
    /// these.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A shared lock was poisoned by a panicking thread.
    ///
    /// Absent when the `parking-lot` feature is enabled, since those locks do
    /// not poison.
    #[cfg(not(feature = "parking-lot"))]
    #[error("lock poisoned")]
    LockPoisoned,
}

/// Failure channel for store implementations.
///
/// Covers every failure except the stale-token outcome, which
/// [`OptimisticStore::try_write`] reports as `Ok(false)`.
///
/// [`OptimisticStore::try_write`]: crate::OptimisticStore::try_write
#[derive(Debug, thiserror::Error)]
#[error("{context}")]
pub struct StoreError {
    context: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a store error from a bare description.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying cause (driver error,
    /// transport failure, malformed record).
    pub fn with_source(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            context: context.into(),
            source: Some(source.into()),
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
mod poison {
    use super::Error;
    use std::sync::{MutexGuard, PoisonError, RwLockReadGuard, RwLockWriteGuard};

    // Collapse all poisoned lock errors into `LockPoisoned`.
    impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
        fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
            Self::LockPoisoned
        }
    }

    impl<T> From<PoisonError<RwLockReadGuard<'_, T>>> for Error {
        fn from(_: PoisonError<RwLockReadGuard<'_, T>>) -> Self {
            Self::LockPoisoned
        }
    }

    impl<T> From<PoisonError<RwLockWriteGuard<'_, T>>> for Error {
        fn from(_: PoisonError<RwLockWriteGuard<'_, T>>) -> Self {
            Self::LockPoisoned
        }
    }
}
