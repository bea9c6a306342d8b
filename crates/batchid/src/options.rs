use crate::{Error, Result};

/// Default number of IDs reserved per store round trip.
pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// Default bound on conditional-write retries during one refill.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 25;

/// Validated tunables for a generator.
///
/// Both setters reject out-of-range values with [`Error::OutOfRange`] at the
/// point of assignment rather than clamping or deferring the failure to
/// allocation time.
///
/// # Example
///
/// ```
/// use batchid::GeneratorOptions;
///
/// let options = GeneratorOptions::new()
///     .batch_size(500)?
///     .max_write_attempts(10)?;
/// # Ok::<(), batchid::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    pub(crate) batch_size: i64,
    pub(crate) max_write_attempts: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

impl GeneratorOptions {
    /// Creates options with the default batch size and retry budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many numbers each refill reserves.
    ///
    /// Larger batches amortize store round trips across more calls but lose
    /// more unused numbers when a process restarts. Values below 1 are
    /// rejected.
    pub fn batch_size(mut self, batch_size: i64) -> Result<Self> {
        if batch_size < 1 {
            return Err(Error::OutOfRange {
                name: "batch_size",
                value: batch_size,
            });
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Sets how many conditional writes one refill may attempt before failing
    /// with [`Error::Contention`]. Zero is rejected.
    pub fn max_write_attempts(mut self, max_write_attempts: u32) -> Result<Self> {
        if max_write_attempts < 1 {
            return Err(Error::OutOfRange {
                name: "max_write_attempts",
                value: i64::from(max_write_attempts),
            });
        }
        self.max_write_attempts = max_write_attempts;
        Ok(self)
    }
}
