use crate::CounterState;

/// A contiguous range of numbers claimed by one successful conditional write.
///
/// The range `(last_id, highest]` belongs exclusively to the claiming process
/// instance; numbers left unconsumed when the process exits are lost for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BatchLease {
    pub(crate) last_id: i64,
    pub(crate) highest: i64,
}

/// Locally cached allocation window for one scope.
///
/// Mutated only while holding that scope's lock. Both fields start at zero,
/// which reads as an exhausted window and forces a refill on first use.
#[derive(Debug, Default)]
pub(crate) struct ScopeState {
    last_id: i64,
    highest: i64,
}

impl ScopeState {
    /// True when no capacity remains, including the pristine state.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.last_id == self.highest
    }

    /// Issues the next ID from the current window.
    ///
    /// Callers must hold the scope lock and have verified (or restored)
    /// capacity.
    pub(crate) fn issue(&mut self) -> i64 {
        debug_assert!(self.last_id < self.highest);
        self.last_id += 1;
        self.last_id
    }

    /// Commits a freshly claimed lease as the current window.
    pub(crate) fn install(&mut self, lease: BatchLease) {
        self.last_id = lease.last_id;
        self.highest = lease.highest;
    }
}

/// Computes the window a refill should claim and the record the store must
/// accept for the claim to hold.
///
/// Shared by the blocking and async allocation paths so both negotiate
/// identical ranges.
pub(crate) fn reserve(mut persisted: CounterState, batch_size: i64) -> (BatchLease, CounterState) {
    let last_id = persisted.next_available - 1;
    let highest = last_id + batch_size;
    persisted.next_available = highest + 1;
    (BatchLease { last_id, highest }, persisted)
}
