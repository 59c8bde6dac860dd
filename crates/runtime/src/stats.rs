//! Process-wide counters for the exported entry points
//!
//! Every boundary call bumps a per-entry counter and adds the time it spent
//! computing. Updates are single relaxed atomic adds, so concurrent host
//! threads never contend on a lock. The counters only feed the usage report;
//! they never influence a result.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// An exported symbol that is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Compute,
    ComputeI64,
    TryCompute,
    TryComputeI64,
    ComputeWith,
}

impl Entry {
    pub const ALL: [Entry; 5] = [
        Entry::Compute,
        Entry::ComputeI64,
        Entry::TryCompute,
        Entry::TryComputeI64,
        Entry::ComputeWith,
    ];

    /// The exported symbol name
    pub fn symbol(self) -> &'static str {
        match self {
            Entry::Compute => "fib_compute",
            Entry::ComputeI64 => "fib_compute_i64",
            Entry::TryCompute => "fib_try_compute",
            Entry::TryComputeI64 => "fib_try_compute_i64",
            Entry::ComputeWith => "fib_compute_with",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

static CALLS: [AtomicU64; 5] = [const { AtomicU64::new(0) }; 5];

/// Calls that ended with an error set (panics included)
pub static TOTAL_ERRORS: AtomicU64 = AtomicU64::new(0);

/// Nanoseconds spent inside entry points, summed over all threads
pub static BUSY_NANOS: AtomicU64 = AtomicU64::new(0);

static FIRST_CALL: OnceLock<Instant> = OnceLock::new();

/// Record one finished call that began at `start`
///
/// The wall clock starts at the first call's `start`, so busy time of a
/// single-threaded host never exceeds the wall clock.
pub fn record_call(entry: Entry, start: Instant) {
    FIRST_CALL.get_or_init(|| start);
    CALLS[entry.slot()].fetch_add(1, Ordering::Relaxed);
    BUSY_NANOS.fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
}

pub fn record_error() {
    TOTAL_ERRORS.fetch_add(1, Ordering::Relaxed);
}

pub fn calls(entry: Entry) -> u64 {
    CALLS[entry.slot()].load(Ordering::Relaxed)
}

pub fn total_calls() -> u64 {
    Entry::ALL.iter().map(|e| calls(*e)).sum()
}

/// Time since the first recorded call, if any call has happened
pub fn since_first_call() -> Option<Duration> {
    FIRST_CALL.get().map(|t| t.elapsed())
}
