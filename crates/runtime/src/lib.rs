//! Fib Runtime: the naive Fibonacci exported across a C ABI
//!
//! A host environment links the `staticlib` or loads the `cdylib` and calls
//! the `fib_*` symbols directly. Nothing unwinds across the boundary; failures
//! in the checked entry points surface through the thread-local error slot.
//!
//! # Modules
//!
//! - `compute`: the exported entry points
//! - `error`: thread-local error state for FFI safety
//! - `stats`: process-wide call counters
//! - `report`: `FIB_REPORT`-controlled usage report

pub mod compute;
pub mod error;
pub mod report;
pub mod stats;

// Entry points (exported for host linking)
pub use compute::{
    fib_compute as compute, fib_compute_i64 as compute_i64, fib_compute_with as compute_with,
    fib_try_compute as try_compute, fib_try_compute_i64 as try_compute_i64,
};

// Error handling
pub use error::{
    clear_runtime_error, fib_clear_error as clear_error, fib_get_error as get_error,
    fib_has_error as has_error, fib_take_error as take_error, has_runtime_error,
    set_runtime_error, take_runtime_error,
};

// Report
pub use report::{ReportConfig, ReportDestination, ReportFormat, fib_report as report};
