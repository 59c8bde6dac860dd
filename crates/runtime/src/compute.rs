//! Exported Fibonacci entry points
//!
//! These functions are exported with C ABI for a host environment to call.
//!
//! # Contract
//!
//! - `fib_compute` is the legacy entry point: naive recursion at the host's
//!   32-bit width, overflow wraps, and any index below 2 (negative ones
//!   included) is returned unchanged. It never sets an error.
//! - `fib_try_compute*` reject negative and overflowing indices. On failure
//!   they set the thread-local runtime error and return 0; the host checks
//!   `fib_has_error` / `fib_take_error`.
//! - `fib_compute_with` selects an algorithm by its numeric code
//!   (0 naive, 1 iterative, 2 memoized, 3 matrix).
//!
//! No entry point unwinds across the boundary. A panic inside a body is
//! caught, turned into a runtime error, and the call returns 0. Only the
//! naive recursion grows the stack with `n`; stack exhaustion there is not a
//! panic and aborts the process, as it would in the host. The other
//! algorithms run in constant stack depth.

use crate::error::{format_panic_payload, set_runtime_error};
use crate::stats::{Entry, record_call, record_error};
use fib_core::{Algorithm, compute, try_compute};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Run an entry point body, timing it and converting failures to errors
fn guarded<T: Default>(entry: Entry, body: impl FnOnce() -> Result<T, String>) -> T {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    record_call(entry, start);
    match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(msg)) => {
            record_error();
            set_runtime_error(format!("{}: {}", entry.symbol(), msg));
            T::default()
        }
        Err(payload) => {
            record_error();
            set_runtime_error(format!(
                "{}: panicked: {}",
                entry.symbol(),
                format_panic_payload(&payload)
            ));
            T::default()
        }
    }
}

/// Naive recursive F(n) at 32 bits
#[unsafe(no_mangle)]
pub extern "C" fn fib_compute(n: i32) -> i32 {
    guarded(Entry::Compute, || Ok(compute(n)))
}

/// Naive recursive F(n) at 64 bits
#[unsafe(no_mangle)]
pub extern "C" fn fib_compute_i64(n: i64) -> i64 {
    guarded(Entry::ComputeI64, || Ok(compute(n)))
}

/// Checked F(n) at 32 bits
///
/// # Error Handling
/// - Negative `n`: sets runtime error and returns 0
/// - `n > 46`: sets runtime error and returns 0
#[unsafe(no_mangle)]
pub extern "C" fn fib_try_compute(n: i32) -> i32 {
    guarded(Entry::TryCompute, || {
        try_compute(n).map_err(|e| e.to_string())
    })
}

/// Checked F(n) at 64 bits
///
/// # Error Handling
/// - Negative `n`: sets runtime error and returns 0
/// - `n > 92`: sets runtime error and returns 0
#[unsafe(no_mangle)]
pub extern "C" fn fib_try_compute_i64(n: i64) -> i64 {
    guarded(Entry::TryComputeI64, || {
        try_compute(n).map_err(|e| e.to_string())
    })
}

/// F(n) at 64 bits using the algorithm with the given code
///
/// Results follow the naive contract whatever the algorithm.
///
/// # Error Handling
/// - Unknown algorithm code: sets runtime error and returns 0
#[unsafe(no_mangle)]
pub extern "C" fn fib_compute_with(algorithm: u32, n: i64) -> i64 {
    guarded(Entry::ComputeWith, || {
        let algorithm = Algorithm::from_code(algorithm).map_err(|e| e.to_string())?;
        Ok(algorithm.evaluate(n))
    })
}
