//! Fib Core: the n-th Fibonacci number by naive recursion
//!
//! The computation is deliberately the exponential one: `F(n) = F(n-1) +
//! F(n-2)` translated straight into two recursive calls, no cache. It is the
//! workload the exported runtime symbols and the benchmark CLI are built
//! around.
//!
//! # Modules
//!
//! - `naive`: the reference recursion (wrapping, `n < 2` returns `n`)
//! - `checked`: the same recursion rejecting negative and overflowing indices
//! - `algorithm`: iterative, memoized and matrix variants for differential testing
//! - `int`: the `FibInt` trait over the 32- and 64-bit widths
//! - `error`: `FibError`

pub mod algorithm;
pub mod checked;
pub mod error;
pub mod int;
pub mod naive;

pub use algorithm::Algorithm;
pub use checked::try_compute;
pub use error::FibError;
pub use int::FibInt;
pub use naive::{Evaluation, compute, compute_counted};
