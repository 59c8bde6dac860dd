//! The naive recursive Fibonacci
//!
//! `compute` is the direct translation of the recurrence: two recursive
//! calls per index above 1, no cache, recursion depth `n`. Its cost is
//! exponential in `n` and that cost is the point; the faster variants in
//! [`crate::algorithm`] are checked against this one, never substituted
//! for it.
//!
//! Indices below 2 are returned unchanged, negative ones included.

use crate::int::FibInt;
use serde::Serialize;

/// Compute F(n) by naive double recursion
///
/// Overflow wraps. `compute(-7) == -7`.
pub fn compute<T: FibInt>(n: T) -> T {
    if n < T::TWO {
        n
    } else {
        compute(n.wrapping_sub(T::ONE)).wrapping_add(compute(n.wrapping_sub(T::TWO)))
    }
}

/// A result together with the number of activations it took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluation<T> {
    pub value: T,
    /// Recursive activations, the outermost call included.
    /// For `n >= 0` this is `2 * F(n + 1) - 1`.
    pub calls: u64,
}

/// Same recursion as [`compute`], counting activations
pub fn compute_counted<T: FibInt>(n: T) -> Evaluation<T> {
    let mut calls = 0;
    let value = counted(n, &mut calls);
    Evaluation { value, calls }
}

fn counted<T: FibInt>(n: T, calls: &mut u64) -> T {
    *calls += 1;
    if n < T::TWO {
        n
    } else {
        let a = counted(n.wrapping_sub(T::ONE), calls);
        let b = counted(n.wrapping_sub(T::TWO), calls);
        a.wrapping_add(b)
    }
}
