//! Hardened computation that refuses invalid indices
//!
//! Unlike [`crate::naive::compute`], negative indices are rejected with
//! [`FibError::InvalidArgument`] and indices past the width's
//! [`FibInt::MAX_INDEX`] are rejected with [`FibError::Overflow`] before any
//! recursion starts. The recursion itself is still the naive one.

use crate::error::FibError;
use crate::int::FibInt;

/// Compute F(n) by naive recursion, failing instead of wrapping
pub fn try_compute<T: FibInt>(n: T) -> Result<T, FibError> {
    if n < T::ZERO {
        return Err(FibError::InvalidArgument { n: n.to_i64() });
    }
    if n > T::MAX_INDEX {
        return Err(overflow(n));
    }
    checked(n).ok_or_else(|| overflow(n))
}

fn overflow<T: FibInt>(n: T) -> FibError {
    FibError::Overflow {
        n: n.to_i64(),
        bits: T::BITS,
    }
}

fn checked<T: FibInt>(n: T) -> Option<T> {
    if n < T::TWO {
        return Some(n);
    }
    checked(n.wrapping_sub(T::ONE))?.checked_add(checked(n.wrapping_sub(T::TWO))?)
}
