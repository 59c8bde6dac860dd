//! Integer widths the computation runs at
//!
//! The host's native integer is 32 bits, so `i32` is the width the exported
//! entry point uses. `i64` is available to callers that can carry it.
//!
//! # Overflow Behavior
//!
//! Unchecked paths use **wrapping semantics** so that results past the
//! representable range are defined in debug and release builds alike:
//! `F(47)` at 32 bits wraps to `-1323752223`. Checked paths use
//! [`FibInt::checked_add`] and stop at [`FibInt::MAX_INDEX`].

use std::fmt::{Debug, Display};

/// A signed machine integer the Fibonacci functions are generic over
pub trait FibInt: Copy + Ord + Debug + Display + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    /// Largest index whose Fibonacci number is representable in this width
    const MAX_INDEX: Self;
    /// Width in bits, for error messages
    const BITS: u32;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Widen losslessly, for errors and index arithmetic
    fn to_i64(self) -> i64;
}

macro_rules! impl_fib_int {
    ($t:ty, $max_index:expr) => {
        impl FibInt for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const TWO: Self = 2;
            const MAX_INDEX: Self = $max_index;
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$t>::wrapping_mul(self, rhs)
            }

            #[inline]
            fn checked_add(self, rhs: Self) -> Option<Self> {
                <$t>::checked_add(self, rhs)
            }

            #[inline]
            fn to_i64(self) -> i64 {
                i64::from(self)
            }
        }
    };
}

// F(46) = 1836311903, F(47) = 2971215073 > i32::MAX
impl_fib_int!(i32, 46);
// F(92) = 7540113804746346429, F(93) = 12200160415121876738 > i64::MAX
impl_fib_int!(i64, 92);
