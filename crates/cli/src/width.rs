//! Integer width selection
//!
//! The command line works in `i64`; `Bits::B32` narrows the index to the
//! host's 32-bit width before computing so wrapping and overflow behave as
//! they would for the host.

use fib_core::{Algorithm, Evaluation, FibError, compute_counted, try_compute};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum Bits {
    B32,
    #[default]
    B64,
}

impl Bits {
    pub fn count(self) -> u32 {
        match self {
            Bits::B32 => 32,
            Bits::B64 => 64,
        }
    }

    /// F(n) at this width, following the naive contract
    ///
    /// Fails only when `n` itself does not fit the width.
    pub fn evaluate(self, algorithm: Algorithm, n: i64) -> Result<i64, FibError> {
        match self {
            Bits::B32 => Ok(i64::from(algorithm.evaluate(narrow(n)?))),
            Bits::B64 => Ok(algorithm.evaluate(n)),
        }
    }

    /// Checked F(n) at this width
    pub fn try_compute(self, n: i64) -> Result<i64, FibError> {
        match self {
            Bits::B32 => try_compute(narrow(n)?).map(i64::from),
            Bits::B64 => try_compute(n),
        }
    }

    /// Naive F(n) at this width with its activation count
    pub fn compute_counted(self, n: i64) -> Result<Evaluation<i64>, FibError> {
        match self {
            Bits::B32 => {
                let eval = compute_counted(narrow(n)?);
                Ok(Evaluation {
                    value: i64::from(eval.value),
                    calls: eval.calls,
                })
            }
            Bits::B64 => Ok(compute_counted(n)),
        }
    }
}

/// Narrow an index to 32 bits, reporting why it does not fit
pub fn narrow(n: i64) -> Result<i32, FibError> {
    i32::try_from(n).map_err(|_| {
        if n < 0 {
            FibError::InvalidArgument { n }
        } else {
            FibError::Overflow { n, bits: 32 }
        }
    })
}

impl TryFrom<u32> for Bits {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Bits::B32),
            64 => Ok(Bits::B64),
            other => Err(format!("bits must be 32 or 64 (got {})", other)),
        }
    }
}

impl std::str::FromStr for Bits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u32 = s
            .parse()
            .map_err(|_| format!("bits must be 32 or 64 (got '{}')", s))?;
        Bits::try_from(bits)
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}
