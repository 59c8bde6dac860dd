//! Errors reported by the checked entry points

/// Why a checked computation refused to produce a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FibError {
    /// The index was negative
    InvalidArgument { n: i64 },
    /// F(n) does not fit in the requested width
    Overflow { n: i64, bits: u32 },
    /// An algorithm name or code that is not recognized
    UnknownAlgorithm(String),
}

impl std::fmt::Display for FibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FibError::InvalidArgument { n } => {
                write!(f, "fibonacci: index must be non-negative (got {})", n)
            }
            FibError::Overflow { n, bits } => {
                write!(f, "fibonacci: F({}) overflows a {}-bit integer", n, bits)
            }
            FibError::UnknownAlgorithm(name) => {
                write!(
                    f,
                    "unknown algorithm '{}' (expected naive, iterative, memoized or matrix)",
                    name
                )
            }
        }
    }
}

impl std::error::Error for FibError {}
