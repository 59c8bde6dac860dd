//! Reference algorithms for differential testing and benchmarking
//!
//! Every variant reproduces the naive contract exactly: indices below 2 come
//! back unchanged and overflow wraps. Wrapping addition and multiplication
//! agree with exact arithmetic modulo 2^BITS, so the wrapped results match
//! across variants even past [`FibInt::MAX_INDEX`].

use crate::error::FibError;
use crate::int::FibInt;
use crate::naive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How F(n) is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Double recursion, exponential time
    #[default]
    Naive,
    /// Two running values, linear time
    Iterative,
    /// Recursion with a per-call cache, linear time and depth
    Memoized,
    /// Fast exponentiation of `[[0, 1], [1, 1]]`, logarithmic time
    Matrix,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Naive,
        Algorithm::Iterative,
        Algorithm::Memoized,
        Algorithm::Matrix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Iterative => "iterative",
            Algorithm::Memoized => "memoized",
            Algorithm::Matrix => "matrix",
        }
    }

    /// Stable numeric code used across the C ABI
    pub fn code(self) -> u32 {
        match self {
            Algorithm::Naive => 0,
            Algorithm::Iterative => 1,
            Algorithm::Memoized => 2,
            Algorithm::Matrix => 3,
        }
    }

    pub fn from_code(code: u32) -> Result<Self, FibError> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.code() == code)
            .ok_or_else(|| FibError::UnknownAlgorithm(format!("#{}", code)))
    }

    /// Whether the cost grows exponentially with `n`
    pub fn is_exponential(self) -> bool {
        self == Algorithm::Naive
    }

    pub fn evaluate<T: FibInt>(self, n: T) -> T {
        match self {
            Algorithm::Naive => naive::compute(n),
            Algorithm::Iterative => iterative(n),
            Algorithm::Memoized => memoized(n),
            Algorithm::Matrix => matrix(n),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| FibError::UnknownAlgorithm(s.to_string()))
    }
}

fn iterative<T: FibInt>(n: T) -> T {
    if n < T::TWO {
        return n;
    }
    let mut a = T::ZERO;
    let mut b = T::ONE;
    let mut i = T::ONE;
    while i < n {
        let c = a.wrapping_add(b);
        a = b;
        b = c;
        i = i.wrapping_add(T::ONE);
    }
    b
}

/// Per-call cache filled bottom-up, so there is no recursion depth to
/// exhaust. The cache grows one entry per index reached.
fn memoized<T: FibInt>(n: T) -> T {
    if n < T::TWO {
        return n;
    }
    let mut cache = vec![T::ZERO, T::ONE];
    let mut i = T::ONE;
    while i < n {
        let len = cache.len();
        let next = cache[len - 1].wrapping_add(cache[len - 2]);
        cache.push(next);
        i = i.wrapping_add(T::ONE);
    }
    cache[cache.len() - 1]
}

// [a, b, c, d] = |a b|
//                |c d|
type Matrix2x2<T> = [T; 4];

fn matmul<T: FibInt>(x: Matrix2x2<T>, y: Matrix2x2<T>) -> Matrix2x2<T> {
    let dot = |p: T, q: T, r: T, s: T| p.wrapping_mul(q).wrapping_add(r.wrapping_mul(s));
    [
        dot(x[0], y[0], x[1], y[2]),
        dot(x[0], y[1], x[1], y[3]),
        dot(x[2], y[0], x[3], y[2]),
        dot(x[2], y[1], x[3], y[3]),
    ]
}

fn fast_matexp<T: FibInt>(b: Matrix2x2<T>, e: u64) -> Matrix2x2<T> {
    if e == 0 {
        [T::ONE, T::ZERO, T::ZERO, T::ONE]
    } else if e % 2 == 1 {
        matmul(b, fast_matexp(matmul(b, b), e / 2))
    } else {
        fast_matexp(matmul(b, b), e / 2)
    }
}

fn matrix<T: FibInt>(n: T) -> T {
    if n < T::TWO {
        return n;
    }
    // M^(n+1) = |F(n)   F(n+1)|
    //           |F(n+1) F(n+2)|
    fast_matexp([T::ZERO, T::ONE, T::ONE, T::ONE], n.to_i64() as u64 + 1)[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_match_naive() {
        for algorithm in Algorithm::ALL {
            for n in -3..=25i64 {
                assert_eq!(
                    algorithm.evaluate(n),
                    naive::compute(n),
                    "{} diverged at n = {}",
                    algorithm,
                    n
                );
            }
        }
    }

    #[test]
    fn test_fast_variants_wrap_like_naive() {
        // F(47) = 2971215073 wraps at 32 bits
        assert_eq!(Algorithm::Iterative.evaluate(47i32), -1323752223);
        assert_eq!(Algorithm::Memoized.evaluate(47i32), -1323752223);
        assert_eq!(Algorithm::Matrix.evaluate(47i32), -1323752223);
        for n in 40..=120i64 {
            assert_eq!(
                Algorithm::Iterative.evaluate(n),
                Algorithm::Matrix.evaluate(n),
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_large_index_values() {
        assert_eq!(Algorithm::Iterative.evaluate(50i64), 12586269025);
        assert_eq!(Algorithm::Matrix.evaluate(70i64), 190392490709135);
        assert_eq!(Algorithm::Memoized.evaluate(92i64), 7540113804746346429);
    }

    #[test]
    fn test_linear_variants_handle_million_index() {
        let n = 1_000_000i64;
        let reference = Algorithm::Iterative.evaluate(n);
        assert_eq!(Algorithm::Memoized.evaluate(n), reference);
        assert_eq!(Algorithm::Matrix.evaluate(n), reference);

        let n = 1_000_000i32;
        assert_eq!(
            Algorithm::Memoized.evaluate(n),
            Algorithm::Iterative.evaluate(n)
        );
    }

    #[test]
    fn test_parse_and_display() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!(
            "fast".parse::<Algorithm>(),
            Err(FibError::UnknownAlgorithm("fast".to_string()))
        );
    }

    #[test]
    fn test_codes_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_code(algorithm.code()), Ok(algorithm));
        }
        assert!(Algorithm::from_code(9).is_err());
    }

    #[test]
    fn test_serde_lowercase_names() {
        let json = serde_json::to_string(&Algorithm::Memoized).unwrap();
        assert_eq!(json, "\"memoized\"");
        let parsed: Algorithm = serde_json::from_str("\"matrix\"").unwrap();
        assert_eq!(parsed, Algorithm::Matrix);
    }
}
