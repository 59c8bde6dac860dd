//! Differential tests: every variant against the naive recursion
//!
//! The naive recursion is the reference. Any faster variant has to agree
//! with it at both widths, for negative indices and for wrapped results.

use fib_core::{Algorithm, FibError, FibInt, compute, compute_counted, try_compute};

fn check_width<T: FibInt>(indices: impl Iterator<Item = T>) {
    for n in indices {
        let reference = compute(n);
        for algorithm in Algorithm::ALL {
            assert_eq!(
                algorithm.evaluate(n),
                reference,
                "{} at {} bits diverged for n = {}",
                algorithm,
                T::BITS,
                n
            );
        }
    }
}

#[test]
fn test_variants_agree_at_32_bits() {
    check_width(-10..=30i32);
}

#[test]
fn test_variants_agree_at_64_bits() {
    check_width(-10..=30i64);
}

#[test]
fn test_checked_and_legacy_agree_on_valid_range() {
    for n in 0..=30i32 {
        assert_eq!(try_compute(n), Ok(compute(n)));
    }
}

#[test]
fn test_negative_index_both_policies() {
    // The legacy recursion hands negative indices back unchanged
    assert_eq!(compute(-5i32), -5);
    // The checked one rejects them
    assert_eq!(try_compute(-5i32), Err(FibError::InvalidArgument { n: -5 }));
}

#[test]
fn test_overflow_boundary() {
    // Rejected up front, so no exponential recursion runs here
    assert!(matches!(
        try_compute(47i32),
        Err(FibError::Overflow { n: 47, bits: 32 })
    ));
    assert_eq!(
        Algorithm::Iterative.evaluate(46i32),
        1836311903,
        "last value that fits in 32 bits"
    );
    assert_eq!(Algorithm::Matrix.evaluate(92i64), 7540113804746346429);
    assert!(matches!(
        try_compute(93i64),
        Err(FibError::Overflow { n: 93, bits: 64 })
    ));
}

#[test]
fn test_activation_count_grows_like_the_sequence() {
    let eval = compute_counted(25i64);
    assert_eq!(eval.value, 75025);
    // 2 * F(26) - 1
    assert_eq!(eval.calls, 2 * 121393 - 1);
}
