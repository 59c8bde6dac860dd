//! Property checks over a range of indices
//!
//! Runs the sequence's laws against the naive recursion at both widths and
//! compares every other algorithm with it. Used by `fibc verify` to check a
//! build on the machine it will run on.

use crate::width::Bits;
use fib_core::{Algorithm, FibError, FibInt};
use std::fmt;
use std::io::{self, Write};
use tracing::{debug, info};

/// Known values every width must reproduce
const KNOWN: [(i64, i64); 5] = [(0, 0), (1, 1), (2, 1), (10, 55), (20, 6765)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub property: &'static str,
    pub bits: Bits,
    pub n: i64,
    pub detail: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed at n = {} ({} bits): {}",
            self.property, self.n, self.bits, self.detail
        )
    }
}

#[derive(Debug, Default)]
pub struct VerifyReport {
    pub checks: u64,
    pub failures: Vec<Failure>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit status for the run
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }

    /// `FAIL:` lines to `err`, then a one-line summary to `out`
    pub fn write_summary(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        for failure in &self.failures {
            writeln!(err, "FAIL: {}", failure)?;
        }
        if self.passed() {
            writeln!(out, "ok: {} checks passed", self.checks)
        } else {
            writeln!(
                out,
                "FAILED: {} of {} checks failed",
                self.failures.len(),
                self.checks
            )
        }
    }

    fn check(
        &mut self,
        ok: bool,
        property: &'static str,
        bits: Bits,
        n: i64,
        detail: impl FnOnce() -> String,
    ) {
        self.checks += 1;
        if !ok {
            self.failures.push(Failure {
                property,
                bits,
                n,
                detail: detail(),
            });
        }
    }
}

/// Check every property for indices up to `max` at both widths
///
/// `max` is clamped to the last index each width can represent. The naive
/// recursion is exponential, so keep `max` in the thirties.
pub fn verify(max: i64) -> VerifyReport {
    let mut report = VerifyReport::default();
    for bits in [Bits::B32, Bits::B64] {
        verify_width(bits, max, &mut report);
    }
    info!(
        checks = report.checks,
        failures = report.failures.len(),
        "verification finished"
    );
    report
}

fn max_index(bits: Bits) -> i64 {
    match bits {
        Bits::B32 => <i32 as FibInt>::MAX_INDEX.to_i64(),
        Bits::B64 => <i64 as FibInt>::MAX_INDEX,
    }
}

fn verify_width(bits: Bits, max: i64, report: &mut VerifyReport) {
    let top = max.clamp(2, max_index(bits));
    debug!(%bits, top, "verifying width");

    let mut values = Vec::with_capacity(top as usize + 1);
    for n in 0..=top {
        match bits.evaluate(Algorithm::Naive, n) {
            Ok(v) => values.push(v),
            Err(e) => {
                report.check(false, "evaluate", bits, n, || e.to_string());
                return;
            }
        }
    }
    let at = |n: i64| values[n as usize];

    for (n, expected) in KNOWN.into_iter().filter(|(n, _)| *n <= top) {
        report.check(at(n) == expected, "known value", bits, n, || {
            format!("expected {}, got {}", expected, at(n))
        });
    }

    for n in 2..=top {
        let sum = at(n - 1).wrapping_add(at(n - 2));
        report.check(at(n) == sum, "recurrence", bits, n, || {
            format!("F(n) = {} but F(n-1) + F(n-2) = {}", at(n), sum)
        });
    }

    for n in 0..top {
        report.check(at(n + 1) >= at(n), "monotonicity", bits, n, || {
            format!("F(n+1) = {} < F(n) = {}", at(n + 1), at(n))
        });
    }

    let again = bits.evaluate(Algorithm::Naive, top);
    report.check(again == Ok(at(top)), "determinism", bits, top, || {
        format!("first {}, then {:?}", at(top), again)
    });

    for algorithm in Algorithm::ALL {
        for n in -3..=top {
            let reference = if n < 0 { n } else { at(n) };
            let got = bits.evaluate(algorithm, n);
            report.check(got == Ok(reference), "differential", bits, n, || {
                format!("{} gave {:?}, naive gave {}", algorithm, got, reference)
            });
        }
    }

    for n in 0..=top {
        let got = bits.try_compute(n);
        report.check(got == Ok(at(n)), "checked agrees", bits, n, || {
            format!("got {:?}", got)
        });
    }
    let got = bits.try_compute(-1);
    report.check(
        got == Err(FibError::InvalidArgument { n: -1 }),
        "checked rejects negative",
        bits,
        -1,
        || format!("got {:?}", got),
    );
    let past = max_index(bits) + 1;
    let got = bits.try_compute(past);
    report.check(
        matches!(got, Err(FibError::Overflow { .. })),
        "checked rejects overflow",
        bits,
        past,
        || format!("got {:?}", got),
    );

    for n in 0..top {
        let expected = at(n + 1).wrapping_mul(2).wrapping_sub(1) as u64;
        let got = bits.compute_counted(n).map(|e| e.calls);
        report.check(got == Ok(expected), "activation count", bits, n, || {
            format!("expected {} calls, got {:?}", expected, got)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_range_passes() {
        let report = verify(15);
        assert!(report.passed(), "{:?}", report.failures);
        assert!(report.checks > 100);
    }

    #[test]
    fn test_tiny_max_is_clamped_up() {
        let report = verify(-5);
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn test_failed_report_summary_and_exit_code() {
        let mut report = VerifyReport::default();
        report.check(true, "known value", Bits::B64, 10, String::new);
        report.check(false, "recurrence", Bits::B32, 7, || "off by one".to_string());
        assert_eq!(report.exit_code(), 1);

        let mut out = Vec::new();
        let mut err = Vec::new();
        report.write_summary(&mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "FAILED: 1 of 2 checks failed\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "FAIL: recurrence failed at n = 7 (32 bits): off by one\n"
        );
    }

    #[test]
    fn test_passed_report_summary_and_exit_code() {
        let report = verify(10);
        assert_eq!(report.exit_code(), 0);

        let mut out = Vec::new();
        let mut err = Vec::new();
        report.write_summary(&mut out, &mut err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("ok: {} checks passed\n", report.checks)
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure {
            property: "recurrence",
            bits: Bits::B32,
            n: 7,
            detail: "F(n) = 1 but F(n-1) + F(n-2) = 13".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "recurrence failed at n = 7 (32 bits): F(n) = 1 but F(n-1) + F(n-2) = 13"
        );
    }
}
