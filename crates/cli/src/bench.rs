//! Fibonacci benchmark
//!
//! Output format: BENCH:fibonacci:<test>:<result>:<time_ms>
//!
//! Each case runs one algorithm at one index, optionally repeated, and is
//! checked against the iterative reference at the same width. Cases can go
//! through the exported `fib_*` symbols instead of calling the core directly,
//! to measure what a host sees.

use crate::width::Bits;
use fib_core::{Algorithm, FibError};
use serde::Serialize;
use std::hint::black_box;
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, error, warn};

/// How a case reaches the computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Call `fib-core` directly
    Direct,
    /// Call the exported C ABI entry points
    Exported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchCase {
    pub algorithm: Algorithm,
    pub n: i64,
    pub bits: Bits,
    pub iterations: u32,
}

impl BenchCase {
    /// `fib-naive-20`, or `fib-naive-20-x1000` when repeated
    pub fn name(&self) -> String {
        let mut name = format!("fib-{}-{}", self.algorithm, self.n);
        if self.bits == Bits::B32 {
            name.push_str("-i32");
        }
        if self.iterations > 1 {
            name.push_str(&format!("-x{}", self.iterations));
        }
        name
    }

    /// The engine that actually runs this case
    ///
    /// Only the naive recursion is exported at 32 bits, so other 32-bit
    /// algorithms fall back to the core.
    pub fn route(&self, engine: Engine) -> Engine {
        match (engine, self.bits, self.algorithm) {
            (Engine::Exported, Bits::B32, algorithm) if algorithm != Algorithm::Naive => {
                Engine::Direct
            }
            _ => engine,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub program: &'static str,
    pub name: String,
    pub algorithm: Algorithm,
    pub n: i64,
    pub bits: u32,
    pub result: i64,
    pub expected: i64,
    pub iterations: u32,
    /// Recursive activations per iteration, naive cases only
    pub calls: Option<u64>,
    pub elapsed_ms: u64,
}

impl BenchResult {
    pub fn passed(&self) -> bool {
        self.result == self.expected
    }

    pub fn human_line(&self) -> String {
        format!(
            "BENCH:fibonacci:{}:{}:{}",
            self.name, self.result, self.elapsed_ms
        )
    }

    pub fn json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Error running a case
#[derive(Debug)]
pub enum BenchError {
    Index(FibError),
    /// The exported entry point reported an error
    Runtime(String),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchError::Index(e) => write!(f, "{}", e),
            BenchError::Runtime(msg) => write!(f, "runtime error: {}", msg),
        }
    }
}

impl std::error::Error for BenchError {}

impl From<FibError> for BenchError {
    fn from(e: FibError) -> Self {
        BenchError::Index(e)
    }
}

/// Naive activations for F(n): 2 * F(n + 1) - 1, when that fits
fn naive_calls(n: i64) -> Option<u64> {
    if !(0..=91).contains(&n) {
        return None;
    }
    let next = Algorithm::Iterative.evaluate(n + 1) as u64;
    next.checked_mul(2).map(|c| c - 1)
}

fn evaluate(engine: Engine, case: &BenchCase) -> Result<i64, BenchError> {
    let n = black_box(case.n);
    match (engine, case.bits, case.algorithm) {
        (Engine::Exported, Bits::B32, Algorithm::Naive) => {
            let n = crate::width::narrow(n)?;
            Ok(i64::from(fib_runtime::compute(n)))
        }
        (Engine::Exported, Bits::B64, algorithm) => {
            fib_runtime::clear_runtime_error();
            let v = fib_runtime::compute_with(algorithm.code(), n);
            match fib_runtime::take_runtime_error() {
                Some(msg) => Err(BenchError::Runtime(msg)),
                None => Ok(v),
            }
        }
        (_, bits, algorithm) => Ok(bits.evaluate(algorithm, n)?),
    }
}

/// Run a single case
///
/// A case that cannot go through the requested engine runs direct and its
/// name gets a `-direct` suffix.
pub fn run_case(engine: Engine, case: &BenchCase) -> Result<BenchResult, BenchError> {
    let expected = case.bits.evaluate(Algorithm::Iterative, case.n)?;
    let routed = case.route(engine);
    let mut name = case.name();
    if routed != engine {
        warn!(name = %name, "no exported entry point at this width, running direct");
        name.push_str("-direct");
    }
    let engine = routed;
    debug!(name = %name, ?engine, "running case");

    let iterations = case.iterations.max(1);
    let start = Instant::now();
    let mut result = 0;
    for _ in 0..iterations {
        result = black_box(evaluate(engine, case)?);
    }
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let calls = if case.algorithm.is_exponential() {
        naive_calls(case.n)
    } else {
        None
    };

    let bench = BenchResult {
        program: "fibonacci",
        name,
        algorithm: case.algorithm,
        n: case.n,
        bits: case.bits.count(),
        result,
        expected,
        iterations,
        calls,
        elapsed_ms,
    };
    if !bench.passed() {
        warn!(name = %bench.name, expected, result, "result mismatch");
    }
    Ok(bench)
}

/// Write one finished case, followed by an `ERROR:` line on a mismatch
pub fn write_result(result: &BenchResult, json: bool, out: &mut impl Write) -> io::Result<()> {
    if json {
        writeln!(out, "{}", result.json_line())?;
    } else {
        writeln!(out, "{}", result.human_line())?;
    }
    if !result.passed() {
        writeln!(out, "ERROR: expected {}, got {}", result.expected, result.result)?;
    }
    Ok(())
}

/// Tally of a benchmark run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BenchOutcome {
    pub cases: usize,
    /// Cases that mismatched or could not run
    pub failed: usize,
}

impl BenchOutcome {
    pub fn passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for the run
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

/// Run every case in order, writing each result to `out` as it finishes
pub fn run_cases(
    engine: Engine,
    cases: &[BenchCase],
    json: bool,
    out: &mut impl Write,
) -> io::Result<BenchOutcome> {
    let mut outcome = BenchOutcome::default();
    for case in cases {
        outcome.cases += 1;
        match run_case(engine, case) {
            Ok(result) => {
                write_result(&result, json, out)?;
                if !result.passed() {
                    outcome.failed += 1;
                }
            }
            Err(e) => {
                error!(name = %case.name(), "{}", e);
                outcome.failed += 1;
            }
        }
    }
    Ok(outcome)
}

/// Cartesian product of algorithms and indices, in that order
pub fn plan(algorithms: &[Algorithm], ns: &[i64], bits: Bits, iterations: u32) -> Vec<BenchCase> {
    algorithms
        .iter()
        .flat_map(|&algorithm| {
            ns.iter().map(move |&n| BenchCase {
                algorithm,
                n,
                bits,
                iterations,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(algorithm: Algorithm, n: i64, bits: Bits, iterations: u32) -> BenchCase {
        BenchCase {
            algorithm,
            n,
            bits,
            iterations,
        }
    }

    #[test]
    fn test_case_names() {
        assert_eq!(case(Algorithm::Naive, 30, Bits::B64, 1).name(), "fib-naive-30");
        assert_eq!(
            case(Algorithm::Naive, 20, Bits::B64, 1000).name(),
            "fib-naive-20-x1000"
        );
        assert_eq!(
            case(Algorithm::Matrix, 47, Bits::B32, 1).name(),
            "fib-matrix-47-i32"
        );
    }

    #[test]
    fn test_run_case_direct() {
        let result =
            run_case(Engine::Direct, &case(Algorithm::Naive, 20, Bits::B64, 3)).unwrap();
        assert!(result.passed());
        assert_eq!(result.result, 6765);
        assert_eq!(result.iterations, 3);
        // 2 * F(21) - 1
        assert_eq!(result.calls, Some(2 * 10946 - 1));
        assert_eq!(
            result.human_line(),
            format!("BENCH:fibonacci:fib-naive-20-x3:6765:{}", result.elapsed_ms)
        );
    }

    #[test]
    fn test_run_case_exported() {
        for algorithm in Algorithm::ALL {
            let result = run_case(Engine::Exported, &case(algorithm, 15, Bits::B64, 1)).unwrap();
            assert_eq!(result.result, 610, "{}", algorithm);
            assert!(result.passed());
        }
        let result = run_case(Engine::Exported, &case(Algorithm::Naive, 15, Bits::B32, 1)).unwrap();
        assert_eq!(result.result, 610);
        assert_eq!(result.name, "fib-naive-15-i32");
    }

    #[test]
    fn test_unexported_32_bit_case_is_marked_direct() {
        let c = case(Algorithm::Matrix, 15, Bits::B32, 1);
        assert_eq!(c.route(Engine::Exported), Engine::Direct);
        assert_eq!(c.route(Engine::Direct), Engine::Direct);

        let result = run_case(Engine::Exported, &c).unwrap();
        assert_eq!(result.name, "fib-matrix-15-i32-direct");
        assert_eq!(result.result, 610);

        let result = run_case(Engine::Direct, &c).unwrap();
        assert_eq!(result.name, "fib-matrix-15-i32");
    }

    #[test]
    fn test_fast_variants_have_no_call_count() {
        let result =
            run_case(Engine::Direct, &case(Algorithm::Iterative, 70, Bits::B64, 1)).unwrap();
        assert_eq!(result.result, 190392490709135);
        assert_eq!(result.calls, None);
    }

    #[test]
    fn test_index_outside_width_is_error() {
        let err = run_case(Engine::Direct, &case(Algorithm::Naive, 1 << 33, Bits::B32, 1));
        assert!(matches!(err, Err(BenchError::Index(FibError::Overflow { .. }))));
    }

    #[test]
    fn test_json_line_fields() {
        let result = run_case(Engine::Direct, &case(Algorithm::Matrix, 10, Bits::B32, 1)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.json_line()).unwrap();
        assert_eq!(json["program"], "fibonacci");
        assert_eq!(json["algorithm"], "matrix");
        assert_eq!(json["bits"], 32);
        assert_eq!(json["result"], 55);
        assert!(json["calls"].is_null());
    }

    fn mismatched() -> BenchResult {
        BenchResult {
            program: "fibonacci",
            name: "fib-naive-10".to_string(),
            algorithm: Algorithm::Naive,
            n: 10,
            bits: 64,
            result: 54,
            expected: 55,
            iterations: 1,
            calls: Some(177),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_mismatch_writes_error_line() {
        let mut out = Vec::new();
        write_result(&mismatched(), false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "BENCH:fibonacci:fib-naive-10:54:0\nERROR: expected 55, got 54\n"
        );

        let mut out = Vec::new();
        write_result(&mismatched(), true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "ERROR: expected 55, got 54");
    }

    #[test]
    fn test_passing_result_writes_one_line() {
        let mut result = mismatched();
        result.result = 55;
        let mut out = Vec::new();
        write_result(&result, false, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "BENCH:fibonacci:fib-naive-10:55:0\n");
    }

    #[test]
    fn test_run_cases_exit_codes() {
        let mut out = Vec::new();
        let cases = plan(&[Algorithm::Naive, Algorithm::Matrix], &[5, 12], Bits::B64, 1);
        let outcome = run_cases(Engine::Direct, &cases, false, &mut out).unwrap();
        assert_eq!(outcome, BenchOutcome { cases: 4, failed: 0 });
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);

        let mut out = Vec::new();
        let cases = plan(&[Algorithm::Naive], &[5, 1 << 33], Bits::B32, 1);
        let outcome = run_cases(Engine::Direct, &cases, false, &mut out).unwrap();
        assert_eq!(outcome, BenchOutcome { cases: 2, failed: 1 });
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_plan_order() {
        let cases = plan(&[Algorithm::Naive, Algorithm::Matrix], &[5, 6], Bits::B64, 1);
        let names: Vec<_> = cases.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            ["fib-naive-5", "fib-naive-6", "fib-matrix-5", "fib-matrix-6"]
        );
    }
}
