//! Usage report for the exported entry points
//!
//! Dumps call counts and time spent when the host asks for it (`fib_report`),
//! controlled by the `FIB_REPORT` env var:
//! - Unset → no report, zero cost
//! - `1` → human-readable to stderr
//! - `json` → JSON to stderr
//! - `json:/path` → JSON to file
//!
//! ## Feature Flag
//!
//! JSON output requires the `report-json` feature (enabled by default).
//! Without it a JSON request falls back to the human format.

use crate::stats::{self, BUSY_NANOS, Entry, TOTAL_ERRORS};
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::Ordering;

// =============================================================================
// Report Configuration (parsed from FIB_REPORT env var)
// =============================================================================

/// Output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
}

/// Output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Stderr,
    File(String),
}

/// Parsed report configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub destination: ReportDestination,
}

impl ReportConfig {
    /// Parse from FIB_REPORT environment variable
    pub fn from_env() -> Option<Self> {
        let val = std::env::var("FIB_REPORT").ok()?;
        Self::parse(&val)
    }

    /// Parse a FIB_REPORT value
    pub fn parse(val: &str) -> Option<Self> {
        match val {
            "" | "0" => None,
            "1" => Some(ReportConfig {
                format: ReportFormat::Human,
                destination: ReportDestination::Stderr,
            }),
            "json" => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::Stderr,
            }),
            s if s.starts_with("json:") => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::File(s[5..].to_string()),
            }),
            _ => {
                eprintln!("Warning: FIB_REPORT='{}' not recognized, ignoring", val);
                None
            }
        }
    }
}

static REPORT_CONFIG: OnceLock<Option<ReportConfig>> = OnceLock::new();

fn get_report_config() -> &'static Option<ReportConfig> {
    REPORT_CONFIG.get_or_init(ReportConfig::from_env)
}

// =============================================================================
// Report Data
// =============================================================================

/// Collected metrics for the report
#[derive(Debug)]
pub struct ReportData {
    pub wall_clock_ms: u64,
    pub busy_ms: u64,
    pub total_calls: u64,
    pub total_errors: u64,
    pub entry_counts: Vec<(&'static str, u64)>,
}

/// Snapshot the counters
pub fn collect_report_data() -> ReportData {
    let wall_clock_ms = stats::since_first_call()
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    ReportData {
        wall_clock_ms,
        busy_ms: BUSY_NANOS.load(Ordering::Relaxed) / 1_000_000,
        total_calls: stats::total_calls(),
        total_errors: TOTAL_ERRORS.load(Ordering::Relaxed),
        entry_counts: Entry::ALL
            .iter()
            .map(|e| (e.symbol(), stats::calls(*e)))
            .collect(),
    }
}

// =============================================================================
// Formatting
// =============================================================================

pub fn format_human(data: &ReportData) -> String {
    let mut out = String::new();
    out.push_str("=== FIB REPORT ===\n");
    out.push_str(&format!("Wall clock:  {} ms\n", data.wall_clock_ms));
    out.push_str(&format!("Busy:        {} ms\n", data.busy_ms));
    out.push_str(&format!("Calls:       {}\n", data.total_calls));
    out.push_str(&format!("Errors:      {}\n", data.total_errors));

    out.push_str("\n--- Calls per Entry Point ---\n");
    for (name, count) in &data.entry_counts {
        out.push_str(&format!("  {:22} {}\n", name, count));
    }

    out.push_str("==================\n");
    out
}

#[cfg(feature = "report-json")]
pub fn format_json(data: &ReportData) -> String {
    let entries: serde_json::Map<String, serde_json::Value> = data
        .entry_counts
        .iter()
        .map(|(name, count)| (name.to_string(), serde_json::Value::from(*count)))
        .collect();

    let obj = serde_json::json!({
        "wall_clock_ms": data.wall_clock_ms,
        "busy_ms": data.busy_ms,
        "calls": data.total_calls,
        "errors": data.total_errors,
        "entry_counts": entries,
    });
    serde_json::to_string(&obj).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(not(feature = "report-json"))]
pub fn format_json(data: &ReportData) -> String {
    eprintln!(
        "Warning: FIB_REPORT=json requires the 'report-json' feature. Falling back to human format."
    );
    format_human(data)
}

// =============================================================================
// Emit
// =============================================================================

/// Write the report described by `config`
pub fn emit_report_to(config: &ReportConfig) {
    let data = collect_report_data();

    let output = match config.format {
        ReportFormat::Human => format_human(&data),
        ReportFormat::Json => format_json(&data),
    };

    match &config.destination {
        ReportDestination::Stderr => {
            let _ = std::io::stderr().write_all(output.as_bytes());
        }
        ReportDestination::File(path) => {
            if let Ok(mut f) = std::fs::File::create(path) {
                let _ = f.write_all(output.as_bytes());
            } else {
                eprintln!("Warning: could not write report to {}", path);
                let _ = std::io::stderr().write_all(output.as_bytes());
            }
        }
    }
}

fn emit_report() {
    if let Some(config) = get_report_config() {
        emit_report_to(config);
    }
}

// =============================================================================
// FFI Entry Points
// =============================================================================

/// Usage report, called by the host when it unloads the library or exits
///
/// Does nothing unless `FIB_REPORT` is set.
#[unsafe(no_mangle)]
pub extern "C" fn fib_report() {
    emit_report();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_variants() {
        let test_cases = vec![
            ("", None),
            ("0", None),
            ("1", Some((ReportFormat::Human, ReportDestination::Stderr))),
            ("json", Some((ReportFormat::Json, ReportDestination::Stderr))),
            (
                "json:/tmp/report.json",
                Some((
                    ReportFormat::Json,
                    ReportDestination::File("/tmp/report.json".to_string()),
                )),
            ),
            ("yaml", None),
        ];

        for (input, expected) in test_cases {
            let result = ReportConfig::parse(input).map(|c| (c.format, c.destination));
            assert_eq!(result, expected, "Failed for input: {:?}", input);
        }
    }

    #[test]
    fn test_format_human() {
        let data = ReportData {
            wall_clock_ms: 12,
            busy_ms: 10,
            total_calls: 3,
            total_errors: 1,
            entry_counts: vec![("fib_compute", 2), ("fib_try_compute", 1)],
        };
        let out = format_human(&data);
        assert!(out.contains("=== FIB REPORT ==="));
        assert!(out.contains("Calls:       3"));
        assert!(out.contains("Errors:      1"));
        assert!(out.contains("fib_compute"));
        assert!(out.ends_with("==================\n"));
    }

    #[cfg(feature = "report-json")]
    #[test]
    fn test_format_json() {
        let data = ReportData {
            wall_clock_ms: 5,
            busy_ms: 4,
            total_calls: 2,
            total_errors: 0,
            entry_counts: vec![("fib_compute", 2)],
        };
        let out = format_json(&data);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["calls"], 2);
        assert_eq!(parsed["errors"], 0);
        assert_eq!(parsed["entry_counts"]["fib_compute"], 2);
    }
}
