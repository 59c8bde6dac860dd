//! fibc: benchmark and verify the naive Fibonacci computation
//!
//! # Modules
//!
//! - `bench`: timed cases, `BENCH:` lines or JSON
//! - `verify`: property checks at both widths
//! - `config`: optional TOML defaults
//! - `width`: 32/64-bit selection

pub mod bench;
pub mod config;
pub mod verify;
pub mod width;

pub use bench::{BenchCase, BenchOutcome, BenchResult, Engine, plan, run_case, run_cases};
pub use config::{Config, ConfigError};
pub use verify::{VerifyReport, verify};
pub use width::Bits;
