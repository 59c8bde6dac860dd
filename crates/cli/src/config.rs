//! CLI configuration file
//!
//! An optional TOML file supplies defaults that command-line flags override:
//!
//! ```toml
//! algorithm = "naive"
//! bits = 64
//!
//! [bench]
//! n = [20, 25, 30]
//! iterations = 1
//! algorithms = ["naive", "iterative"]
//!
//! [verify]
//! max = 30
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos don't pass
//! silently.

use crate::width::Bits;
use fib_core::Algorithm;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Algorithm for `compute` when `--algorithm` is not given
    pub algorithm: Algorithm,
    /// Width for `compute` and `bench` when `--bits` is not given
    pub bits: Bits,
    pub bench: BenchConfig,
    pub verify: VerifyConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Indices to benchmark
    pub n: Vec<i64>,
    /// Repetitions per case
    pub iterations: u32,
    pub algorithms: Vec<Algorithm>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Largest index the properties are checked up to
    pub max: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::Naive,
            bits: Bits::B64,
            bench: BenchConfig::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            n: vec![20, 25, 30],
            iterations: 1,
            algorithms: vec![Algorithm::Naive, Algorithm::Iterative],
        }
    }
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig { max: 30 }
    }
}

/// Error loading a config file
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl Config {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
