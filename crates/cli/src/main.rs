//! fibc CLI
//!
//! Command-line interface for computing, benchmarking and verifying the
//! naive Fibonacci computation.

use clap::{CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use fib_core::Algorithm;
use fibc::{Bits, Config, Engine, plan, run_cases, verify};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(ClapParser)]
#[command(name = "fibc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute, benchmark and verify naive recursive Fibonacci", long_about = None)]
struct Cli {
    /// TOML file with default settings
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute F(n)
    Compute {
        /// Sequence index (negative indices are returned unchanged unless --checked)
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// Algorithm to use (naive, iterative, memoized, matrix)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Integer width: 32 (host native) or 64
        #[arg(long)]
        bits: Option<Bits>,

        /// Reject negative indices and overflow instead of wrapping
        #[arg(long, conflicts_with_all = ["algorithm", "count"])]
        checked: bool,

        /// Also print the number of recursive activations (naive only)
        #[arg(long, conflicts_with = "algorithm")]
        count: bool,
    },

    /// Time algorithms over a set of indices
    Bench {
        /// Indices to benchmark (repeatable)
        #[arg(short, long = "n", allow_negative_numbers = true)]
        ns: Vec<i64>,

        /// Algorithms to benchmark (repeatable)
        #[arg(short, long = "algorithm")]
        algorithms: Vec<Algorithm>,

        /// Repetitions per case
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Integer width: 32 (host native) or 64
        #[arg(long)]
        bits: Option<Bits>,

        /// Go through the exported fib_* entry points
        #[arg(long)]
        exported: bool,

        /// One JSON object per case instead of BENCH: lines
        #[arg(long)]
        json: bool,
    },

    /// Check the sequence's laws and compare every algorithm with naive
    Verify {
        /// Largest index to check
        #[arg(long)]
        max: Option<i64>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "fibc=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Compute {
            n,
            algorithm,
            bits,
            checked,
            count,
        } => {
            let bits = bits.unwrap_or(config.bits);
            run_compute(n, algorithm.unwrap_or(config.algorithm), bits, checked, count);
        }
        Commands::Bench {
            ns,
            algorithms,
            iterations,
            bits,
            exported,
            json,
        } => {
            let ns = if ns.is_empty() { config.bench.n } else { ns };
            let algorithms = if algorithms.is_empty() {
                config.bench.algorithms
            } else {
                algorithms
            };
            let iterations = iterations.unwrap_or(config.bench.iterations);
            let engine = if exported {
                Engine::Exported
            } else {
                Engine::Direct
            };
            run_bench(
                &algorithms,
                &ns,
                bits.unwrap_or(config.bits),
                iterations,
                engine,
                json,
            );
        }
        Commands::Verify { max } => {
            run_verify(max.unwrap_or(config.verify.max));
        }
        Commands::Completions { shell } => {
            run_completions(shell);
        }
    }
}

fn run_compute(n: i64, algorithm: Algorithm, bits: Bits, checked: bool, count: bool) {
    let result = if checked {
        bits.try_compute(n).map(|v| v.to_string())
    } else if count {
        bits.compute_counted(n)
            .map(|e| format!("{} ({} calls)", e.value, e.calls))
    } else {
        bits.evaluate(algorithm, n).map(|v| v.to_string())
    };

    match result {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_bench(
    algorithms: &[Algorithm],
    ns: &[i64],
    bits: Bits,
    iterations: u32,
    engine: Engine,
    json: bool,
) {
    let cases = plan(algorithms, ns, bits, iterations);
    info!(cases = cases.len(), %bits, "starting benchmark");

    let outcome = match run_cases(engine, &cases, json, &mut io::stdout().lock()) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("writing benchmark output: {}", e);
            process::exit(1);
        }
    };

    if engine == Engine::Exported {
        fib_runtime::report();
    }
    if !outcome.passed() {
        process::exit(outcome.exit_code());
    }
}

fn run_verify(max: i64) {
    let report = verify(max);
    if let Err(e) = report.write_summary(&mut io::stdout().lock(), &mut io::stderr().lock()) {
        error!("writing verify output: {}", e);
        process::exit(1);
    }
    if !report.passed() {
        process::exit(report.exit_code());
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "fibc", &mut io::stdout());
}
