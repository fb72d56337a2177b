//! # Main — CLI Entry Point
//!
//! Parses arguments and routes to the walk and verify subcommands. Handles
//! shared concerns: env bootstrap, structured logging, and the global
//! Miller-Rabin round count.
//!
//! ## Subcommands
//!
//! - `walk`: hunt primes along `start + k * 2^(logN+1)` and print each one
//!   as a grouped hexadecimal modulus table. Running with no subcommand is
//!   equivalent to `walk` with its defaults (logN=16, start=2^44+1, one
//!   prime).
//! - `verify`: re-check candidate moduli for primality and NTT-friendliness.
//!
//! ## Global Options
//!
//! - `--mr-rounds` / `PRIMEWALK_MR_ROUNDS`: Miller-Rabin iterations (default 15).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use primewalk::progression::{DEFAULT_COUNT, DEFAULT_LOG_N, DEFAULT_START};
use primewalk::table::DEFAULT_PER_LINE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "primewalk",
    about = "Hunt for NTT-friendly prime moduli along an arithmetic progression"
)]
struct Cli {
    /// Miller-Rabin rounds for primality testing (default: 15, higher = more certain but slower)
    #[arg(long, env = "PRIMEWALK_MR_ROUNDS", default_value_t = 15)]
    mr_rounds: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk start + k*2^(logN+1) and print each prime found as a hex modulus table
    Walk {
        /// Ring degree exponent logN; candidates stay congruent to 1 mod 2^(logN+1)
        #[arg(long, default_value_t = DEFAULT_LOG_N)]
        log_n: u32,
        /// Walk origin (0x/0o/0b prefix or decimal); the origin itself is never tested
        #[arg(long, default_value = DEFAULT_START)]
        start: String,
        /// Number of primes to collect before stopping
        #[arg(long, default_value_t = DEFAULT_COUNT)]
        count: u64,
        /// Walk downward from the origin instead of upward
        #[arg(long)]
        descending: bool,
        /// Moduli printed per output line
        #[arg(long, default_value_t = DEFAULT_PER_LINE)]
        per_line: usize,
        /// Abort after testing this many candidates (0 = unbounded)
        #[arg(long, default_value_t = 0)]
        max_steps: u64,
    },
    /// Re-check candidate moduli for primality and NTT-friendliness
    Verify {
        /// Values to verify (0x/0o/0b prefix or decimal)
        values: Vec<String>,
        /// Ring degree exponent logN for the congruence check
        #[arg(long, default_value_t = DEFAULT_LOG_N)]
        log_n: u32,
        /// Read values from a file ("-" for stdin); commas, whitespace and #-or-//-comments allowed
        #[arg(long)]
        file: Option<PathBuf>,
        /// Emit the report as JSON instead of aligned text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for machine logs,
    // human-readable otherwise. Logs always go to stderr; stdout carries
    // nothing but the modulus table.
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match cli.command.as_ref() {
        // Bare invocation: the classic hunt for the first prime above 2^44
        None => cli::run_walk(
            &cli,
            DEFAULT_LOG_N,
            DEFAULT_START,
            DEFAULT_COUNT,
            false,
            DEFAULT_PER_LINE,
            0,
        ),
        Some(Commands::Walk {
            log_n,
            start,
            count,
            descending,
            per_line,
            max_steps,
        }) => cli::run_walk(
            &cli,
            *log_n,
            start,
            *count,
            *descending,
            *per_line,
            *max_steps,
        ),
        Some(Commands::Verify {
            values,
            log_n,
            file,
            json,
        }) => cli::run_verify(&cli, values, *log_n, file.as_deref(), *json),
    }
}
