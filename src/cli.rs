//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for the `walk` and `verify` subcommands: argument
//! resolution, progress wiring, output, and summary logging.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use rug::Integer;
use tracing::info;

use primewalk::progress::Progress;
use primewalk::progression;
use primewalk::table::ModulusTable;
use primewalk::verify::{self, VerifyReport};
use primewalk::{ntt_stride, parse_integer, MillerRabin};

use super::Cli;

// ── Walk ────────────────────────────────────────────────────────

/// Run the prime walk: derive the stride from log_n, hunt `count` primes in
/// the progression, and stream them to stdout as a grouped modulus table.
pub fn run_walk(
    cli: &Cli,
    log_n: u32,
    start: &str,
    count: u64,
    descending: bool,
    per_line: usize,
    max_steps: u64,
) -> Result<()> {
    let start = parse_integer(start)?;
    let mut stride = ntt_stride(log_n)?;
    if descending {
        stride = -stride;
    }

    let params = serde_json::json!({
        "log_n": log_n,
        "start": format!("{:#x}", start),
        "stride": format!("{:#x}", stride),
        "count": count,
        "per_line": per_line,
        "max_steps": max_steps,
    });
    info!(
        mr_rounds = cli.mr_rounds,
        params = %params,
        "primewalk starting"
    );

    let test = MillerRabin::new(cli.mr_rounds);
    let progress = Progress::new();
    let reporter_handle = progress.start_reporter();

    let stdout = std::io::stdout();
    let mut table = ModulusTable::new(stdout.lock(), per_line);

    let walk_start = Instant::now();
    let outcome = progression::search(
        &start,
        &stride,
        count,
        max_steps,
        &test,
        &progress,
        &mut table,
    );
    // Close a partial line even when the walk errors out mid-row
    table.finish()?;

    progress.stop();
    let _ = reporter_handle.join();

    let outcome = outcome?;
    info!(
        found = outcome.primes.len() as u64,
        tested = progress.tested.load(Ordering::Relaxed),
        last_k = outcome.steps,
        elapsed = format_args!("{:.2}s", walk_start.elapsed().as_secs_f64()),
        "walk complete"
    );
    Ok(())
}

// ── Verify ──────────────────────────────────────────────────────

/// Re-check candidate moduli gathered from positional arguments, a file, or
/// stdin. Prints one line per value (or a JSON report) and fails when any
/// value is composite or misses the congruence.
pub fn run_verify(
    cli: &Cli,
    values: &[String],
    log_n: u32,
    file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let stride = ntt_stride(log_n)?;
    let shift = log_n + 1;

    let mut parsed: Vec<Integer> = Vec::new();
    if let Some(path) = file {
        let text = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| anyhow!("cannot read {}: {}", path.display(), e))?
        };
        parsed.extend(verify::parse_value_list(&text)?);
    }
    for v in values {
        parsed.push(parse_integer(v)?);
    }
    if parsed.is_empty() {
        bail!("no values to verify (pass values as arguments or via --file)");
    }

    let test = MillerRabin::new(cli.mr_rounds);
    let results = verify::verify_all(&parsed, log_n, &test);
    let total = results.len();
    let failed = results.iter().filter(|r| !r.ok).count() as u64;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        let report = VerifyReport {
            log_n,
            stride: format!("{:#x}", stride),
            results,
            failed,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        for r in &results {
            let primality = if r.prime {
                format!("prime ({})", r.certainty)
            } else {
                "composite".to_string()
            };
            let congruence = if r.ntt_friendly {
                format!("1 mod 2^{}", shift)
            } else {
                format!("not 1 mod 2^{}", shift)
            };
            let verdict = if r.ok { "ok" } else { "FAIL" };
            writeln!(
                out,
                "{:<20} {:>3} bits  {:<22} {:<16} {}",
                r.value, r.bits, primality, congruence, verdict
            )?;
        }
        out.flush()?;
    }

    if failed > 0 {
        bail!("{} of {} values failed verification", failed, total);
    }
    info!(verified = total as u64, log_n, "all values verified");
    Ok(())
}
