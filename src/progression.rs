use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{bail, Result};
use rug::integer::IsPrime;
use rug::Integer;
use tracing::info;

use crate::progress::Progress;
use crate::table::ModulusTable;
use crate::PrimalityTest;

/// Default ring degree exponent: candidates are 1 mod 2^17.
pub const DEFAULT_LOG_N: u32 = 16;
/// Default walk origin, 2^44 + 1.
pub const DEFAULT_START: &str = "0x100000000001";
/// Default number of primes to collect.
pub const DEFAULT_COUNT: u64 = 1;

/// The current-candidate string shown by the progress reporter is refreshed
/// at this cadence, not on every step.
const CURRENT_UPDATE_EVERY: u64 = 4096;

#[derive(Debug)]
pub struct WalkOutcome {
    /// Primes in discovery order, exactly `count` of them on success.
    pub primes: Vec<Integer>,
    /// Candidates tested. The walk stops on the final find, so on success
    /// this is the k of the last prime.
    pub steps: u64,
}

/// Walk start + k*stride for k = 1, 2, 3, ... and collect the first `count`
/// primes, streaming each one to `table` as it is found. The origin itself
/// is never tested. `max_steps` of 0 means unbounded.
pub fn search<W: Write>(
    start: &Integer,
    stride: &Integer,
    count: u64,
    max_steps: u64,
    test: &dyn PrimalityTest,
    progress: &Arc<Progress>,
    table: &mut ModulusTable<W>,
) -> Result<WalkOutcome> {
    validate(start, stride)?;

    let descending = *stride < 0u32;
    let mut candidate = start.clone();
    let mut primes = Vec::new();
    let mut steps: u64 = 0;

    while (primes.len() as u64) < count {
        if max_steps > 0 && steps >= max_steps {
            bail!(
                "step budget of {} exhausted after finding {} of {} primes",
                max_steps,
                primes.len(),
                count
            );
        }
        candidate += stride;
        steps += 1;

        if descending && candidate <= 1u32 {
            bail!(
                "walk exhausted below 2 after finding {} of {} primes",
                primes.len(),
                count
            );
        }

        progress.tested.fetch_add(1, Ordering::Relaxed);
        if steps % CURRENT_UPDATE_EVERY == 1 {
            *progress.current.lock().unwrap() = format!("{:#x} (k={})", candidate, steps);
        }

        let verdict = test.test(&candidate);
        if verdict != IsPrime::No {
            let certainty = match verdict {
                IsPrime::Yes => "deterministic",
                IsPrime::Probably => "probabilistic",
                IsPrime::No => unreachable!(),
            };
            progress.found.fetch_add(1, Ordering::Relaxed);
            table.push(&candidate)?;
            info!(
                modulus = format_args!("{:#x}", candidate),
                bits = candidate.significant_bits(),
                k = steps,
                certainty,
                "prime found"
            );
            primes.push(candidate.clone());
        }
    }

    Ok(WalkOutcome { primes, steps })
}

/// Reject progressions that cannot produce primes: a zero stride revisits
/// the origin forever, and a shared factor between start and stride divides
/// every candidate.
fn validate(start: &Integer, stride: &Integer) -> Result<()> {
    if *stride == 0u32 {
        bail!("stride must be nonzero");
    }
    if *start < 0u32 {
        bail!("start must be non-negative, got {}", start);
    }
    let stride_abs = Integer::from(stride.abs_ref());
    let g = Integer::from(start.gcd_ref(&stride_abs));
    if g > 1u32 {
        bail!(
            "start {:#x} and stride {:#x} share factor {}; every candidate is divisible by it",
            start,
            stride_abs,
            g
        );
    }
    Ok(())
}
