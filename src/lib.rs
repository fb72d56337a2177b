pub mod progress;
pub mod progression;
pub mod table;
pub mod verify;

use anyhow::{anyhow, Result};
use rug::integer::IsPrime;
use rug::Integer;

/// Trait for primality backends. The walk loop takes `&dyn PrimalityTest` so
/// the testing strategy can be swapped without touching the search code.
pub trait PrimalityTest: Send + Sync {
    fn test(&self, candidate: &Integer) -> IsPrime;
}

/// Small primes for trial division pre-filter.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];

/// Quick check if n is divisible by any small prime.
/// Returns true if n is definitely composite (has a small factor).
/// Returns false if n might be prime (passed trial division).
pub fn has_small_factor(n: &Integer) -> bool {
    for &p in &SMALL_PRIMES {
        if n.is_divisible_u(p) {
            // If n equals the small prime itself, it's prime, not composite
            return n > &Integer::from(p);
        }
    }
    false
}

/// Trial division pre-filter followed by GMP's Miller-Rabin with a
/// configurable round count. Verdicts are stable for a fixed input, so
/// repeated runs over the same progression emit the same moduli.
pub struct MillerRabin {
    rounds: u32,
}

impl MillerRabin {
    pub fn new(rounds: u32) -> Self {
        MillerRabin { rounds }
    }
}

impl PrimalityTest for MillerRabin {
    fn test(&self, candidate: &Integer) -> IsPrime {
        if *candidate < 2u32 {
            return IsPrime::No;
        }
        if has_small_factor(candidate) {
            return IsPrime::No;
        }
        candidate.is_probably_prime(self.rounds)
    }
}

/// Parse an integer literal with an optional radix prefix: `0x` hex, `0o`
/// octal, `0b` binary, plain decimal otherwise.
pub fn parse_integer(s: &str) -> Result<Integer> {
    let t = s.trim();
    let (digits, radix) = match t.get(..2) {
        Some("0x") | Some("0X") => (&t[2..], 16),
        Some("0o") | Some("0O") => (&t[2..], 8),
        Some("0b") | Some("0B") => (&t[2..], 2),
        _ => (t, 10),
    };
    Integer::from_str_radix(digits, radix).map_err(|_| anyhow!("invalid integer literal: {}", s))
}

/// Distance between NTT-friendly candidates for ring degree 2^log_n.
/// A negacyclic NTT modulus must be 1 mod 2^(log_n+1), so consecutive
/// candidates differ by 2^(log_n+1).
pub fn ntt_stride(log_n: u32) -> Result<Integer> {
    let shift = log_n
        .checked_add(1)
        .ok_or_else(|| anyhow!("ring degree exponent {} is out of range", log_n))?;
    Ok(Integer::from(1u32) << shift)
}
