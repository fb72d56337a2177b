use anyhow::Result;
use rug::integer::IsPrime;
use rug::Integer;
use serde::Serialize;

use crate::{parse_integer, PrimalityTest};

/// Verdict for a single candidate modulus.
#[derive(Debug, Clone, Serialize)]
pub struct ModulusReport {
    pub value: String,
    pub bits: u32,
    pub prime: bool,
    pub certainty: &'static str,
    pub ntt_friendly: bool,
    pub ok: bool,
}

/// Whole-run report, serialized when the `--json` flag is set.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub log_n: u32,
    pub stride: String,
    pub results: Vec<ModulusReport>,
    pub failed: u64,
}

/// Check each value for primality and for the congruence an NTT modulus of
/// ring degree 2^log_n must satisfy.
pub fn verify_all(values: &[Integer], log_n: u32, test: &dyn PrimalityTest) -> Vec<ModulusReport> {
    values.iter().map(|v| verify_one(v, log_n, test)).collect()
}

fn verify_one(value: &Integer, log_n: u32, test: &dyn PrimalityTest) -> ModulusReport {
    let (prime, certainty) = match test.test(value) {
        IsPrime::Yes => (true, "deterministic"),
        IsPrime::Probably => (true, "probabilistic"),
        IsPrime::No => (false, "composite"),
    };
    let ntt_friendly = is_ntt_friendly(value, log_n);
    ModulusReport {
        value: format!("{:#x}", value),
        bits: value.significant_bits(),
        prime,
        certainty,
        ntt_friendly,
        ok: prime && ntt_friendly,
    }
}

/// True when value is 1 mod 2^(log_n+1), i.e. usable as a negacyclic NTT
/// modulus for ring degree 2^log_n.
pub fn is_ntt_friendly(value: &Integer, log_n: u32) -> bool {
    let shift = match log_n.checked_add(1) {
        Some(s) => s,
        None => return false,
    };
    Integer::from(value.keep_bits_ref(shift)) == 1u32
}

/// Parse a list of integer literals separated by commas and/or whitespace.
/// `#` and `//` start a comment running to end of line, so a row pasted from
/// a parameter table or from this tool's own output verifies as-is.
pub fn parse_value_list(input: &str) -> Result<Vec<Integer>> {
    let mut values = Vec::new();
    for line in input.lines() {
        let line = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        let line = match line.find("//") {
            Some(i) => &line[..i],
            None => line,
        };
        for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            values.push(parse_integer(token)?);
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MillerRabin;

    fn check(value: &str, log_n: u32) -> ModulusReport {
        let v = parse_integer(value).unwrap();
        let test = MillerRabin::new(25);
        verify_all(std::slice::from_ref(&v), log_n, &test).remove(0)
    }

    #[test]
    fn historical_modulus_verifies() {
        let r = check("0xffff00001", 16);
        assert!(r.prime);
        assert!(r.ntt_friendly);
        assert!(r.ok);
        assert_eq!(r.bits, 36);
        assert_eq!(r.value, "0xffff00001");
    }

    #[test]
    fn congruent_composite_fails() {
        // (2^17 + 1)^2: congruent to 1 mod 2^18 but not prime
        let r = check("0x400040001", 16);
        assert!(!r.prime);
        assert_eq!(r.certainty, "composite");
        assert!(r.ntt_friendly);
        assert!(!r.ok);
    }

    #[test]
    fn prime_with_wrong_congruence_fails() {
        let r = check("65537", 16);
        assert!(r.prime);
        assert!(!r.ntt_friendly);
        assert!(!r.ok);
    }

    #[test]
    fn congruence_tracks_log_n() {
        // 0xffffffffffc0001 - 1 is divisible by 2^18 but not by 2^19
        let v = parse_integer("0xffffffffffc0001").unwrap();
        assert!(is_ntt_friendly(&v, 16));
        assert!(is_ntt_friendly(&v, 17));
        assert!(!is_ntt_friendly(&v, 18));
    }

    #[test]
    fn values_below_two_report_composite() {
        for s in ["0", "1"] {
            let r = check(s, 16);
            assert!(!r.prime, "{} reported prime", s);
            assert!(!r.ok);
        }
    }

    #[test]
    fn value_list_accepts_commas_whitespace_and_comments() {
        let text = "# header\n0xffff00001, 0xfff9c0001,\n0xfff8e0001 0xfff840001 // tail\n\n";
        let values = parse_value_list(text).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[0], Integer::from(0xffff00001u64));
        assert_eq!(values[3], Integer::from(0xfff840001u64));
    }

    #[test]
    fn value_list_rejects_bad_tokens() {
        assert!(parse_value_list("0xffff00001, banana").is_err());
    }

    #[test]
    fn report_serializes_for_the_json_flag() {
        let r = check("0xffff00001", 16);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"ntt_friendly\":true"));
        assert!(json.contains("\"value\":\"0xffff00001\""));
    }
}
