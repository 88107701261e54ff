//! BoulderIO encoding of [`DesignParameters`] for primer3.
//!
//! The layout is fixed: one `KEY=VALUE` per line, in the order below, closed by
//! a record terminator line holding only `=`. The GC bounds, clamp, number of
//! returned pairs and the secondary internal-oligo exclusion never change; the
//! remaining tags come from the parameters and their derived values.
//!
//! # Examples
//! ```
//! use primerpick::boulder::config_string;
//! use primerpick::params::{DesignParameters, SeqSpan};
//! let p = DesignParameters::new("ACGT".repeat(50), SeqSpan::new(100, 10))
//!     .with_excluded_region(SeqSpan::new(0, 20))
//!     .with_product_size(200, 400);
//! let cfg = config_string(&p);
//! assert!(cfg.lines().any(|l| l == "PRIMER_PRODUCT_SIZE_RANGE=200-400"));
//! assert!(cfg.lines().any(|l| l == "PRIMER_PRODUCT_OPT_SIZE=300"));
//! assert!(cfg.ends_with("\n="));
//! ```
use std::io::Write;

use crate::params::DesignParameters;

/// `SEQUENCE_ID` sent with every request.
pub const SEQUENCE_ID: &str = "example";
/// Upper bound on pairs primer3 returns per request.
pub const NUM_RETURN: u32 = 200;
/// Record terminator.
pub const RECORD_END: &str = "=";

/// Write the primer3 configuration for `p` to `sink`.
///
/// Infallible apart from errors raised by `sink`.
pub fn encode_config<W: Write>(p: &DesignParameters, sink: &mut W) -> std::io::Result<()> {
    writeln!(sink, "SEQUENCE_ID={SEQUENCE_ID}")?;
    writeln!(sink, "SEQUENCE_TEMPLATE={}", p.template)?;
    writeln!(sink, "SEQUENCE_TARGET={}", p.target)?;
    if !p.excluded_regions.is_empty() {
        let spans: Vec<String> = p.excluded_regions.iter().map(ToString::to_string).collect();
        writeln!(sink, "SEQUENCE_EXCLUDED_REGION={}", spans.join(" "))?;
    }
    writeln!(sink, "PRIMER_TASK=pick_detection_primers")?;
    writeln!(sink, "PRIMER_PICK_LEFT_PRIMER=1")?;
    writeln!(sink, "PRIMER_PICK_INTERNAL_OLIGO=0")?;
    writeln!(sink, "PRIMER_PICK_RIGHT_PRIMER=1")?;
    writeln!(sink, "PRIMER_MIN_GC=20.0")?;
    writeln!(sink, "PRIMER_INTERNAL_MIN_GC=20.0")?;
    writeln!(sink, "PRIMER_OPT_GC_PERCENT={}", p.opt_gc_percent)?;
    writeln!(sink, "PRIMER_MAX_GC=80.0")?;
    writeln!(sink, "PRIMER_INTERNAL_MAX_GC=80.0")?;
    writeln!(sink, "PRIMER_WT_GC_PERCENT_LT=0.0")?;
    writeln!(sink, "PRIMER_INTERNAL_WT_GC_PERCENT_LT=0.0")?;
    writeln!(sink, "PRIMER_GC_CLAMP=0")?;
    writeln!(sink, "PRIMER_MAX_END_GC=5")?;
    writeln!(sink, "PRIMER_OPT_SIZE={}", p.opt_primer_length)?;
    writeln!(sink, "PRIMER_MIN_SIZE={}", p.min_primer_size())?;
    writeln!(sink, "PRIMER_MAX_SIZE={}", p.max_primer_size())?;
    writeln!(sink, "PRIMER_MAX_NS_ACCEPTED=0")?;
    writeln!(sink, "PRIMER_PRODUCT_SIZE_RANGE={}", p.product_size_range())?;
    writeln!(sink, "PRIMER_PRODUCT_OPT_SIZE={}", p.opt_product_size())?;
    writeln!(sink, "PRIMER_PAIR_WT_PRODUCT_SIZE_GT=0.1")?;
    writeln!(sink, "PRIMER_PAIR_WT_PRODUCT_SIZE_LT=0.1")?;
    writeln!(sink, "P3_FILE_FLAG=1")?;
    writeln!(sink, "SEQUENCE_INTERNAL_EXCLUDED_REGION=37,21")?;
    writeln!(sink, "PRIMER_EXPLAIN_FLAG=1")?;
    writeln!(sink, "PRIMER_MIN_TM={}", p.min_melting_t)?;
    writeln!(sink, "PRIMER_MAX_TM={}", p.max_melting_t)?;
    writeln!(sink, "PRIMER_NUM_RETURN={NUM_RETURN}")?;
    write!(sink, "{RECORD_END}")?;
    Ok(())
}

/// Encode `p` into an owned string.
pub fn config_string(p: &DesignParameters) -> String {
    let mut buf = Vec::new();
    encode_config(p, &mut buf).expect("writing to Vec<u8> is infallible");
    String::from_utf8(buf).expect("config is built from UTF-8 strings")
}

/// Split BoulderIO lines into `(key, value)` pairs at the first `=`.
///
/// Lines without `=` and the bare record terminator are skipped. Order is kept.
pub fn read_records<S: AsRef<str>>(lines: &[S]) -> Vec<(String, String)> {
    lines
        .iter()
        .filter_map(|l| {
            let l = l.as_ref();
            if l == RECORD_END {
                return None;
            }
            l.split_once('=').map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod boulder_tests {
    use super::*;
    use crate::params::SeqSpan;
    use std::collections::HashMap;

    fn scenario() -> DesignParameters {
        DesignParameters::new("ACGT".repeat(50), SeqSpan::new(100, 10))
            .with_excluded_region(SeqSpan::new(0, 20))
            .with_product_size(200, 400)
    }

    #[test]
    fn layout_is_fixed() {
        let cfg = config_string(&scenario());
        let keys: Vec<&str> = cfg.lines().map(|l| l.split('=').next().unwrap_or("")).collect();
        assert_eq!(keys.first(), Some(&"SEQUENCE_ID"));
        assert_eq!(keys.len(), 32);
        assert_eq!(cfg.lines().last(), Some("="));
        assert_eq!(cfg.lines().nth(3), Some("SEQUENCE_EXCLUDED_REGION=0,20"));
        assert!(cfg.contains("PRIMER_MIN_GC=20.0\nPRIMER_INTERNAL_MIN_GC=20.0\nPRIMER_OPT_GC_PERCENT=50\n"));
        assert!(cfg.contains("SEQUENCE_INTERNAL_EXCLUDED_REGION=37,21\n"));
        assert!(cfg.contains("PRIMER_MIN_TM=58\nPRIMER_MAX_TM=62\nPRIMER_NUM_RETURN=200\n="));
    }

    #[test]
    fn derived_values_survive_round_trip() {
        for (min, max, opt_len) in [(200, 400, 25), (150, 251, 18), (80, 1000, 30)] {
            let p = scenario().with_product_size(min, max).with_opt_primer_length(opt_len);
            let cfg = config_string(&p);
            let lines: Vec<&str> = cfg.lines().collect();
            let kv: HashMap<String, String> = read_records(&lines).into_iter().collect();
            assert_eq!(kv["PRIMER_PRODUCT_SIZE_RANGE"], p.product_size_range());
            assert_eq!(kv["PRIMER_PRODUCT_OPT_SIZE"], p.opt_product_size().to_string());
            assert_eq!(kv["PRIMER_MIN_SIZE"], p.min_primer_size().to_string());
            assert_eq!(kv["PRIMER_MAX_SIZE"], p.max_primer_size().to_string());
            assert_eq!(kv["SEQUENCE_TEMPLATE"], p.template);
            assert_eq!(kv["SEQUENCE_TARGET"], "100,10");
        }
    }

    #[test]
    fn excluded_regions_are_space_separated_or_omitted() {
        let none = DesignParameters::new("ACGT", SeqSpan::new(1, 2));
        assert!(!config_string(&none).contains("SEQUENCE_EXCLUDED_REGION="));
        let two = none.with_excluded_regions([SeqSpan::new(0, 1), SeqSpan::new(3, 1)]);
        assert!(config_string(&two).contains("\nSEQUENCE_EXCLUDED_REGION=0,1 3,1\n"));
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(config_string(&scenario()), config_string(&scenario()));
    }
}
