//! Core types for **design parameters** and template **spans**.
//!
//! A [`DesignParameters`] value is the complete, immutable input to one primer3
//! invocation: the template window, the target that the product must span, the
//! zones primers may not be placed in, and the melting-temperature, GC and
//! product-size bounds. The derived values (product size range, optimum product
//! size, primer size window) are computed here so that the encoder and any
//! reporting code agree on them.
//!
//! # Examples
//! ```
//! use primerpick::params::{DesignParameters, SeqSpan};
//! let p = DesignParameters::new("ACGT".repeat(50), "100,10".parse().unwrap())
//!     .with_excluded_region(SeqSpan::new(0, 20))
//!     .with_product_size(200, 400);
//! assert_eq!(p.product_size_range(), "200-400");
//! assert_eq!(p.opt_product_size(), 300);
//! assert!(p.validate().is_ok());
//! ```
use core::fmt;
use core::str::FromStr;

use crate::error::{PrimerError, Result};

/// Default optimum primer length in bases.
pub const DEFAULT_OPT_PRIMER_LENGTH: u32 = 25;
/// Default optimum primer GC percentage.
pub const DEFAULT_OPT_GC_PERCENT: u32 = 50;
/// Default minimum primer melting temperature (°C).
pub const DEFAULT_MIN_MELTING_T: u32 = 58;
/// Default maximum primer melting temperature (°C).
pub const DEFAULT_MAX_MELTING_T: u32 = 62;
/// Default minimum PCR product size.
pub const DEFAULT_MIN_PRODUCT_SIZE: u32 = 200;
/// Default maximum PCR product size.
pub const DEFAULT_MAX_PRODUCT_SIZE: u32 = 600;

/// Longest primer primer3 accepts for `PRIMER_MAX_SIZE`.
pub const MAX_PRIMER_SIZE: u32 = 36;

/// Distance between the optimum primer length and the accepted min/max length.
const PRIMER_SIZE_SLACK: u32 = 5;

/// A sub-range of the template, `start` is 0-based.
///
/// Rendered and parsed in primer3's `"<start>,<length>"` notation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SeqSpan {
    pub start: usize,
    pub length: usize,
}

impl SeqSpan {
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }
}

impl fmt::Display for SeqSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.length)
    }
}

impl FromStr for SeqSpan {
    type Err = PrimerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PrimerError::Encoding { reason: format!("span '{s}' is not '<start>,<length>'") };
        let (start, length) = s.trim().split_once(',').ok_or_else(invalid)?;
        let start = start.trim().parse::<usize>().map_err(|_| invalid())?;
        let length = length.trim().parse::<usize>().map_err(|_| invalid())?;
        if length == 0 {
            return Err(PrimerError::Encoding { reason: format!("span '{s}' has zero length") });
        }
        Ok(Self { start, length })
    }
}

/// A list of spans separated by `;` or whitespace, e.g. `"0,20;180,20"`.
pub fn parse_spans(s: &str) -> Result<Vec<SeqSpan>> {
    s.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(str::parse)
        .collect()
}

/// Input to one primer design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesignParameters {
    /// Nucleotide window to design within.
    pub template: String,
    /// Region the product must span.
    pub target: SeqSpan,
    /// Regions forbidden for primer placement. May be empty.
    pub excluded_regions: Vec<SeqSpan>,
    pub opt_primer_length: u32,
    pub opt_gc_percent: u32,
    pub min_melting_t: u32,
    pub max_melting_t: u32,
    pub min_product_size: u32,
    pub max_product_size: u32,
}

impl DesignParameters {
    /// Parameters with the default bounds and no excluded region.
    pub fn new(template: impl Into<String>, target: SeqSpan) -> Self {
        Self {
            template: template.into(),
            target,
            excluded_regions: Vec::new(),
            opt_primer_length: DEFAULT_OPT_PRIMER_LENGTH,
            opt_gc_percent: DEFAULT_OPT_GC_PERCENT,
            min_melting_t: DEFAULT_MIN_MELTING_T,
            max_melting_t: DEFAULT_MAX_MELTING_T,
            min_product_size: DEFAULT_MIN_PRODUCT_SIZE,
            max_product_size: DEFAULT_MAX_PRODUCT_SIZE,
        }
    }

    pub fn with_excluded_region(mut self, span: SeqSpan) -> Self {
        self.excluded_regions.push(span);
        self
    }

    pub fn with_excluded_regions(mut self, spans: impl IntoIterator<Item = SeqSpan>) -> Self {
        self.excluded_regions.extend(spans);
        self
    }

    pub fn with_opt_primer_length(mut self, len: u32) -> Self {
        self.opt_primer_length = len;
        self
    }

    pub fn with_opt_gc_percent(mut self, gc: u32) -> Self {
        self.opt_gc_percent = gc;
        self
    }

    pub fn with_melting_temp(mut self, min: u32, max: u32) -> Self {
        self.min_melting_t = min;
        self.max_melting_t = max;
        self
    }

    pub fn with_product_size(mut self, min: u32, max: u32) -> Self {
        self.min_product_size = min;
        self.max_product_size = max;
        self
    }

    /// `"<min>-<max>"`, as primer3 expects for `PRIMER_PRODUCT_SIZE_RANGE`.
    pub fn product_size_range(&self) -> String {
        format!("{}-{}", self.min_product_size, self.max_product_size)
    }

    /// Midpoint of the product size range, truncated.
    pub fn opt_product_size(&self) -> u32 {
        self.min_product_size + self.max_product_size.saturating_sub(self.min_product_size) / 2
    }

    pub fn min_primer_size(&self) -> u32 {
        self.opt_primer_length.saturating_sub(PRIMER_SIZE_SLACK)
    }

    pub fn max_primer_size(&self) -> u32 {
        self.opt_primer_length.saturating_add(PRIMER_SIZE_SLACK)
    }

    /// Check the invariants the encoder relies on.
    ///
    /// Whether the spans fit inside the template is left to primer3, which
    /// reports it through `PRIMER_ERROR`.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(PrimerError::Encoding { reason });
        if self.template.is_empty() {
            return fail("template is empty".into());
        }
        if !bio::alphabets::dna::iupac_alphabet().is_word(self.template.as_bytes()) {
            return fail("template contains non-IUPAC nucleotide symbols".into());
        }
        if self.target.length == 0 {
            return fail(format!("target {} has zero length", self.target));
        }
        if self.opt_primer_length <= PRIMER_SIZE_SLACK {
            return fail(format!(
                "opt_primer_length {} must exceed {PRIMER_SIZE_SLACK}",
                self.opt_primer_length
            ));
        }
        if self.max_primer_size() > MAX_PRIMER_SIZE {
            return fail(format!(
                "opt_primer_length {} allows primers longer than {MAX_PRIMER_SIZE}",
                self.opt_primer_length
            ));
        }
        if self.min_melting_t == 0 || self.min_melting_t >= self.max_melting_t {
            return fail(format!(
                "melting temperature bounds {}..{} are not increasing",
                self.min_melting_t, self.max_melting_t
            ));
        }
        if self.min_product_size == 0 || self.min_product_size >= self.max_product_size {
            return fail(format!("product size range {} is not increasing", self.product_size_range()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod params_tests {
    use super::*;

    fn base() -> DesignParameters {
        DesignParameters::new("ACGT".repeat(50), SeqSpan::new(100, 10))
    }

    #[test]
    fn defaults_match_documented_values() {
        let p = base();
        assert_eq!(p.opt_primer_length, 25);
        assert_eq!(p.opt_gc_percent, 50);
        assert_eq!((p.min_melting_t, p.max_melting_t), (58, 62));
        assert_eq!(p.product_size_range(), "200-600");
        assert_eq!(p.opt_product_size(), 400);
        assert_eq!((p.min_primer_size(), p.max_primer_size()), (20, 30));
    }

    #[test]
    fn opt_product_size_truncates() {
        let p = base().with_product_size(200, 451);
        assert_eq!(p.opt_product_size(), 325);
    }

    #[test]
    fn span_parse_and_display() {
        let s: SeqSpan = " 137,20 ".parse().unwrap();
        assert_eq!(s, SeqSpan::new(137, 20));
        assert_eq!(s.to_string(), "137,20");
        assert!("137".parse::<SeqSpan>().is_err());
        assert!("a,20".parse::<SeqSpan>().is_err());
        assert!("5,0".parse::<SeqSpan>().is_err());
    }

    #[test]
    fn span_lists_accept_semicolons_and_spaces() {
        let v = parse_spans("0,20;180,20 300,5").unwrap();
        assert_eq!(v, vec![SeqSpan::new(0, 20), SeqSpan::new(180, 20), SeqSpan::new(300, 5)]);
        assert!(parse_spans("").unwrap().is_empty());
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        assert!(base().validate().is_ok());
        assert!(matches!(base().with_product_size(400, 200).validate(), Err(PrimerError::Encoding { .. })));
        assert!(base().with_product_size(300, 300).validate().is_err());
        assert!(base().with_melting_temp(62, 58).validate().is_err());
        assert!(base().with_opt_primer_length(5).validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_primer_length() {
        assert!(base().with_opt_primer_length(31).validate().is_ok());
        assert!(base().with_opt_primer_length(32).validate().is_err());
        let huge = base().with_opt_primer_length(u32::MAX);
        assert_eq!(huge.max_primer_size(), u32::MAX);
        assert!(matches!(huge.validate(), Err(PrimerError::Encoding { .. })));
    }

    #[test]
    fn validate_rejects_bad_templates() {
        assert!(DesignParameters::new("", SeqSpan::new(0, 1)).validate().is_err());
        assert!(DesignParameters::new("ACGTXZ", SeqSpan::new(0, 1)).validate().is_err());
        assert!(DesignParameters::new("ACGTNNRY", SeqSpan::new(0, 1)).validate().is_ok());
    }
}
