//! A primer pair candidate as returned by primer3.
//!
//! Candidates are built only by [`crate::decode::decode_candidates`] and are
//! plain owned values. GC percentages stay as the text primer3 printed; use
//! [`PrimerCandidate::left_gc`] / [`PrimerCandidate::right_gc`] to get numbers.

/// Forward M13 tail (-21), prefixed to the left primer for sequencing.
pub const M13_FORWARD: &str = "TGTAAAACGACGGCCAGT";
/// Reverse M13 tail, prefixed to the right primer.
pub const M13_REVERSE: &str = "CAGGAAACAGCTATGACC";

/// One left/right primer pair for a single pair index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimerCandidate {
    /// Pair index as assigned by primer3 (0 is its best-ranked pair).
    pub index: usize,
    pub left_sequence: String,
    pub right_sequence: String,
    /// 0-based offset of the left primer within the template.
    pub left_position: usize,
    /// Offset primer3 reports for the right primer (its 3'-most template base).
    pub right_position: usize,
    pub left_gc_percent: String,
    pub right_gc_percent: String,
}

impl PrimerCandidate {
    pub fn left_gc(&self) -> Result<f64, core::num::ParseFloatError> {
        self.left_gc_percent.trim().parse()
    }

    pub fn right_gc(&self) -> Result<f64, core::num::ParseFloatError> {
        self.right_gc_percent.trim().parse()
    }

    /// Copy of this pair with `forward` prepended to the left primer and
    /// `reverse` to the right primer. Positions are template coordinates and
    /// are left unchanged.
    ///
    /// # Examples
    /// ```
    /// # use primerpick::candidate::{PrimerCandidate, M13_FORWARD, M13_REVERSE};
    /// let p = PrimerCandidate {
    ///     index: 0,
    ///     left_sequence: "ACGT".into(),
    ///     right_sequence: "TTGA".into(),
    ///     left_position: 10,
    ///     right_position: 250,
    ///     left_gc_percent: "50.000".into(),
    ///     right_gc_percent: "25.000".into(),
    /// };
    /// let t = p.with_tails(M13_FORWARD, M13_REVERSE);
    /// assert_eq!(t.left_sequence, format!("{M13_FORWARD}ACGT"));
    /// assert_eq!(t.left_position, 10);
    /// ```
    pub fn with_tails(&self, forward: &str, reverse: &str) -> Self {
        Self {
            left_sequence: format!("{forward}{}", self.left_sequence),
            right_sequence: format!("{reverse}{}", self.right_sequence),
            ..self.clone()
        }
    }
}
