//! Decoding primer3 output into [`PrimerCandidate`] values.
//!
//! primer3 reports pair `i` through index-parameterised tags such as
//! `PRIMER_LEFT_<i>_SEQUENCE`, `PRIMER_LEFT_<i>` (`"<offset>,<length>"`) and
//! `PRIMER_LEFT_<i>_GC_PERCENT`. The decoder makes one pass over the lines,
//! filing every such line under its field and index text, and records indices in
//! the order their `PRIMER_LEFT_<i>_SEQUENCE` lines appear. Each of the six
//! fields must then map to exactly one line per index; anything else fails the
//! whole result, since index correlation can no longer be trusted.
//!
//! # Examples
//! ```
//! use primerpick::decode::decode_candidates;
//! let out = [
//!     "PRIMER_LEFT_0_SEQUENCE=ACGTACGTAC",
//!     "PRIMER_RIGHT_0_SEQUENCE=GTACGTACGT",
//!     "PRIMER_LEFT_0=10,20",
//!     "PRIMER_RIGHT_0=250,20",
//!     "PRIMER_LEFT_0_GC_PERCENT=50.000",
//!     "PRIMER_RIGHT_0_GC_PERCENT=50.000",
//!     "=",
//! ];
//! let pairs = decode_candidates(&out).unwrap();
//! assert_eq!(pairs[0].left_position, 10);
//! assert_eq!(pairs[0].left_sequence, "ACGTACGTAC");
//! ```
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::boulder::read_records;
use crate::candidate::PrimerCandidate;
use crate::error::{PrimerError, Result};

/// The six per-pair fields a candidate is built from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    LeftSequence,
    RightSequence,
    LeftPosition,
    RightPosition,
    LeftGc,
    RightGc,
}

impl Field {
    /// Name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::LeftSequence => "left",
            Field::RightSequence => "right",
            Field::LeftPosition => "left_pos",
            Field::RightPosition => "right_pos",
            Field::LeftGc => "left_gc",
            Field::RightGc => "right_gc",
        }
    }

    fn from_parts(side: &str, suffix: Option<&str>) -> Option<Self> {
        match (side, suffix) {
            ("LEFT", Some("_SEQUENCE")) => Some(Field::LeftSequence),
            ("RIGHT", Some("_SEQUENCE")) => Some(Field::RightSequence),
            ("LEFT", None) => Some(Field::LeftPosition),
            ("RIGHT", None) => Some(Field::RightPosition),
            ("LEFT", Some("_GC_PERCENT")) => Some(Field::LeftGc),
            ("RIGHT", Some("_GC_PERCENT")) => Some(Field::RightGc),
            _ => None,
        }
    }
}

fn pair_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^PRIMER_(LEFT|RIGHT)_(\d+)(_SEQUENCE|_GC_PERCENT)?=").expect("static regex")
    })
}

/// Lines filed by field and by the index digits exactly as written.
struct FieldIndex<'a> {
    order: Vec<&'a str>,
    values: HashMap<(Field, &'a str), Vec<&'a str>>,
}

impl<'a> FieldIndex<'a> {
    fn build<S: AsRef<str>>(lines: &'a [S]) -> Self {
        let mut order = Vec::new();
        let mut values: HashMap<(Field, &'a str), Vec<&'a str>> = HashMap::new();
        for line in lines {
            let line = line.as_ref();
            let Some(caps) = pair_tag().captures(line) else { continue };
            let (Some(side), Some(digits), Some(key)) = (caps.get(1), caps.get(2), caps.get(0)) else {
                continue;
            };
            let Some(field) = Field::from_parts(side.as_str(), caps.get(3).map(|m| m.as_str())) else {
                continue;
            };
            let value = &line[key.end()..];
            if field == Field::LeftSequence && !value.is_empty() {
                order.push(digits.as_str());
            }
            values.entry((field, digits.as_str())).or_default().push(value);
        }
        Self { order, values }
    }

    fn exactly_one(&self, field: Field, index: usize) -> Result<&'a str> {
        let key = index.to_string();
        let found = self.values.get(&(field, key.as_str())).map(Vec::as_slice).unwrap_or(&[]);
        match found {
            [one] => Ok(*one),
            _ => Err(PrimerError::Parse { field: field.as_str(), index, found: found.len() }),
        }
    }

    fn position(&self, field: Field, index: usize) -> Result<usize> {
        let raw = self.exactly_one(field, index)?;
        let offset = raw.split(',').next().unwrap_or(raw);
        offset.trim().parse().map_err(|_| PrimerError::Position {
            field: field.as_str(),
            index,
            value: raw.to_string(),
        })
    }
}

/// Pair indices in order of their `PRIMER_LEFT_<i>_SEQUENCE=` lines.
///
/// Repeated indices are reported as often as they occur.
pub fn discover_indices<S: AsRef<str>>(lines: &[S]) -> Result<Vec<usize>> {
    FieldIndex::build(lines)
        .order
        .into_iter()
        .map(|d| d.parse().map_err(|_| PrimerError::PairIndex { digits: d.to_string() }))
        .collect()
}

/// Rebuild every discovered primer pair from primer3 output.
///
/// Pure: the same lines always produce the same candidates.
pub fn decode_candidates<S: AsRef<str>>(lines: &[S]) -> Result<Vec<PrimerCandidate>> {
    let idx = FieldIndex::build(lines);
    let mut out = Vec::with_capacity(idx.order.len());
    for digits in &idx.order {
        let index: usize = digits.parse().map_err(|_| PrimerError::PairIndex { digits: digits.to_string() })?;
        out.push(PrimerCandidate {
            index,
            left_sequence: idx.exactly_one(Field::LeftSequence, index)?.to_string(),
            right_sequence: idx.exactly_one(Field::RightSequence, index)?.to_string(),
            left_position: idx.position(Field::LeftPosition, index)?,
            right_position: idx.position(Field::RightPosition, index)?,
            left_gc_percent: idx.exactly_one(Field::LeftGc, index)?.to_string(),
            right_gc_percent: idx.exactly_one(Field::RightGc, index)?.to_string(),
        });
    }
    Ok(out)
}

/// Messages from `PRIMER_ERROR=` lines, which primer3 may emit with exit status 0.
pub fn oracle_errors<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    read_records(lines)
        .into_iter()
        .filter(|(key, _)| key == "PRIMER_ERROR")
        .map(|(_, msg)| msg)
        .collect()
}

#[cfg(test)]
mod decode_tests {
    use super::*;

    fn pair(i: usize, left_pos: &str) -> Vec<String> {
        vec![
            format!("PRIMER_PAIR_{i}_PENALTY=0.5"),
            format!("PRIMER_LEFT_{i}_PENALTY=0.2"),
            format!("PRIMER_LEFT_{i}_SEQUENCE=ACGTACGTAC{i}"),
            format!("PRIMER_RIGHT_{i}_SEQUENCE=TTGCAAGCTT{i}"),
            format!("PRIMER_LEFT_{i}={left_pos}"),
            format!("PRIMER_RIGHT_{i}=300,20"),
            format!("PRIMER_LEFT_{i}_TM=60.1"),
            format!("PRIMER_LEFT_{i}_GC_PERCENT=50.000"),
            format!("PRIMER_RIGHT_{i}_GC_PERCENT=45.455"),
        ]
    }

    #[test]
    fn strips_length_from_positions() {
        let c = decode_candidates(&pair(0, "137,20")).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].left_position, 137);
        assert_eq!(c[0].right_position, 300);
        assert_eq!(c[0].left_gc_percent, "50.000");
        assert_eq!(c[0].right_gc_percent, "45.455");
    }

    #[test]
    fn keeps_discovery_order() {
        let mut lines = vec!["SEQUENCE_ID=example".to_string(), "PRIMER_PAIR_NUM_RETURNED=3".to_string()];
        for i in [3, 1, 2] {
            lines.extend(pair(i, "10,20"));
        }
        lines.push("=".into());
        assert_eq!(discover_indices(&lines).unwrap(), vec![3, 1, 2]);
        let idx: Vec<usize> = decode_candidates(&lines).unwrap().iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![3, 1, 2]);
    }

    #[test]
    fn duplicated_sequence_line_is_rejected() {
        let mut lines = pair(0, "10,20");
        lines.push("PRIMER_LEFT_0_SEQUENCE=GGGGGGGGGG".into());
        match decode_candidates(&lines) {
            Err(PrimerError::Parse { field, index, found }) => {
                assert_eq!((field, index, found), ("left", 0, 2));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_right_position_is_rejected() {
        let lines: Vec<String> = pair(0, "10,20").into_iter().filter(|l| !l.starts_with("PRIMER_RIGHT_0=")).collect();
        match decode_candidates(&lines) {
            Err(PrimerError::Parse { field, index, found }) => {
                assert_eq!((field, index, found), ("right_pos", 0, 0));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn one_bad_index_fails_the_whole_result() {
        let mut lines = pair(0, "10,20");
        lines.extend(pair(1, "12,20").into_iter().filter(|l| !l.contains("RIGHT_1_GC")));
        assert!(matches!(
            decode_candidates(&lines),
            Err(PrimerError::Parse { field: "right_gc", index: 1, .. })
        ));
    }

    #[test]
    fn decoding_is_idempotent() {
        let mut lines = pair(0, "10,20");
        lines.extend(pair(1, "40,22"));
        assert_eq!(decode_candidates(&lines).unwrap(), decode_candidates(&lines).unwrap());
    }

    #[test]
    fn empty_or_unrelated_output_yields_nothing() {
        let lines = ["PRIMER_LEFT_NUM_RETURNED=0", "PRIMER_LEFT_EXPLAIN=considered 0", "="];
        assert!(decode_candidates(&lines).unwrap().is_empty());
        assert!(decode_candidates::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn empty_left_sequence_is_not_a_pair() {
        let mut lines = pair(0, "10,20");
        lines.retain(|l| !l.starts_with("PRIMER_LEFT_0_SEQUENCE="));
        lines.push("PRIMER_LEFT_0_SEQUENCE=".into());
        assert!(decode_candidates(&lines).unwrap().is_empty());
    }

    #[test]
    fn non_canonical_index_does_not_correlate() {
        let lines = pair(0, "10,20").into_iter().map(|l| l.replace("_0", "_00")).collect::<Vec<_>>();
        assert!(matches!(
            decode_candidates(&lines),
            Err(PrimerError::Parse { field: "left", index: 0, found: 0 })
        ));
    }

    #[test]
    fn non_numeric_offset_is_rejected() {
        assert!(matches!(
            decode_candidates(&pair(0, "abc,20")),
            Err(PrimerError::Position { field: "left_pos", index: 0, .. })
        ));
    }

    #[test]
    fn primer_error_lines_are_collected() {
        let lines = ["PRIMER_ERROR=Target beyond end of sequence", "PRIMER_ERROR_NOTE=x", "="];
        assert_eq!(oracle_errors(&lines), vec!["Target beyond end of sequence".to_string()]);
    }
}
