#![forbid(unsafe_code)]
//! # primerpick
//!
//! PCR primer pair design for template windows around regions or variants.
//! The combinatorial and thermodynamic search is delegated to **primer3**; this
//! crate owns the protocol around it:
//!
//! 1. [`boulder`] encodes [`DesignParameters`] as a BoulderIO `KEY=VALUE` record,
//! 2. [`oracle`] runs `primer3_core -output <result> <config>` with scoped
//!    temporary files,
//! 3. [`decode`] rebuilds one [`PrimerCandidate`] per pair index, requiring
//!    exactly one line for each of its six fields.
//!
//! [`batch`] fans many templates out over a thread pool with an explicit
//! [`batch::ErrorPolicy`], and [`templates`] reads them from FASTA.
//!
//! ## Examples
//! ```no_run
//! use primerpick::{design_primers, oracle::Primer3, params::{DesignParameters, SeqSpan}};
//! let params = DesignParameters::new("ACGT".repeat(50), SeqSpan::new(100, 10))
//!     .with_excluded_region(SeqSpan::new(0, 20))
//!     .with_product_size(200, 400);
//! for pair in design_primers(&Primer3::default(), &params).unwrap() {
//!     println!("{} {} {}", pair.index, pair.left_sequence, pair.right_sequence);
//! }
//! ```

pub mod error;
pub mod params;
pub mod candidate;
pub mod boulder;
pub mod oracle;
pub mod decode;
pub mod batch;
pub mod templates;

use tracing::{debug, warn};

pub use candidate::PrimerCandidate;
pub use error::{PrimerError, Result};
pub use oracle::{Oracle, Primer3};
pub use params::{DesignParameters, SeqSpan};

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate, encode, run the oracle once and decode its output.
///
/// Returns candidates in primer3's pair index order; the list is empty when
/// primer3 found none. Blocks for the whole primer3 run.
pub fn design_primers<O: Oracle + ?Sized>(oracle: &O, params: &DesignParameters) -> Result<Vec<PrimerCandidate>> {
    params.validate()?;
    let config = boulder::config_string(params);
    let lines = oracle.run(&config)?;
    for msg in decode::oracle_errors(&lines) {
        warn!(error = %msg, "primer3 reported an error");
    }
    let candidates = decode::decode_candidates(&lines)?;
    debug!(pairs = candidates.len(), "decoded primer3 output");
    Ok(candidates)
}
