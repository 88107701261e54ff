//! Error taxonomy for the primer3 protocol layer.
//!
//! Every failure is surfaced to the immediate caller with the field, pair index
//! or file path involved. Nothing is retried or swallowed here; whether a batch
//! skips a failed template is decided by [`crate::batch::ErrorPolicy`].
use std::path::PathBuf;

/// Errors produced while designing primers.
#[derive(thiserror::Error, Debug)]
pub enum PrimerError {
    /// Design parameters violate an invariant (e.g. `min_product_size >= max_product_size`).
    ///
    /// Encoding is total; this comes from [`crate::params::DesignParameters::validate`]
    /// and from parsing `"<start>,<length>"` spans.
    #[error("invalid design parameters: {reason}")]
    Encoding { reason: String },

    /// The oracle could not be started or exited with a non-zero status.
    #[error("primer3 execution failed: {} (status={code:?}, stderr='{}')", executable.display(), stderr.trim())]
    Execution {
        executable: PathBuf,
        /// `None` when the process never started or was killed by a signal.
        code: Option<i32>,
        stderr: String,
        /// Set when the process could not be spawned.
        #[source]
        source: Option<std::io::Error>,
    },

    /// A transient config file could not be written or the result file could not be read.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required field for a discovered pair index matched zero or several lines.
    #[error("value for {field} of pair {index} must have exactly one match, found {found}")]
    Parse {
        field: &'static str,
        index: usize,
        found: usize,
    },

    /// The offset part of a position field is not a non-negative integer.
    #[error("position for {field} of pair {index} is not an offset: '{value}'")]
    Position {
        field: &'static str,
        index: usize,
        value: String,
    },

    /// A discovered pair index does not fit the platform integer.
    #[error("pair index '{digits}' is out of range")]
    PairIndex { digits: String },

    /// primer3 ran successfully but returned no primer pairs.
    #[error("no primers found for {name}")]
    NoPrimers { name: String },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PrimerError>;
