//! Running primer3 as an external process.
//!
//! [`Oracle`] is the seam between design logic and the process: anything that
//! turns configuration text into output lines. [`Primer3`] is the real one. It
//! writes the configuration into a uniquely named temporary file, runs
//!
//! ```text
//! <executable> -output <result-path> <config-path>
//! ```
//!
//! and reads the result file back as lines with trailing whitespace removed.
//! Both temporary files are owned by [`tempfile::NamedTempFile`] guards, so they
//! are deleted on success, on oracle failure, on read failure and while
//! unwinding. There is no retry and no timeout.
//!
//! ### Example
//! ```no_run
//! use primerpick::oracle::{Oracle, Primer3};
//! let oracle = Primer3::new("/usr/bin/primer3_core");
//! let lines = oracle.run("SEQUENCE_ID=example\n...\n=").unwrap();
//! println!("{} output lines", lines.len());
//! ```
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{PrimerError, Result};

/// Conventional name of the primer3 executable.
pub const DEFAULT_PRIMER3_BIN: &str = "primer3_core";

/// Something that answers a BoulderIO configuration with BoulderIO output lines.
///
/// Implementations hold no state shared between calls, so one value can serve
/// many threads at once.
pub trait Oracle {
    fn run(&self, config: &str) -> Result<Vec<String>>;
}

/// primer3 invoked via its command line.
#[derive(Clone, Debug)]
pub struct Primer3 {
    executable: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl Primer3 {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into(), temp_dir: None }
    }

    /// Place transient files in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn temp_file(&self, prefix: &str) -> Result<NamedTempFile> {
        let mut b = tempfile::Builder::new();
        b.prefix(prefix).suffix(".boulder");
        let res = match &self.temp_dir {
            Some(dir) => b.tempfile_in(dir),
            None => b.tempfile(),
        };
        res.map_err(|source| PrimerError::Io {
            path: self.temp_dir.clone().unwrap_or_else(std::env::temp_dir),
            source,
        })
    }

    fn execution_error(&self, code: Option<i32>, stderr: String, source: Option<std::io::Error>) -> PrimerError {
        PrimerError::Execution { executable: self.executable.clone(), code, stderr, source }
    }
}

impl Default for Primer3 {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMER3_BIN)
    }
}

impl Oracle for Primer3 {
    fn run(&self, config: &str) -> Result<Vec<String>> {
        let mut cfg = self.temp_file("primer3-config-")?;
        if let Err(source) = cfg.write_all(config.as_bytes()).and_then(|()| cfg.flush()) {
            return Err(PrimerError::Io { path: cfg.path().to_path_buf(), source });
        }
        let out = self.temp_file("primer3-result-")?;

        debug!(
            executable = %self.executable.display(),
            config = %cfg.path().display(),
            output = %out.path().display(),
            "running primer3"
        );
        let output = Command::new(&self.executable)
            .arg("-output")
            .arg(out.path())
            .arg(cfg.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.execution_error(None, String::new(), Some(e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(
                executable = %self.executable.display(),
                code = ?output.status.code(),
                "primer3 exited with failure"
            );
            return Err(self.execution_error(output.status.code(), stderr, None));
        }

        let read_err = |source| PrimerError::Io { path: out.path().to_path_buf(), source };
        let reader = BufReader::new(out.reopen().map_err(read_err)?);
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line.map_err(read_err)?.trim_end().to_string());
        }
        debug!(lines = lines.len(), "primer3 output read");
        Ok(lines)
    }
}
