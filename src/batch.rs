//! Designing primers for many templates at once.
//!
//! Each item gets its own primer3 process and its own pair of temporary files;
//! nothing is shared between items except the read-only [`Oracle`]. Items run
//! on a local Rayon pool, `threads = None` uses all logical cores. Results are
//! reported in input order.
//!
//! What happens when one item fails is the caller's choice, given as an
//! [`ErrorPolicy`]. The default aborts.
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use crate::candidate::PrimerCandidate;
use crate::error::{PrimerError, Result};
use crate::oracle::Oracle;
use crate::params::DesignParameters;

/// How a batch treats an item whose design failed or found no primers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Return the error of the first failing item (in input order).
    #[default]
    Abort,
    /// Record the failure in [`BatchReport::skipped`] and continue.
    Skip,
}

/// One named design request.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub name: String,
    pub params: DesignParameters,
}

/// Candidates designed for one item.
#[derive(Clone, Debug)]
pub struct Designed {
    pub name: String,
    pub candidates: Vec<PrimerCandidate>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub designed: Vec<Designed>,
    /// Items dropped under [`ErrorPolicy::Skip`], with their error.
    pub skipped: Vec<(String, PrimerError)>,
}

#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    pub threads: Option<usize>,
    pub policy: ErrorPolicy,
}

fn design_one<O: Oracle + ?Sized>(oracle: &O, item: &BatchItem) -> Result<Vec<PrimerCandidate>> {
    let candidates = crate::design_primers(oracle, &item.params)?;
    if candidates.is_empty() {
        return Err(PrimerError::NoPrimers { name: item.name.clone() });
    }
    Ok(candidates)
}

/// Design primers for every item, in parallel.
pub fn design_batch<O>(oracle: &O, items: Vec<BatchItem>, opts: &BatchOpts) -> anyhow::Result<BatchReport>
where
    O: Oracle + Sync + ?Sized,
{
    let n = opts.threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    info!(items = items.len(), threads = n, policy = ?opts.policy, "designing batch");

    let results: Vec<(String, Result<Vec<PrimerCandidate>>)> = pool.install(|| {
        items
            .par_iter()
            .map(|item| (item.name.clone(), design_one(oracle, item)))
            .collect()
    });

    let mut report = BatchReport::default();
    for (name, res) in results {
        match res {
            Ok(candidates) => report.designed.push(Designed { name, candidates }),
            Err(e) if opts.policy == ErrorPolicy::Skip => {
                warn!(item = %name, error = %e, "skipping item");
                report.skipped.push((name, e));
            }
            Err(e) => return Err(anyhow::Error::new(e).context(format!("designing primers for {name}"))),
        }
    }
    Ok(report)
}
