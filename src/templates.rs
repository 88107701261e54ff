//! Reading template windows for batch design from **FASTA / FASTQ (.gz)**.
//!
//! ### Design
//! - Records are parsed with `needletail`, which also handles gzip.
//! - The header carries the design request next to the record name:
//!
//! ```text
//! >BRCA2_ex11 target=100,10 exclude=0,20;180,20 product=200-400
//! ```
//!
//! `target` is required; `exclude` and `product` are optional. Other tokens are
//! ignored, so headers straight from a region extractor still work. Parameters
//! not given in the header come from the `base` passed by the caller.
//!
//! ### Errors
//! Parsing/IO errors are bubbled via `anyhow::Result` with the record name.
//!
//! ### Example
//! ```no_run
//! use primerpick::{params::{DesignParameters, SeqSpan}, templates};
//! let base = DesignParameters::new("", SeqSpan::new(0, 1));
//! let items = templates::read_templates("regions.fa", &base).unwrap();
//! println!("{} templates", items.len());
//! ```
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use needletail::parse_fastx_file;

use crate::batch::BatchItem;
use crate::params::{parse_spans, DesignParameters, SeqSpan};

/// Parse a `"<min>-<max>"` product size range.
pub fn parse_product_range(s: &str) -> Result<(u32, u32)> {
    let (min, max) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("product size '{s}' is not '<min>-<max>'"))?;
    Ok((min.trim().parse()?, max.trim().parse()?))
}

/// Turn one header line plus sequence into a request, starting from `base`.
pub fn item_from_header(header: &str, seq: &str, base: &DesignParameters) -> Result<BatchItem> {
    let mut tokens = header.split_whitespace();
    let name = tokens.next().ok_or_else(|| anyhow!("record without a name"))?.to_string();
    let mut params = DesignParameters { template: seq.to_string(), excluded_regions: Vec::new(), ..base.clone() };
    let mut target: Option<SeqSpan> = None;

    for tok in tokens {
        let Some((key, value)) = tok.split_once('=') else { continue };
        match key {
            "target" => target = Some(value.parse().with_context(|| format!("record {name}"))?),
            "exclude" => params.excluded_regions = parse_spans(value).with_context(|| format!("record {name}"))?,
            "product" => {
                let (min, max) = parse_product_range(value).with_context(|| format!("record {name}"))?;
                params = params.with_product_size(min, max);
            }
            _ => {}
        }
    }
    let Some(target) = target else {
        bail!("record {name} has no target=<start>,<length> in its header");
    };
    params.target = target;
    Ok(BatchItem { name, params })
}

/// Read every record of `path` as a design request.
pub fn read_templates<P: AsRef<Path>>(path: P, base: &DesignParameters) -> Result<Vec<BatchItem>> {
    let p = path.as_ref();
    let mut reader = parse_fastx_file(p).with_context(|| format!("opening {}", p.display()))?;
    let mut items = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record.with_context(|| format!("reading {}", p.display()))?;
        let header = String::from_utf8_lossy(rec.id()).to_string();
        let seq = String::from_utf8_lossy(&rec.seq()).to_ascii_uppercase();
        items.push(item_from_header(&header, &seq, base)?);
    }
    Ok(items)
}
