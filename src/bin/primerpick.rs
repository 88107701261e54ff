use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use primerpick::batch::{self, BatchOpts, ErrorPolicy};
use primerpick::candidate::{M13_FORWARD, M13_REVERSE};
use primerpick::params::{self, DesignParameters};
use primerpick::{boulder, templates, PrimerCandidate, Primer3};

/// primerpick CLI
#[derive(Parser)]
#[command(name = "primerpick")]
#[command(version)]
#[command(about = "PCR primer design through primer3", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Primer3 bounds shared by all subcommands.
#[derive(Args, Clone)]
struct Bounds {
    /// Optimum primer length
    #[arg(long, default_value_t = params::DEFAULT_OPT_PRIMER_LENGTH)]
    opt_primer_length: u32,
    /// Optimum primer GC percentage
    #[arg(long = "opt-gc-perc", default_value_t = params::DEFAULT_OPT_GC_PERCENT)]
    opt_gc_percent: u32,
    /// Minimum primer melting temperature
    #[arg(long = "min-melting-temperature", default_value_t = params::DEFAULT_MIN_MELTING_T)]
    min_melting_t: u32,
    /// Maximum primer melting temperature
    #[arg(long = "max-melting-temperature", default_value_t = params::DEFAULT_MAX_MELTING_T)]
    max_melting_t: u32,
    /// Size range of desired product, "<min>-<max>"
    #[arg(long, default_value_t = format!("{}-{}", params::DEFAULT_MIN_PRODUCT_SIZE, params::DEFAULT_MAX_PRODUCT_SIZE))]
    product_size: String,
}

impl Bounds {
    fn apply(&self, p: DesignParameters) -> Result<DesignParameters> {
        let (min, max) = templates::parse_product_range(&self.product_size)?;
        Ok(p.with_opt_primer_length(self.opt_primer_length)
            .with_opt_gc_percent(self.opt_gc_percent)
            .with_melting_temp(self.min_melting_t, self.max_melting_t)
            .with_product_size(min, max))
    }
}

#[derive(Args, Clone)]
struct Single {
    /// Template sequence to design within
    #[arg(long)]
    template: String,
    /// Target the product must span, "<start>,<length>"
    #[arg(long)]
    target: String,
    /// Excluded regions, "<start>,<length>[;<start>,<length>...]"
    #[arg(long, default_value = "")]
    excluded: String,
    #[command(flatten)]
    bounds: Bounds,
}

impl Single {
    fn params(&self) -> Result<DesignParameters> {
        let p = DesignParameters::new(self.template.to_ascii_uppercase(), self.target.parse()?)
            .with_excluded_regions(params::parse_spans(&self.excluded)?);
        self.bounds.apply(p)
    }
}

#[derive(Args, Clone)]
struct Run {
    /// Path to primer3_core executable
    #[arg(long, env = "PRIMERPICK_PRIMER3", default_value = "primer3_core")]
    primer3: PathBuf,
    /// Output primers with M13 tails
    #[arg(long)]
    m13: bool,
    /// Sequence of forward M13 tail
    #[arg(long, default_value = M13_FORWARD)]
    m13_forward: String,
    /// Sequence of reverse M13 tail
    #[arg(long, default_value = M13_REVERSE)]
    m13_reverse: String,
}

impl Run {
    fn finish(&self, pairs: Vec<PrimerCandidate>) -> Vec<PrimerCandidate> {
        if !self.m13 {
            return pairs;
        }
        pairs.iter().map(|p| p.with_tails(&self.m13_forward, &self.m13_reverse)).collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the primer3 configuration for one template
    Config {
        #[command(flatten)]
        single: Single,
    },

    /// Design primers for one template, TSV to stdout
    Design {
        #[command(flatten)]
        single: Single,
        #[command(flatten)]
        run: Run,
    },

    /// Design primers for every record of a FASTA/FASTQ file, TSV to stdout
    Batch {
        /// Templates; headers hold "target=<s>,<l> [exclude=...] [product=<min>-<max>]"
        input: PathBuf,
        #[command(flatten)]
        bounds: Bounds,
        #[command(flatten)]
        run: Run,
        /// Threads (0/None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// Skip templates whose design fails instead of aborting
        #[arg(long)]
        ignore_errors: bool,
    },
}

const HEADER: [&str; 8] = ["name", "index", "forward", "reverse", "left_pos", "right_pos", "left_gc", "right_gc"];

fn write_rows<W: Write>(w: &mut csv::Writer<W>, name: &str, pairs: &[PrimerCandidate]) -> Result<()> {
    for p in pairs {
        let (index, left_pos, right_pos) =
            (p.index.to_string(), p.left_position.to_string(), p.right_position.to_string());
        w.write_record([
            name,
            index.as_str(),
            p.left_sequence.as_str(),
            p.right_sequence.as_str(),
            left_pos.as_str(),
            right_pos.as_str(),
            p.left_gc_percent.as_str(),
            p.right_gc_percent.as_str(),
        ])?;
    }
    Ok(())
}

fn tsv_writer() -> csv::Writer<std::io::Stdout> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(std::io::stdout())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Config { single } => {
            let p = single.params()?;
            p.validate()?;
            let mut out = std::io::stdout().lock();
            boulder::encode_config(&p, &mut out)?;
            writeln!(out)?;
        }

        Commands::Design { single, run } => {
            let p = single.params()?;
            let oracle = Primer3::new(&run.primer3);
            let pairs = primerpick::design_primers(&oracle, &p)
                .with_context(|| format!("running {}", run.primer3.display()))?;
            info!(pairs = pairs.len(), "designed");
            let mut w = tsv_writer();
            w.write_record(HEADER)?;
            write_rows(&mut w, "template", &run.finish(pairs))?;
            w.flush()?;
        }

        Commands::Batch { input, bounds, run, threads, ignore_errors } => {
            let base = bounds.apply(DesignParameters::new("", params::SeqSpan::new(0, 1)))?;
            let items = templates::read_templates(&input, &base)?;
            let opts = BatchOpts {
                threads: threads.filter(|&t| t > 0),
                policy: if ignore_errors { ErrorPolicy::Skip } else { ErrorPolicy::Abort },
            };
            let oracle = Primer3::new(&run.primer3);
            let report = batch::design_batch(&oracle, items, &opts)?;

            let mut w = tsv_writer();
            w.write_record(HEADER)?;
            for d in report.designed {
                write_rows(&mut w, &d.name, &run.finish(d.candidates))?;
            }
            w.flush()?;
            info!(skipped = report.skipped.len(), "batch done");
        }
    }

    Ok(())
}
