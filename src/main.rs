//! genoview - Terminal Genome Browser
//!
//! ## Usage
//!
//! ```bash
//! genoview genome.fna --gff annotations.gff3
//! genoview genome.fna --gff annotations.gff3 --summary   # print and exit
//! ```
//!
//! ## Navigation
//!
//! - `+`/`-`: zoom in/out
//! - `h`/`l` or arrows: pan
//! - `0` or `r`: whole genome
//! - `:` or `g`: go to a position or an annotation name
//! - `Tab`: switch to the annotation catalog, `Enter` opens an entry
//! - `q`: quit

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use genoview::catalog::counts_by_type;
use genoview::config::Config;
use genoview::controller::run_app;
use genoview::provider::{GenomeProvider, MemoryProvider};

/// genoview - A terminal genome browser with annotation tracks
///
/// Opens an interactive browser on a FASTA genome and its GFF3 annotations.
/// With --summary, prints the genome summary and exits.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Genome sequence (FASTA; only the first record is used)
    fasta: PathBuf,

    /// GFF3 annotation file
    #[arg(long = "gff")]
    gff: Option<PathBuf>,

    /// Configuration file (defaults to ./genoview.toml if present)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print genome info and annotation counts, then exit
    #[arg(short = 's', long = "summary")]
    summary: bool,

    /// Use unicode glyphs in panels
    #[arg(long = "fancy")]
    fancy: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Sends logs to a fresh file in the temp directory; the TUI owns stdout.
fn setup_logging(verbose: u8, quiet: bool) -> Result<PathBuf> {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let suffix: u32 = rand::random();
    let path = std::env::temp_dir().join(format!("genoview-{:08x}.log", suffix));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(path)
}

/// Prints the genome summary to stdout.
fn run_summary(provider: &dyn GenomeProvider) -> Result<()> {
    let info = provider.genome_info()?;
    let features = provider.query_full_feature_list()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "Genome: {}", info.id)?;
    writeln!(handle, "Length: {} bp", info.length)?;
    writeln!(
        handle,
        "Annotations: {}",
        if info.has_annotations { "yes" } else { "no" }
    )?;
    for (feature_type, count) in counts_by_type(&features) {
        writeln!(handle, "  {}: {}", feature_type.label(), count)?;
    }
    Ok(())
}

fn load_provider(fasta: &Path, gff: Option<&Path>) -> Result<MemoryProvider> {
    MemoryProvider::from_files(fasta, gff)
        .with_context(|| format!("Failed to load genome from {}", fasta.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = setup_logging(args.verbose, args.quiet)?;

    let mut config = Config::load(args.config.as_deref())?;
    if args.fancy {
        config.render.fancy_glyphs = true;
    }

    let provider = load_provider(&args.fasta, args.gff.as_deref())?;

    if args.summary {
        run_summary(&provider)?;
    } else {
        let result = run_app(Arc::new(provider), config);
        with_log_notice(result, &log_path, &mut io::stderr())?;
    }

    Ok(())
}

/// Tells the user where the log went, whether or not the browser exited cleanly.
fn with_log_notice<T>(result: Result<T>, log_path: &Path, out: &mut impl Write) -> Result<T> {
    let _ = writeln!(out, "Log written to {}", log_path.display());
    result
}
