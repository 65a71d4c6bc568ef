// src/main.rs

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use truck_test_analyzer::config::{Overrides, RawConfig};
use truck_test_analyzer::crate_version;
use truck_test_analyzer::orchestrator::AnalysisOrchestrator;

/// Turns truck-test sensor logs into drag-analysis workbooks.
#[derive(Parser, Debug)]
#[command(name = "truck-test-analyzer", version, about)]
struct Cli {
    /// YAML session file; command-line flags take precedence over it.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Analyze a single log into one standalone workbook.
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Output workbook for --input.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// One-entry-per-line list of logs to analyze.
    #[arg(long)]
    hitlist: Option<PathBuf>,

    /// Sheet names parallel to the hitlist.
    #[arg(long)]
    sheet_names: Option<PathBuf>,

    /// Combine every hitlist run into this workbook.
    #[arg(long, conflicts_with = "per_file")]
    single_output: Option<PathBuf>,

    /// Write `<entry>___analyzed.xlsx` beside each hitlist entry instead.
    #[arg(long)]
    per_file: bool,

    /// Separate `Data <run>` and `Graphs <run>` sheets.
    #[arg(long)]
    split: bool,

    /// Directory hitlist entries are resolved against.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Write an SVG preview of each run into this directory.
    #[arg(long)]
    previews: Option<PathBuf>,

    /// Only warnings and errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            input: self.input.clone(),
            output: self.output.clone(),
            hitlist: self.hitlist.clone(),
            sheet_names: self.sheet_names.clone(),
            single_output: self.single_output.clone(),
            per_file: self.per_file,
            split: self.split,
            data_dir: self.data_dir.clone(),
            previews: self.previews.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut raw = match &cli.config {
        Some(path) => RawConfig::from_file(path)?,
        None => RawConfig::default(),
    };
    raw.apply(&cli.overrides());
    let session = raw.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(session.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("truck-test-analyzer {} active", crate_version());
    let report = AnalysisOrchestrator::new(session).run()?;

    for output in &report.outputs {
        info!("Wrote {}", output.display());
    }
    for meta in &report.meta_rows {
        info!("  META {}: {} usable rows", meta.run, meta.usable_rows);
    }
    Ok(())
}

// src/main.rs
