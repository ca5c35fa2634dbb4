/*
cargo run --release --bin dataset_evaluator

cargo run --release --bin dataset_evaluator -- --config my-config.ini
*/

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use finetune_dataset::config::{ReportConfig, DEFAULT_CONFIG_FILE};
use finetune_dataset::logging::init_logging;
use finetune_dataset::{render_report, tally_responses};

/// Dataset evaluator: counts the distinct assistant responses of the dataset
/// written by dataset-chooser and prints them with counts and percentages.
#[derive(Parser, Debug)]
#[command(name = "dataset-evaluator", version, about)]
struct Cli {
    /// Path to the INI configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = ReportConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let log_path = init_logging(&cfg.log_directory, "dataset_evaluator")?;
    info!("Log file: {:?}", log_path);

    let rows = tally_responses(&cfg.output_file)
        .with_context(|| format!("reading {}", cfg.output_file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_report(&rows, &mut out)?;
    out.flush()?;
    Ok(())
}
