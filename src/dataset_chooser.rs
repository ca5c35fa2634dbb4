/*
cargo run --release --bin dataset_chooser

cargo run --release --bin dataset_chooser -- --config my-config.ini
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use finetune_dataset::config::{BuildConfig, DEFAULT_CONFIG_FILE};
use finetune_dataset::logging::init_logging;
use finetune_dataset::{load_corpus, plan, sample, write_dataset};

/// Weighted, category-balanced JSONL dataset builder for LLM fine-tuning.
///
/// Reads JSONL conversation files, samples from each category according to
/// the configured weights, and writes a single shuffled output dataset.
#[derive(Parser, Debug)]
#[command(name = "dataset-chooser", version, about)]
struct Cli {
    /// Path to the INI configuration file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = BuildConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let log_path = init_logging(&cfg.log_directory, "dataset_chooser")?;
    info!("Config: {:?}", cli.config);
    info!("Log file: {:?}", log_path);

    let mut rng = match cfg.seed {
        Some(seed) => {
            info!("Using fixed seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    // allocation
    let allocations = plan(&cfg.category_weights, cfg.total_examples).context("planning allocation")?;
    let planned: usize = allocations.iter().map(|a| a.count).sum();
    for a in &allocations {
        info!("{:?}: weight {} -> {} example(s)", a.category, a.weight, a.count);
    }
    info!(
        "Requested {} example(s), weights allocate {}",
        cfg.total_examples, planned
    );

    // load
    let corpus = load_corpus(&cfg.jsonl_directory, &mut rng)
        .with_context(|| format!("loading conversations from {}", cfg.jsonl_directory.display()))?;

    // sample
    let dataset = sample(&corpus, &cfg.category_weights, cfg.total_examples, &mut rng)
        .context("sampling dataset")?;

    // write
    let written = write_dataset(&dataset, &cfg.output_file)
        .with_context(|| format!("writing {}", cfg.output_file.display()))?;
    info!("Wrote {written} example(s) → {:?}", cfg.output_file);

    println!(
        "Dataset created with {} examples and saved to {}",
        written,
        cfg.output_file.display()
    );
    Ok(())
}
