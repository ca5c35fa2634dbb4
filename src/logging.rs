use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};

/// Warnings go to stderr, everything from info up goes to
/// `<log_dir>/<name>_<timestamp>.log`. Returns the log file path.
pub fn init_logging(log_dir: &Path, name: &str) -> Result<PathBuf> {
    create_dir_all(log_dir).with_context(|| format!("creating {}", log_dir.display()))?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{name}_{ts}.log"));
    let file = File::create(&log_path).with_context(|| format!("creating {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            LogConfig::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, LogConfig::default(), file),
    ])?;
    Ok(log_path)
}
