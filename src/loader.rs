//! Load every `*.jsonl` conversation file of a directory into one corpus.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::error::{DatasetError, Result};
use crate::extract::{extract_records, ConversationRecord};

pub const CONVERSATION_EXT: &str = ".jsonl";

/// Direct entries of `dir` whose name ends in `.jsonl`, sorted by path.
pub fn conversation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let path = entry.path();
        if !entry.file_name().to_string_lossy().ends_with(CONVERSATION_EXT) {
            continue;
        }
        if path.is_dir() {
            debug!("Skipping directory {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Extract all conversation files of `dir` in parallel and merge them.
///
/// Bad lines and vanished files only cost their own records. A schema
/// violation in any file fails the load. The merged corpus is shuffled with
/// `rng` before it is returned.
pub fn load_corpus<R>(dir: &Path, rng: &mut R) -> Result<Vec<ConversationRecord>>
where
    R: Rng + ?Sized,
{
    let files = conversation_files(dir)?;
    info!("Found {} conversation file(s) in {}", files.len(), dir.display());

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let per_file: Vec<Vec<ConversationRecord>> = files
        .par_iter()
        .map(|path| {
            let records = extract_records(path);
            bar.inc(1);
            records
        })
        .collect::<Result<_>>()?;
    bar.finish_and_clear();

    let mut corpus: Vec<ConversationRecord> = per_file.into_iter().flatten().collect();
    corpus.shuffle(rng);
    info!("Loaded {} record(s)", corpus.len());
    Ok(corpus)
}
