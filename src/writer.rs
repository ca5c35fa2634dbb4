//! Dataset Writer: serialize the sampled conversations as JSONL.
//!
//! Output goes to a temporary file next to the destination and is renamed
//! over it only once every line is flushed, so a failed run never leaves a
//! truncated dataset behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{DatasetError, Result};

/// Write one compact JSON object per line, in order, replacing `path`.
/// Returns the number of lines written.
pub fn write_dataset(dataset: &[&Value], path: &Path) -> Result<usize> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let io_err = |e| DatasetError::io(path, e);
    // removed on drop unless persisted
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DatasetError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for payload in dataset {
            serde_json::to_writer(&mut writer, payload).map_err(|e| io_err(e.into()))?;
            writeln!(writer).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(dataset.len())
}
