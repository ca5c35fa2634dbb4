use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything the build and report phases can fail with.
///
/// Malformed JSON lines and missing input files are not here: those are
/// logged and skipped where they occur.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A conversation object is present but does not have the expected shape.
    #[error("{}:{line}: {reason}", path.display())]
    Schema {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A category was given a positive quota but the corpus has no record for it.
    #[error("category {category:?} has weight for {requested} example(s) but no records in the corpus")]
    EmptyCategory { category: String, requested: usize },

    #[error("config key {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(key: &str, reason: impl Into<String>) -> Self {
        Self::Config {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
