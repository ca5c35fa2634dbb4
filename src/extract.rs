//! Turn one JSONL conversation file into category-keyed records.
//!
//! Every line is one conversation object:
//! `{"messages": [{"role": "...", "content": "..."}, ...], ...}`.
//! Each assistant message yields one record whose category is the message
//! content and whose payload is the whole conversation object.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DatasetError, Result};

pub const ASSISTANT_ROLE: &str = "assistant";

/// One selectable unit: a category label plus the conversation it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub category: String,
    pub payload: Value,
}

/// Extract all records from the file at `path`.
///
/// A missing file is logged and contributes nothing. Lines that are not
/// valid JSON are logged and skipped. A conversation with the wrong shape
/// fails the whole file with [`DatasetError::Schema`].
pub fn extract_records(path: &Path) -> Result<Vec<ConversationRecord>> {
    match read_source(path)? {
        Some(bytes) => extract_from_bytes(path, &bytes),
        None => Ok(Vec::new()),
    }
}

/// Same as [`extract_records`] but over bytes already in memory. `path` is
/// only used in diagnostics.
pub fn extract_from_bytes(path: &Path, bytes: &[u8]) -> Result<Vec<ConversationRecord>> {
    let mut records = Vec::new();
    for (line, value) in parse_lines(path, bytes) {
        // several assistant turns share one payload
        for category in assistant_contents(&value, path, line)? {
            records.push(ConversationRecord {
                category,
                payload: value.clone(),
            });
        }
    }
    debug!("{}: {} record(s)", path.display(), records.len());
    Ok(records)
}

/// Read the whole file, mapping "not found" to `None` after logging it.
pub(crate) fn read_source(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("File not found: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(DatasetError::io(path, e)),
    }
}

/// Parsed JSON values of every non-blank line, paired with 1-based line
/// numbers. Lines that fail to parse are logged and dropped.
pub(crate) fn parse_lines<'a>(
    path: &'a Path,
    bytes: &'a [u8],
) -> impl Iterator<Item = (usize, Value)> + 'a {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter(|(_, raw)| !raw.iter().all(u8::is_ascii_whitespace))
        .filter_map(move |(idx, raw)| match serde_json::from_slice::<Value>(raw) {
            Ok(value) => Some((idx + 1, value)),
            Err(e) => {
                warn!("Error reading file {} (line {}): {e}", path.display(), idx + 1);
                None
            }
        })
}

/// The only part of a conversation that is inspected. Other fields of the
/// object stay in the untyped payload.
#[derive(Debug, Deserialize)]
struct Conversation {
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    role: String,
    // any type for non-assistant turns
    content: Value,
}

/// Contents of every assistant message of one conversation, in order.
pub(crate) fn assistant_contents(value: &Value, path: &Path, line: usize) -> Result<Vec<String>> {
    let schema = |reason: String| DatasetError::Schema {
        path: path.to_path_buf(),
        line,
        reason,
    };

    // serde would also accept `[[...]]` as a struct in sequence form
    if !value.is_object() {
        return Err(schema("conversation is not a JSON object".into()));
    }
    let conversation = Conversation::deserialize(value).map_err(|e| schema(e.to_string()))?;

    let mut contents = Vec::new();
    for (i, msg) in conversation.messages.into_iter().enumerate() {
        if msg.role != ASSISTANT_ROLE {
            continue;
        }
        match msg.content {
            Value::String(text) => contents.push(text),
            _ => {
                return Err(schema(format!(
                    "message {i}: assistant `content` is not a string"
                )))
            }
        }
    }
    Ok(contents)
}
