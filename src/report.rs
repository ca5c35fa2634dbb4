//! Count how often each distinct assistant response occurs in a dataset file.

use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;
use log::info;

use crate::error::Result;
use crate::extract::{assistant_contents, parse_lines, read_source};

const RESPONSE_WIDTH: usize = 100;

/// One row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTally {
    pub response: String,
    pub count: usize,
    /// Share of all assistant messages in the file, 0-100.
    pub percentage: f64,
}

/// Tally the assistant responses of the JSONL file at `path`.
///
/// Rows are sorted by descending count; equal counts keep the order in which
/// the response was first seen. Malformed lines are skipped, a missing file
/// yields an empty report, and rows without `messages` (including arrays,
/// strings and other non-object JSON) are ignored.
pub fn tally_responses(path: &Path) -> Result<Vec<ResponseTally>> {
    let Some(bytes) = read_source(path)? else {
        return Ok(Vec::new());
    };

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for (line, value) in parse_lines(path, &bytes) {
        // rows that are not conversations (any JSON without `messages`)
        if value.get("messages").is_none() {
            continue;
        }
        for text in assistant_contents(&value, path, line)? {
            *counts.entry(text).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    info!(
        "{}: {} assistant response(s), {} distinct",
        path.display(),
        total,
        counts.len()
    );

    let mut rows: Vec<ResponseTally> = counts
        .into_iter()
        .map(|(response, count)| ResponseTally {
            percentage: count as f64 / total as f64 * 100.0,
            response,
            count,
        })
        .collect();
    // stable: ties stay in first-seen order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(rows)
}

/// Render the tally as a fixed-width text table.
pub fn render_report<W: Write>(rows: &[ResponseTally], out: &mut W) -> io::Result<()> {
    let rule = "-".repeat(RESPONSE_WIDTH + 24);
    writeln!(
        out,
        "{:<width$} | {:>7} | {:>10}",
        "Assistant Response",
        "Count",
        "Percentage",
        width = RESPONSE_WIDTH
    )?;
    writeln!(out, "{rule}")?;
    for row in rows {
        writeln!(
            out,
            "{:<width$} | {:>7} | {:>9.2}%",
            clip(&row.response, RESPONSE_WIDTH),
            row.count,
            row.percentage,
            width = RESPONSE_WIDTH
        )?;
    }
    writeln!(out, "{rule}")?;
    let total: usize = rows.iter().map(|r| r.count).sum();
    writeln!(
        out,
        "{:<width$} | {:>7} | {:>9.2}%",
        format!("{} distinct response(s)", rows.len()),
        total,
        if total == 0 { 0.0 } else { 100.0 },
        width = RESPONSE_WIDTH
    )
}

/// Single-line, at most `width` characters.
fn clip(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() <= width {
        return flat;
    }
    let mut short: String = flat.chars().take(width - 1).collect();
    short.push('…');
    short
}
