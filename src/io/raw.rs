// src/io/raw.rs

//! Raw probability grids: one line per time step, one fixed-width column
//! per vertex (`{:12.10}` followed by two spaces).

use crate::core::{QwError, Result};
use crate::simulation::ProbabilityTable;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Renders `table` as a raw grid.
pub fn format_raw(table: &ProbabilityTable) -> String {
    let mut out = String::with_capacity(table.steps() * (table.vertex_count() * 14 + 1));
    for row in table.rows() {
        for p in row {
            let _ = write!(out, "{:12.10}  ", p);
        }
        out.push('\n');
    }
    out
}

/// Parses a whitespace-separated grid of probabilities. Blank lines are skipped.
///
/// # Errors
/// `QwError::Format` for a token that is not a number, rows of differing
/// length, or an input without any rows (reported at its last line).
pub fn parse_raw(text: &str) -> Result<ProbabilityTable> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|e| QwError::format(line_no, format!("'{}' is not a probability: {}", tok, e)))
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(QwError::format(
                    line_no,
                    format!("row has {} columns, expected {}", row.len(), first.len()),
                ));
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(QwError::format(text.lines().count().max(1), "raw grid contains no rows"));
    }
    debug!(steps = rows.len(), vertices = rows[0].len(), "parsed raw probability grid");
    ProbabilityTable::from_rows(rows)
}

/// Writes `table` to `path` as a raw grid.
pub fn write_raw(path: impl AsRef<Path>, table: &ProbabilityTable) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), steps = table.steps(), "writing raw probability grid");
    fs::write(path, format_raw(table))?;
    Ok(())
}

/// Reads a raw grid from `path`.
pub fn read_raw(path: impl AsRef<Path>) -> Result<ProbabilityTable> {
    parse_raw(&fs::read_to_string(path)?)
}
