// src/io/adjacency.rs

//! Plain-text adjacency matrices.
//!
//! Lines before the matrix (comments, titles, blank lines) are skipped up
//! to the first line that begins with `0` or `1`. From there every `0`/`1`
//! character is one matrix entry and each line is one row, so `0 1 1`,
//! `011` and `0,1,1` all read the same. Lines without any entry are ignored.

use crate::core::{QwError, Result};
use crate::graph::Graph;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parses an adjacency matrix from `text` and validates it as a [`Graph`].
///
/// # Errors
/// * `QwError::Format` when no line starts a matrix.
/// * `QwError::InvalidTopology` when the matrix is not square or symmetric, or has a self-loop.
pub fn parse_adjacency(text: &str) -> Result<Graph> {
    let mut lines = text.lines().enumerate();
    let mut skipped = 0;
    let mut rows: Vec<Vec<u8>> = Vec::new();

    for (_, line) in lines.by_ref() {
        if line.starts_with(['0', '1']) {
            rows.push(matrix_entries(line));
            break;
        }
        skipped += 1;
    }
    if rows.is_empty() {
        return Err(QwError::format(skipped, "no adjacency matrix found (no line starts with 0 or 1)"));
    }
    for (_, line) in lines {
        let row = matrix_entries(line);
        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!(skipped_lines = skipped, rows = rows.len(), "parsed adjacency matrix");
    Graph::from_matrix(&rows)
}

fn matrix_entries(line: &str) -> Vec<u8> {
    line.bytes().filter(|b| matches!(b, b'0' | b'1')).map(|b| b - b'0').collect()
}

/// Reads and parses the adjacency file at `path`.
pub fn read_adjacency(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading adjacency file");
    parse_adjacency(&fs::read_to_string(path)?)
}

/// Renders `graph` as space-separated 0/1 rows.
pub fn format_adjacency(graph: &Graph) -> String {
    let n = graph.vertex_count();
    let mut out = String::with_capacity(n * (2 * n + 1));
    for v in 0..n {
        let cells: Vec<&str> = graph.adjacency_row(v).iter().map(|&a| if a { "1" } else { "0" }).collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    out
}

/// Writes `graph` to `path` in the format [`parse_adjacency`] reads.
pub fn write_adjacency(path: impl AsRef<Path>, graph: &Graph) -> Result<()> {
    fs::write(path, format_adjacency(graph))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;

    #[test]
    fn test_skips_header_lines() -> Result<()> {
        let text = "# four cycle\nsome title\n\n0 1 0 1\n1 0 1 0\n0 1 0 1\n1 0 1 0\n";
        let g = parse_adjacency(text)?;
        assert_eq!(g, generators::cycle(4));
        Ok(())
    }

    #[test]
    fn test_packed_digits() -> Result<()> {
        let g = parse_adjacency("011\n101\n110")?;
        assert_eq!(g, generators::complete(3));
        Ok(())
    }

    #[test]
    fn test_asymmetric_matrix_rejected() {
        let err = parse_adjacency("0 1\n0 0\n").unwrap_err();
        assert!(matches!(err, QwError::InvalidTopology { .. }), "got {:?}", err);
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        assert!(matches!(parse_adjacency("0 1 1\n1 0\n1 0 0\n"), Err(QwError::InvalidTopology { .. })));
    }

    #[test]
    fn test_missing_matrix_is_format_error() {
        assert!(matches!(parse_adjacency("just words\n"), Err(QwError::Format { line: 1, .. })));
    }

    #[test]
    fn test_format_then_parse() -> Result<()> {
        let g = generators::star(4);
        let text = format_adjacency(&g);
        assert!(text.starts_with("0 1 1 1 1\n"));
        assert_eq!(parse_adjacency(&text)?, g);
        Ok(())
    }
}
