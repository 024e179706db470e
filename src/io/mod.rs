// src/io/mod.rs

//! Reading and writing graphs and probability tables.
//!
//! Three text formats are supported:
//!
//! - `.adj`: a plain 0/1 adjacency matrix, optionally preceded by comment lines;
//! - `.qwml`: an XML document holding the adjacency, the probability
//!   distribution and optional layout/metadata;
//! - raw grid (any other extension): one line of fixed-width probabilities per time step.

pub mod adjacency;
pub mod qwml;
pub mod raw;

pub use adjacency::{format_adjacency, parse_adjacency, read_adjacency, write_adjacency};
pub use qwml::{parse_qwml, read_qwml, write_qwml, QwmlDocument};
pub use raw::{format_raw, parse_raw, read_raw, write_raw};

use std::path::Path;

/// File formats distinguished by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.adj` adjacency matrix.
    Adjacency,
    /// `.qwml` document.
    Qwml,
    /// Anything else: raw probability grid.
    Raw,
}

impl FileKind {
    /// Classifies `path` by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("adj") => FileKind::Adjacency,
            Some("qwml") => FileKind::Qwml,
            _ => FileKind::Raw,
        }
    }
}
