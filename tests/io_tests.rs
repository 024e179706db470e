// tests/io_tests.rs

use qwalk::io::{self, FileKind, QwmlDocument};
use qwalk::{generators, quantum_search, quantum_walk, QwError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_adjacency_file_drives_a_walk() -> Result<(), QwError> {
    let dir = tempdir()?;
    let path = dir.path().join("cycle.adj");
    fs::write(&path, "four-cycle, written by hand\n\n0 1 0 1\n1 0 1 0\n0 1 0 1\n1 0 1 0\n")?;

    let graph = io::read_adjacency(&path)?;
    assert_eq!(graph, generators::cycle(4));
    let table = quantum_walk(&graph, 0, 3)?;
    assert!((table.probability_at(2, 2).unwrap_or(0.0) - 1.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_written_adjacency_reads_back() -> Result<(), QwError> {
    let dir = tempdir()?;
    let path = dir.path().join("cube.adj");
    let graph = generators::hypercube(3)?;
    io::write_adjacency(&path, &graph)?;
    assert_eq!(io::read_adjacency(&path)?, graph);
    Ok(())
}

#[test]
fn test_qwml_file_keeps_graph_and_table() -> Result<(), QwError> {
    let dir = tempdir()?;
    let path = dir.path().join("search.qwml");
    let graph = generators::complete(5);
    let table = quantum_search(&graph, 1, 8)?;
    let doc = QwmlDocument::new(graph.clone(), table.clone())?.with_comment("computed_by_qwalk");
    io::write_qwml(&path, &doc)?;

    let loaded = io::read_qwml(&path)?;
    assert_eq!(loaded.graph(), &graph);
    assert_eq!(loaded.filename(), Some("search.qwml"));
    assert_eq!(loaded.comment(), Some("computed_by_qwalk"));
    assert_eq!(loaded.table().steps(), 8);
    // Stored with 8 decimals
    for t in 0..table.steps() {
        for v in 0..graph.vertex_count() {
            let a = table.probability_at(v, t).unwrap_or(f64::NAN);
            let b = loaded.table().probability_at(v, t).unwrap_or(f64::NAN);
            assert!((a - b).abs() <= 5e-9, "v={} t={} {} vs {}", v, t, a, b);
        }
    }
    Ok(())
}

#[test]
fn test_raw_grid_file() -> Result<(), QwError> {
    let dir = tempdir()?;
    let path = dir.path().join("walk.prob");
    assert_eq!(FileKind::from_path(&path), FileKind::Raw);
    let table = quantum_walk(&generators::path(4), 1, 5)?;
    io::write_raw(&path, &table)?;

    let text = fs::read_to_string(&path)?;
    assert_eq!(text.lines().count(), 5);
    assert!(text.starts_with("0.0000000000  1.0000000000  0.0000000000  0.0000000000  \n"));
    let loaded = io::read_raw(&path)?;
    assert_eq!(loaded.steps(), 5);
    assert_eq!(loaded.vertex_count(), 4);
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = io::read_adjacency(Path::new("/definitely/not/here.adj"));
    assert!(matches!(result, Err(QwError::Io(_))));
}
