// src/graph/generators.rs

//! Standard graph families for experiments and tests.

use super::Graph;
use crate::core::{QwError, Result};
use rand::SeedableRng;
use rand::distr::{Bernoulli, Distribution};
use rand::rngs::StdRng;

/// Cycle `0 - 1 - ... - (n-1) - 0`. Fewer than three vertices degrade to a path.
pub fn cycle(vertex_count: usize) -> Graph {
    let mut graph = path(vertex_count);
    if vertex_count >= 3 {
        graph.connect(vertex_count - 1, 0);
    }
    graph
}

/// Path `0 - 1 - ... - (n-1)`.
pub fn path(vertex_count: usize) -> Graph {
    let mut graph = Graph::new(vertex_count);
    for i in 1..vertex_count {
        graph.connect(i - 1, i);
    }
    graph
}

/// Star with center `0` and `leaves` leaves `1..=leaves`.
pub fn star(leaves: usize) -> Graph {
    let mut graph = Graph::new(leaves + 1);
    for leaf in 1..=leaves {
        graph.connect(0, leaf);
    }
    graph
}

/// Complete graph on `vertex_count` vertices.
pub fn complete(vertex_count: usize) -> Graph {
    let mut graph = Graph::new(vertex_count);
    for i in 0..vertex_count {
        for j in (i + 1)..vertex_count {
            graph.connect(i, j);
        }
    }
    graph
}

/// Hypercube of dimension `dimension` (`2^dimension` vertices, edges between
/// labels that differ in one bit).
///
/// # Errors
/// * `QwError::InvalidParameter` when the `4^dimension` adjacency entries
///   overflow `usize`, i.e. `dimension >= usize::BITS / 2`.
/// * `QwError::Allocation` when the adjacency matrix cannot be reserved.
pub fn hypercube(dimension: u32) -> Result<Graph> {
    if dimension >= usize::BITS / 2 {
        return Err(QwError::InvalidParameter {
            message: format!(
                "hypercube dimension {} is too large, at most {} is addressable",
                dimension,
                usize::BITS / 2 - 1
            ),
        });
    }
    let vertex_count = 1usize << dimension;
    let mut graph = Graph::try_new(vertex_count)?;
    for v in 0..vertex_count {
        for bit in 0..dimension {
            let u = v ^ (1 << bit);
            if v < u {
                graph.connect(v, u);
            }
        }
    }
    Ok(graph)
}

/// Erdős–Rényi `G(n, p)` graph. The same `seed` always yields the same graph.
///
/// # Errors
/// * `QwError::InvalidParameter` if `edge_probability` is not within `[0, 1]`.
/// * `QwError::Allocation` if the adjacency matrix cannot be reserved.
pub fn random(vertex_count: usize, edge_probability: f64, seed: u64) -> Result<Graph> {
    let coin = Bernoulli::new(edge_probability).map_err(|e| QwError::InvalidParameter {
        message: format!("edge probability {} rejected: {}", edge_probability, e),
    })?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::try_new(vertex_count)?;
    for i in 0..vertex_count {
        for j in (i + 1)..vertex_count {
            if coin.sample(&mut rng) {
                graph.connect(i, j);
            }
        }
    }
    Ok(graph)
}
