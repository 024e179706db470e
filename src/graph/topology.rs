// src/graph/topology.rs

//! Degree and neighbor-order utilities.
//!
//! The order of a vertex's neighbors is the map between "index `k` in the
//! vertex's local `d`-dimensional coin space" and "neighbor vertex `j`". It is
//! always increasing vertex index, so gathering amplitudes into a coin vector
//! and scattering them back agree on every step of every run.

use super::Graph;

/// Number of neighbors of each vertex. Isolated vertices have degree 0.
pub fn compute_degrees(graph: &Graph) -> Vec<usize> {
    (0..graph.vertex_count())
        .map(|i| graph.adjacency_row(i).iter().filter(|&&a| a).count())
        .collect()
}

/// Neighbors of `vertex` in increasing index order.
///
/// Returns an empty list for an isolated or out-of-range vertex.
pub fn incident_neighbors(graph: &Graph, vertex: usize) -> Vec<usize> {
    if vertex >= graph.vertex_count() {
        return Vec::new();
    }
    graph
        .adjacency_row(vertex)
        .iter()
        .enumerate()
        .filter_map(|(j, &a)| a.then_some(j))
        .collect()
}

/// Neighbor lists for every vertex, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinLayout {
    neighbors: Vec<Vec<usize>>,
}

impl CoinLayout {
    /// Captures the coin-space ordering of `graph`.
    pub fn new(graph: &Graph) -> Self {
        let neighbors = (0..graph.vertex_count())
            .map(|v| incident_neighbors(graph, v))
            .collect();
        Self { neighbors }
    }

    /// Number of vertices covered by the layout.
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Ordered neighbors of `vertex`.
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.neighbors[vertex]
    }

    /// Dimension of `vertex`'s local coin space.
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors[vertex].len()
    }

    /// Largest degree in the graph, 0 for an edgeless graph.
    pub fn max_degree(&self) -> usize {
        self.neighbors.iter().map(Vec::len).max().unwrap_or(0)
    }
}
