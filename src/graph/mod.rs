// src/graph/mod.rs

//! Undirected graphs held as dense adjacency matrices.
//!
//! A [`Graph`] is the topology a walk runs on. Its vertex count is fixed at
//! construction; edges are always stored in both directions and self-loops
//! are not representable.

pub mod topology;
pub mod generators;

use crate::core::{QwError, Result};
use std::fmt;

pub use topology::{compute_degrees, incident_neighbors, CoinLayout};

/// A simple undirected graph on vertices `0..vertex_count`.
#[derive(Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: usize,
    /// Row-major `vertex_count × vertex_count` adjacency; always symmetric, zero diagonal.
    adjacency: Vec<bool>,
}

impl Graph {
    /// Creates an edgeless graph with `vertex_count` vertices.
    ///
    /// # Panics
    /// If `vertex_count²` overflows `usize`. Use [`Graph::try_new`] for sizes
    /// that come from outside the program.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            adjacency: vec![false; vertex_count * vertex_count],
        }
    }

    /// Creates an edgeless graph, reporting an oversized matrix as an error.
    ///
    /// # Errors
    /// `QwError::Allocation` if `vertex_count²` overflows `usize` or the
    /// adjacency buffer cannot be reserved.
    pub fn try_new(vertex_count: usize) -> Result<Self> {
        let len = vertex_count.checked_mul(vertex_count).ok_or_else(|| QwError::Allocation {
            message: format!("adjacency matrix for {} vertices overflows usize", vertex_count),
        })?;
        let mut adjacency = Vec::new();
        adjacency.try_reserve_exact(len).map_err(|e| QwError::Allocation {
            message: format!("cannot reserve {} adjacency entries: {}", len, e),
        })?;
        adjacency.resize(len, false);
        Ok(Self { vertex_count, adjacency })
    }

    /// Builds a graph from a square 0/1 matrix.
    ///
    /// # Errors
    /// `QwError::InvalidTopology` if the matrix is not square, holds a value
    /// other than 0 or 1, is not symmetric, or has a non-zero diagonal.
    pub fn from_matrix<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let mut graph = Graph::try_new(n)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(QwError::topology(format!(
                    "adjacency matrix is not square: row {} has {} entries, expected {}",
                    i, row.len(), n
                )));
            }
            for (j, &entry) in row.iter().enumerate() {
                match entry {
                    0 => {}
                    1 => graph.adjacency[i * n + j] = true,
                    other => {
                        return Err(QwError::topology(format!(
                            "adjacency entry ({}, {}) is {}, expected 0 or 1",
                            i, j, other
                        )));
                    }
                }
            }
        }
        graph.check_topology()?;
        Ok(graph)
    }

    /// Builds a graph on `vertex_count` vertices from an undirected edge list.
    pub fn from_edges(vertex_count: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut graph = Graph::try_new(vertex_count)?;
        for &(i, j) in edges {
            graph.set_edge(i, j)?;
        }
        Ok(graph)
    }

    /// Adds the undirected edge `{i, j}`, setting both `(i, j)` and `(j, i)`.
    ///
    /// Adding an existing edge is a no-op.
    ///
    /// # Errors
    /// `QwError::InvalidVertex` if either endpoint is out of range,
    /// `QwError::InvalidTopology` for a self-loop.
    pub fn set_edge(&mut self, i: usize, j: usize) -> Result<()> {
        for v in [i, j] {
            if v >= self.vertex_count {
                return Err(QwError::vertex(
                    v,
                    format!("edge endpoint out of range for {} vertices", self.vertex_count),
                ));
            }
        }
        if i == j {
            return Err(QwError::topology(format!("self-loop at vertex {} is not supported", i)));
        }
        self.connect(i, j);
        Ok(())
    }

    /// Sets both directions of `{i, j}` without validation. Callers guarantee
    /// `i != j` and both indices are in range.
    pub(crate) fn connect(&mut self, i: usize, j: usize) {
        debug_assert!(i != j && i < self.vertex_count && j < self.vertex_count);
        let n = self.vertex_count;
        self.adjacency[i * n + j] = true;
        self.adjacency[j * n + i] = true;
    }

    /// Removes the undirected edge `{i, j}` if present. Out-of-range indices are ignored.
    pub fn remove_edge(&mut self, i: usize, j: usize) {
        if i < self.vertex_count && j < self.vertex_count {
            let n = self.vertex_count;
            self.adjacency[i * n + j] = false;
            self.adjacency[j * n + i] = false;
        }
    }

    /// Whether `{i, j}` is an edge. Out-of-range indices are never adjacent.
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        i < self.vertex_count && j < self.vertex_count && self.adjacency[i * self.vertex_count + j]
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().filter(|&&a| a).count() / 2
    }

    /// Row `vertex` of the adjacency matrix.
    pub fn adjacency_row(&self, vertex: usize) -> &[bool] {
        let n = self.vertex_count;
        &self.adjacency[vertex * n..(vertex + 1) * n]
    }

    /// Undirected edges `(i, j)` with `i < j`, in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertex_count;
        (0..n).flat_map(move |i| ((i + 1)..n).filter(move |&j| self.has_edge(i, j)).map(move |j| (i, j)))
    }

    /// Degree of every vertex, see [`compute_degrees`].
    pub fn degrees(&self) -> Vec<usize> {
        compute_degrees(self)
    }

    /// Re-checks symmetry and the empty diagonal.
    fn check_topology(&self) -> Result<()> {
        let n = self.vertex_count;
        for i in 0..n {
            if self.adjacency[i * n + i] {
                return Err(QwError::topology(format!("self-loop at vertex {} is not supported", i)));
            }
            for j in (i + 1)..n {
                if self.adjacency[i * n + j] != self.adjacency[j * n + i] {
                    return Err(QwError::topology(format!(
                        "adjacency matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qwalk::Graph[{} vertices, {} edges]", self.vertex_count, self.edge_count())?;
        for i in 0..self.vertex_count {
            let row: Vec<&str> = self.adjacency_row(i).iter().map(|&a| if a { "1" } else { "0" }).collect();
            writeln!(f, "  {}", row.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
