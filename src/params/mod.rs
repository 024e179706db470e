// src/params/mod.rs

//! What a run computes: the procedure (walk or search), its distinguished
//! vertex, and how many time steps to record.
//!
//! Walk and search are exclusive configurations of the same engine, so the
//! procedure is a tagged variant carrying only the vertex it needs.
//! [`WalkParametersBuilder`] accepts the two vertices independently, the way
//! a command line does, and rejects the combination.

use crate::core::{QwError, Result, DEFAULT_STEPS};
use crate::graph::Graph;
use std::fmt;

/// The two walk procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkProcedure {
    /// Walker starts localized at `start`; every vertex uses the Grover coin.
    Walk {
        /// 0-indexed start vertex.
        start: usize,
    },
    /// Walker starts in the equal edge superposition; `marked` uses `−I`.
    Search {
        /// 0-indexed marked vertex.
        marked: usize,
    },
}

impl WalkProcedure {
    /// The vertex whose coin is replaced by `−I`, if any.
    pub fn marked_vertex(&self) -> Option<usize> {
        match self {
            WalkProcedure::Walk { .. } => None,
            WalkProcedure::Search { marked } => Some(*marked),
        }
    }

    /// Short lowercase name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            WalkProcedure::Walk { .. } => "walk",
            WalkProcedure::Search { .. } => "search",
        }
    }

    /// Checks the procedure's vertex against `graph`.
    ///
    /// # Errors
    /// `QwError::InvalidVertex` when the start or marked vertex is out of
    /// range, or the start vertex has no edges to spread amplitude over.
    pub fn validate_for(&self, graph: &Graph) -> Result<()> {
        let n = graph.vertex_count();
        match *self {
            WalkProcedure::Walk { start } => {
                if start >= n {
                    return Err(QwError::vertex(start, format!("start vertex does not exist in a graph of {} vertices", n)));
                }
                if graph.adjacency_row(start).iter().all(|&a| !a) {
                    return Err(QwError::vertex(start, "start vertex has degree 0"));
                }
            }
            WalkProcedure::Search { marked } => {
                if marked >= n {
                    return Err(QwError::vertex(marked, format!("marked vertex does not exist in a graph of {} vertices", n)));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for WalkProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkProcedure::Walk { start } => write!(f, "walk from vertex {}", start),
            WalkProcedure::Search { marked } => write!(f, "search for vertex {}", marked),
        }
    }
}

/// A validated procedure plus the number of recorded time steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkParameters {
    procedure: WalkProcedure,
    steps: usize,
}

impl WalkParameters {
    /// Walk from `start` for `steps` steps.
    pub fn walk(start: usize, steps: usize) -> Result<Self> {
        Self::new(WalkProcedure::Walk { start }, steps)
    }

    /// Search for `marked` over `steps` steps.
    pub fn search(marked: usize, steps: usize) -> Result<Self> {
        Self::new(WalkProcedure::Search { marked }, steps)
    }

    /// # Errors
    /// `QwError::InvalidParameter` if `steps` is zero.
    pub fn new(procedure: WalkProcedure, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(QwError::InvalidParameter { message: "step count must be at least 1".to_string() });
        }
        Ok(Self { procedure, steps })
    }

    /// Which procedure runs, with its start or marked vertex.
    pub fn procedure(&self) -> WalkProcedure {
        self.procedure
    }

    /// Number of recorded time steps (rows of the probability table).
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl fmt::Display for WalkParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} steps", self.procedure, self.steps)
    }
}

/// Assembles [`WalkParameters`] from independently supplied options.
///
/// With neither a start nor a marked vertex the result is a walk from
/// vertex 0.
#[derive(Debug, Clone)]
pub struct WalkParametersBuilder {
    start: Option<usize>,
    marked: Option<usize>,
    steps: usize,
}

impl WalkParametersBuilder {
    /// Creates a builder with the default step count.
    pub fn new() -> Self {
        Self { start: None, marked: None, steps: DEFAULT_STEPS }
    }

    /// Sets the 0-indexed start vertex of a walk.
    pub fn start(mut self, vertex: usize) -> Self {
        self.start = Some(vertex);
        self
    }

    /// Sets the 0-indexed marked vertex of a search.
    pub fn marked(mut self, vertex: usize) -> Self {
        self.marked = Some(vertex);
        self
    }

    /// Sets the number of recorded steps.
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Finalizes the configuration.
    ///
    /// # Errors
    /// `QwError::ConfigurationConflict` when both a start and a marked
    /// vertex were given; `QwError::InvalidParameter` for zero steps.
    pub fn build(self) -> Result<WalkParameters> {
        let procedure = match (self.start, self.marked) {
            (Some(start), Some(marked)) => {
                return Err(QwError::ConfigurationConflict {
                    message: format!("start vertex {} and marked vertex {} cannot both be set", start, marked),
                });
            }
            (None, Some(marked)) => WalkProcedure::Search { marked },
            (Some(start), None) => WalkProcedure::Walk { start },
            (None, None) => WalkProcedure::Walk { start: 0 },
        };
        WalkParameters::new(procedure, self.steps)
    }
}

impl Default for WalkParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generators;

    #[test]
    fn test_builder_defaults_to_walk_from_zero() -> Result<()> {
        let params = WalkParametersBuilder::new().build()?;
        assert_eq!(params.procedure(), WalkProcedure::Walk { start: 0 });
        assert_eq!(params.steps(), DEFAULT_STEPS);
        Ok(())
    }

    #[test]
    fn test_builder_search() -> Result<()> {
        let params = WalkParametersBuilder::new().marked(3).steps(10).build()?;
        assert_eq!(params.procedure().marked_vertex(), Some(3));
        assert_eq!(params.steps(), 10);
        Ok(())
    }

    #[test]
    fn test_builder_rejects_start_and_marked() {
        let err = WalkParametersBuilder::new().start(1).marked(2).build().unwrap_err();
        assert!(matches!(err, QwError::ConfigurationConflict { .. }), "got {:?}", err);
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert!(matches!(WalkParameters::walk(0, 0), Err(QwError::InvalidParameter { .. })));
    }

    #[test]
    fn test_validate_for_checks_vertices() -> Result<()> {
        let mut g = generators::path(3);
        g.remove_edge(1, 2);
        assert!(WalkProcedure::Walk { start: 0 }.validate_for(&g).is_ok());
        assert!(matches!(
            WalkProcedure::Walk { start: 2 }.validate_for(&g),
            Err(QwError::InvalidVertex { vertex: 2, .. })
        ));
        assert!(matches!(
            WalkProcedure::Walk { start: 3 }.validate_for(&g),
            Err(QwError::InvalidVertex { vertex: 3, .. })
        ));
        assert!(WalkProcedure::Search { marked: 2 }.validate_for(&g).is_ok());
        assert!(matches!(
            WalkProcedure::Search { marked: 3 }.validate_for(&g),
            Err(QwError::InvalidVertex { vertex: 3, .. })
        ));
        Ok(())
    }
}
