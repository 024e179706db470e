// src/simulation/mod.rs

//! Runs discrete-time coined quantum walks on a [`Graph`].
//! This module contains the `Walker` entry point and the internal `SimulationEngine`
//! that owns and evolves the amplitude state for one run.

mod results;
pub(crate) mod engine;

pub use results::ProbabilityTable;

use crate::core::Result;
use crate::graph::Graph;
use crate::params::WalkParameters;
use crate::validation;
use engine::SimulationEngine;
use results::ProbabilityRecorder;
use tracing::{info, warn};

/// Drives walk and search runs.
///
/// A `Walker` holds no state between runs; every call to [`Walker::run`]
/// builds a fresh engine, so concurrent runs on different threads are
/// independent.
#[derive(Debug, Default)]
pub struct Walker {
    norm_tolerance: Option<f64>,
}

impl Walker {
    /// Creates a walker with the default drift tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the tolerance used for the post-run conservation check.
    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = Some(tolerance);
        self
    }

    /// Runs the procedure described by `params` on `graph`.
    ///
    /// Each of the `params.steps()` iterations records the vertex
    /// distribution, then applies the coin and the shift. Row 0 of the
    /// returned table is therefore the seeded state.
    ///
    /// # Errors
    /// * `QwError::InvalidVertex` for an out-of-range start/marked vertex or an isolated start vertex.
    /// * `QwError::Allocation` if the state or the table cannot be reserved.
    ///
    /// All of these are reported before the first step runs.
    pub fn run(&self, graph: &Graph, params: &WalkParameters) -> Result<ProbabilityTable> {
        let procedure = params.procedure();
        let steps = params.steps();
        info!(
            procedure = procedure.name(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            steps,
            "starting {}",
            procedure
        );

        let mut engine = SimulationEngine::init(graph, procedure)?;
        let mut recorder = ProbabilityRecorder::try_new(graph.vertex_count(), steps)?;
        let initial_total = engine.space().total_probability();

        for _ in 0..steps {
            engine.record(&mut recorder);
            engine.step();
        }

        if let Err(e) = validation::check_normalization(engine.space(), initial_total, self.norm_tolerance) {
            warn!(time = engine.time(), "{}", e);
        }
        let table = recorder.finish();
        if let Err(e) = validation::check_probability_conservation(&table, self.norm_tolerance) {
            warn!("{}", e);
        }

        info!(
            procedure = procedure.name(),
            steps = table.steps(),
            max_probability = table.max_probability(),
            "run complete"
        );
        Ok(table)
    }
}

/// Walk from `start` (0-indexed) for `steps` steps with the default [`Walker`].
pub fn quantum_walk(graph: &Graph, start: usize, steps: usize) -> Result<ProbabilityTable> {
    Walker::new().run(graph, &WalkParameters::walk(start, steps)?)
}

/// Search for `marked` (0-indexed) over `steps` steps with the default [`Walker`].
pub fn quantum_search(graph: &Graph, marked: usize, steps: usize) -> Result<ProbabilityTable> {
    Walker::new().run(graph, &WalkParameters::search(marked, steps)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QwError;
    use crate::graph::generators;
    use approx::assert_relative_eq;

    const TEST_TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_table_shape_and_initial_row() -> Result<()> {
        let g = generators::cycle(5);
        let table = quantum_walk(&g, 2, 12)?;
        assert_eq!(table.steps(), 12);
        assert_eq!(table.vertex_count(), 5);
        let row = table.step(0).unwrap_or(&[]);
        assert_eq!(row.len(), 5);
        for (v, &p) in row.iter().enumerate() {
            let expected = if v == 2 { 1.0 } else { 0.0 };
            assert_relative_eq!(p, expected, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_single_step_records_only_seed() -> Result<()> {
        let g = generators::path(2);
        let table = quantum_walk(&g, 0, 1)?;
        assert_eq!(table.steps(), 1);
        let row = table.step(0).unwrap_or(&[]);
        assert_eq!(row.len(), 2);
        assert_relative_eq!(row[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(row[1], 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_four_cycle_splits_then_recombines() -> Result<()> {
        let g = generators::cycle(4);
        let table = quantum_walk(&g, 0, 3)?;
        // t=1: all amplitude sits on the two neighbours of vertex 0.
        let t1 = table.step(1).unwrap_or(&[]);
        assert!((t1[1] - 0.5).abs() < TEST_TOLERANCE);
        assert!((t1[3] - 0.5).abs() < TEST_TOLERANCE);
        assert!(t1[0].abs() < TEST_TOLERANCE && t1[2].abs() < TEST_TOLERANCE);
        // t=2: the two halves meet at the opposite vertex.
        let t2 = table.step(2).unwrap_or(&[]);
        assert!((t2[2] - 1.0).abs() < TEST_TOLERANCE, "t2 = {:?}", t2);
        Ok(())
    }

    #[test]
    fn test_errors_surface_before_stepping() {
        let g = generators::cycle(4);
        assert!(matches!(quantum_search(&g, 4, 10), Err(QwError::InvalidVertex { vertex: 4, .. })));
        assert!(matches!(quantum_walk(&Graph::new(2), 0, 10), Err(QwError::InvalidVertex { .. })));
        assert!(matches!(quantum_walk(&g, 0, 0), Err(QwError::InvalidParameter { .. })));
    }

    #[test]
    fn test_search_rows_sum_to_one() -> Result<()> {
        let g = generators::complete(6);
        let table = Walker::new().with_norm_tolerance(1e-10).run(&g, &WalkParameters::search(1, 30)?)?;
        for t in 0..table.steps() {
            let total = table.total_at(t).unwrap_or(f64::NAN);
            assert!((total - 1.0).abs() < TEST_TOLERANCE, "t={} total={}", t, total);
        }
        Ok(())
    }
}
