// src/simulation/results.rs
use crate::core::{AmplitudeSpace, QwError, Result};
use std::fmt;

/// Per-vertex measurement probabilities for every recorded time step.
///
/// Row `t` holds the distribution sampled *before* step `t`'s coin and
/// shift, so row 0 is the seeded state and a run of `steps` steps yields
/// rows `0..steps`. Tables are read-only once built; a walk run hands its
/// table to the caller, who passes it on to a writer or renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    vertex_count: usize,
    steps: usize,
    /// Time-major: `probabilities[t * vertex_count + v]`.
    probabilities: Vec<f64>,
    max_probability: f64,
}

impl ProbabilityTable {
    fn from_flat(vertex_count: usize, steps: usize, probabilities: Vec<f64>) -> Self {
        let max_probability = probabilities.iter().copied().fold(0.0, f64::max);
        Self { vertex_count, steps, probabilities, max_probability }
    }

    /// Builds a table from time-major rows (one row per step, one column per vertex).
    ///
    /// # Errors
    /// `QwError::InvalidParameter` if there are no rows or the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let steps = rows.len();
        let vertex_count = rows.first().map(Vec::len).ok_or_else(|| QwError::InvalidParameter {
            message: "a probability table needs at least one time step".to_string(),
        })?;
        let mut probabilities = Vec::with_capacity(steps * vertex_count);
        for (t, row) in rows.into_iter().enumerate() {
            if row.len() != vertex_count {
                return Err(QwError::InvalidParameter {
                    message: format!("time step {} has {} vertices, expected {}", t, row.len(), vertex_count),
                });
            }
            probabilities.extend(row);
        }
        Ok(Self::from_flat(vertex_count, steps, probabilities))
    }

    /// Builds a table from vertex-major series (one series per vertex, one entry per step).
    ///
    /// # Errors
    /// `QwError::InvalidParameter` if there are no series, a series is
    /// empty, or the series differ in length.
    pub fn from_vertex_series(series: Vec<Vec<f64>>) -> Result<Self> {
        let vertex_count = series.len();
        let steps = series.first().map(Vec::len).unwrap_or(0);
        if vertex_count == 0 || steps == 0 {
            return Err(QwError::InvalidParameter {
                message: "a probability table needs at least one vertex and one time step".to_string(),
            });
        }
        if let Some((v, s)) = series.iter().enumerate().find(|(_, s)| s.len() != steps) {
            return Err(QwError::InvalidParameter {
                message: format!("vertex {} has {} time steps, expected {}", v, s.len(), steps),
            });
        }
        let mut probabilities = vec![0.0; vertex_count * steps];
        for (v, s) in series.iter().enumerate() {
            for (t, &p) in s.iter().enumerate() {
                probabilities[t * vertex_count + v] = p;
            }
        }
        Ok(Self::from_flat(vertex_count, steps, probabilities))
    }

    /// Number of vertices (columns).
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of recorded time steps (rows).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Probability of `vertex` at time `time`, or `None` outside the table.
    pub fn probability_at(&self, vertex: usize, time: usize) -> Option<f64> {
        if vertex >= self.vertex_count || time >= self.steps {
            return None;
        }
        Some(self.probabilities[time * self.vertex_count + vertex])
    }

    /// Largest probability anywhere in the table.
    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }

    /// Distribution at time `time`.
    pub fn step(&self, time: usize) -> Option<&[f64]> {
        if time >= self.steps {
            return None;
        }
        let n = self.vertex_count;
        Some(&self.probabilities[time * n..(time + 1) * n])
    }

    /// Distributions in time order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.steps).filter_map(move |t| self.step(t))
    }

    /// Probabilities of `vertex` over time; empty for an out-of-range vertex.
    pub fn vertex_series(&self, vertex: usize) -> impl Iterator<Item = f64> + '_ {
        let n = self.vertex_count;
        let steps = if vertex < n { self.steps } else { 0 };
        (0..steps).map(move |t| self.probabilities[t * n + vertex])
    }

    /// Total probability at time `time`.
    pub fn total_at(&self, time: usize) -> Option<f64> {
        self.step(time).map(|row| row.iter().sum())
    }

    /// Probability of `vertex` a fraction of the way from `time` to `time + 1`.
    ///
    /// This is what a renderer draws between integer steps. `fraction` is
    /// clamped to `[0, 1]`; at the last step the value is held.
    pub fn interpolate(&self, vertex: usize, time: usize, fraction: f64) -> Option<f64> {
        let here = self.probability_at(vertex, time)?;
        let next = self.probability_at(vertex, time + 1).unwrap_or(here);
        let f = fraction.clamp(0.0, 1.0);
        Some(here * (1.0 - f) + next * f)
    }
}

impl fmt::Display for ProbabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Probability Table: {} vertices x {} steps (max {:.6})",
            self.vertex_count, self.steps, self.max_probability
        )?;
        for (t, row) in self.rows().enumerate() {
            let cells: Vec<String> = row.iter().map(|p| format!("{:.6}", p)).collect();
            writeln!(f, "  t={:<4} {}", t, cells.join(" "))?;
        }
        Ok(())
    }
}

/// Fills a table one time step at a time during a run.
pub(crate) struct ProbabilityRecorder {
    vertex_count: usize,
    steps: usize,
    probabilities: Vec<f64>,
}

impl ProbabilityRecorder {
    /// Reserves the full `steps × vertex_count` buffer up front.
    pub(crate) fn try_new(vertex_count: usize, steps: usize) -> Result<Self> {
        let len = vertex_count.checked_mul(steps).ok_or_else(|| QwError::Allocation {
            message: format!("probability table of {} x {} overflows usize", steps, vertex_count),
        })?;
        let mut probabilities = Vec::new();
        probabilities.try_reserve_exact(len).map_err(|e| QwError::Allocation {
            message: format!("cannot reserve {} probabilities: {}", len, e),
        })?;
        Ok(Self { vertex_count, steps, probabilities })
    }

    /// Appends the measurement distribution of `space` as the next row.
    pub(crate) fn record(&mut self, space: &AmplitudeSpace) {
        debug_assert_eq!(space.vertex_count(), self.vertex_count);
        debug_assert!(self.recorded() < self.steps);
        self.probabilities.extend((0..self.vertex_count).map(|v| space.vertex_probability(v)));
    }

    /// Rows recorded so far.
    pub(crate) fn recorded(&self) -> usize {
        if self.vertex_count == 0 { 0 } else { self.probabilities.len() / self.vertex_count }
    }

    pub(crate) fn finish(self) -> ProbabilityTable {
        ProbabilityTable::from_flat(self.vertex_count, self.steps, self.probabilities)
    }
}
