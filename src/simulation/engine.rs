// src/simulation/engine.rs
use crate::core::{AmplitudeSpace, Result};
use crate::graph::{CoinLayout, Graph};
use crate::operations::{CoinMatrix, CoinTable};
#[cfg(test)]
use crate::operations::CoinKind;
use crate::params::WalkProcedure;
use crate::simulation::results::ProbabilityRecorder;
use num_complex::Complex;
use num_traits::Zero;
use tracing::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owns the walk state for one run and evolves it step by step.
///
/// Created already seeded (`init`), then driven by the caller alternating
/// `record` and `step`. The amplitude buffers live exactly as long as the
/// engine, i.e. one run.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    layout: CoinLayout,
    coins: CoinTable,
    /// Current state.
    space: AmplitudeSpace,
    /// Output buffer for the shift. Non-edge entries are never written and stay zero.
    shifted: AmplitudeSpace,
    /// Number of completed coin+shift steps.
    time: usize,
}

impl SimulationEngine {
    /// Validates `procedure` against `graph`, allocates the state and seeds it.
    ///
    /// Nothing is allocated when validation fails.
    pub(crate) fn init(graph: &Graph, procedure: WalkProcedure) -> Result<Self> {
        procedure.validate_for(graph)?;

        let n = graph.vertex_count();
        let layout = CoinLayout::new(graph);
        let coins = CoinTable::new(&layout, procedure.marked_vertex());
        let mut engine = Self {
            space: AmplitudeSpace::zeroed(n)?,
            shifted: AmplitudeSpace::zeroed(n)?,
            layout,
            coins,
            time: 0,
        };

        match procedure {
            WalkProcedure::Walk { start } => engine.seed_single_vertex(start),
            WalkProcedure::Search { .. } => engine.seed_equal_superposition(),
        }
        debug!(
            procedure = procedure.name(),
            vertices = n,
            total_probability = engine.space.total_probability(),
            "seeded amplitude space"
        );
        Ok(engine)
    }

    /// Puts all amplitude on `start`, split equally over its edges.
    /// Callers have already checked that `start` has at least one edge.
    fn seed_single_vertex(&mut self, start: usize) {
        let d = self.layout.degree(start);
        let amp = Complex::new((1.0 / d as f64).sqrt(), 0.0);
        for &j in self.layout.neighbors(start) {
            self.space.set(start, j, amp);
        }
    }

    /// Gives every edge slot `(i, j)` the amplitude `1/sqrt(deg(i) * n)`.
    ///
    /// Every non-isolated vertex then carries probability `1/n`. On an
    /// irregular graph the arc amplitudes differ between vertices of
    /// different degree, so this is not an equal superposition of arcs.
    fn seed_equal_superposition(&mut self) {
        let n = self.layout.vertex_count();
        for i in 0..n {
            let d = self.layout.degree(i);
            if d == 0 {
                continue;
            }
            let amp = Complex::new((1.0 / (d * n) as f64).sqrt(), 0.0);
            for &j in self.layout.neighbors(i) {
                self.space.set(i, j, amp);
            }
        }
    }

    /// Appends the current vertex distribution to `recorder`.
    pub(crate) fn record(&self, recorder: &mut ProbabilityRecorder) {
        recorder.record(&self.space);
    }

    /// One time step: coin on every vertex, then the shift.
    pub(crate) fn step(&mut self) {
        self.apply_coin_step();
        self.apply_shift_step();
        self.time += 1;
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(time = self.time, total_probability = self.space.total_probability(), "step applied");
        }
    }

    /// Applies each vertex's coin to its own row of the state.
    ///
    /// Rows are disjoint, so the order of vertices does not matter and the
    /// `parallel` feature may process them concurrently.
    pub(crate) fn apply_coin_step(&mut self) {
        let n = self.layout.vertex_count();
        if n == 0 {
            return;
        }
        let layout = &self.layout;
        let coins = &self.coins;

        #[cfg(feature = "parallel")]
        self.space
            .as_mut_slice()
            .par_chunks_mut(n)
            .enumerate()
            .for_each_init(
                || (Vec::new(), Vec::new()),
                |(gathered, mixed), (i, row)| {
                    coin_row(layout.neighbors(i), coins.coin_for(i, layout.degree(i)), row, gathered, mixed)
                },
            );

        #[cfg(not(feature = "parallel"))]
        {
            let mut gathered = Vec::with_capacity(layout.max_degree());
            let mut mixed = Vec::with_capacity(layout.max_degree());
            for (i, row) in self.space.as_mut_slice().chunks_mut(n).enumerate() {
                coin_row(layout.neighbors(i), coins.coin_for(i, layout.degree(i)), row, &mut gathered, &mut mixed);
            }
        }
    }

    /// Moves amplitude across every edge: `new[i][j] = old[j][i]`.
    ///
    /// Reads only the previous state and writes only the separate output
    /// buffer, then swaps the two.
    pub(crate) fn apply_shift_step(&mut self) {
        let n = self.layout.vertex_count();
        {
            let old = self.space.as_slice();
            let new = self.shifted.as_mut_slice();
            for i in 0..n {
                for &j in self.layout.neighbors(i) {
                    new[i * n + j] = old[j * n + i];
                }
            }
        }
        std::mem::swap(&mut self.space, &mut self.shifted);
    }

    /// The current state.
    pub(crate) fn space(&self) -> &AmplitudeSpace {
        &self.space
    }

    /// Completed steps.
    pub(crate) fn time(&self) -> usize {
        self.time
    }

    #[cfg(test)]
    pub(crate) fn coin_kind(&self, vertex: usize) -> CoinKind {
        self.coins.kind_for(vertex)
    }

    #[cfg(test)]
    pub(crate) fn set_amplitude(&mut self, vertex: usize, towards: usize, value: Complex<f64>) {
        self.space.set(vertex, towards, value);
    }
}

/// Gathers `row` at `neighbors`, multiplies by `coin` and scatters back in
/// the same order. Entries outside `neighbors` are untouched.
fn coin_row(
    neighbors: &[usize],
    coin: Option<&CoinMatrix>,
    row: &mut [Complex<f64>],
    gathered: &mut Vec<Complex<f64>>,
    mixed: &mut Vec<Complex<f64>>,
) {
    let Some(coin) = coin else { return };
    if neighbors.is_empty() {
        return;
    }
    gathered.clear();
    gathered.extend(neighbors.iter().map(|&j| row[j]));
    mixed.clear();
    mixed.resize(neighbors.len(), Complex::zero());
    coin.apply(gathered.as_slice(), mixed.as_mut_slice());
    for (&j, &value) in neighbors.iter().zip(mixed.iter()) {
        row[j] = value;
    }
}
