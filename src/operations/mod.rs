// src/operations/mod.rs

//! Coin operators acting on a vertex's local coin space.
//!
//! Each vertex of degree `d` owns a `d`-dimensional subspace of the walk
//! state (one amplitude per incident edge). A coin is a real orthogonal
//! `d × d` matrix mixing those amplitudes before the shift moves them
//! across edges:
//!
//! - the Grover diffusion coin, `2/d − 1` on the diagonal and `2/d`
//!   elsewhere, used at every ordinary vertex;
//! - the negative identity, used in place of Grover at the marked vertex
//!   of a search so that amplitude accumulates there.
//!
//! Degree 0 means an empty coin (nothing to mix). Degree 1 makes the
//! Grover coin the `1 × 1` matrix `[1]`, so a leaf passes its amplitude
//! through unchanged.

use crate::graph::CoinLayout;
use num_complex::Complex;
use num_traits::Zero;
use std::collections::BTreeMap;
use std::fmt;

/// Which coin a vertex uses during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoinKind {
    /// Grover diffusion coin.
    Grover,
    /// `−I`, applied at the marked vertex of a search.
    NegativeIdentity,
}

impl CoinKind {
    /// Builds this coin for a vertex of the given degree.
    pub fn matrix(self, degree: usize) -> CoinMatrix {
        match self {
            CoinKind::Grover => grover_coin(degree),
            CoinKind::NegativeIdentity => negative_identity_coin(degree),
        }
    }
}

/// A dense real square matrix acting on one vertex's coin space.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinMatrix {
    dim: usize,
    entries: Vec<f64>,
}

impl CoinMatrix {
    fn from_fn(dim: usize, entry: impl Fn(usize, usize) -> f64) -> Self {
        let mut entries = Vec::with_capacity(dim * dim);
        for r in 0..dim {
            for c in 0..dim {
                entries.push(entry(r, c));
            }
        }
        Self { dim, entries }
    }

    /// Side length of the matrix (the vertex degree).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at row `r`, column `c`.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.entries[r * self.dim + c]
    }

    /// Row `r` of the matrix.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.entries[r * self.dim..(r + 1) * self.dim]
    }

    /// Writes `self × input` into `output`. Both slices must have length `dim`.
    pub fn apply(&self, input: &[Complex<f64>], output: &mut [Complex<f64>]) {
        debug_assert_eq!(input.len(), self.dim);
        debug_assert_eq!(output.len(), self.dim);
        for (k, out) in output.iter_mut().enumerate() {
            let mut acc = Complex::zero();
            for (c, &amp) in self.row(k).iter().zip(input) {
                acc += amp * *c;
            }
            *out = acc;
        }
    }

    /// Largest absolute entry of `CᵀC − I`; zero for an exactly orthogonal coin.
    pub fn orthogonality_defect(&self) -> f64 {
        let d = self.dim;
        let mut worst: f64 = 0.0;
        for r in 0..d {
            for c in 0..d {
                let dot: f64 = (0..d).map(|k| self.get(k, r) * self.get(k, c)).sum();
                let expected = if r == c { 1.0 } else { 0.0 };
                worst = worst.max((dot - expected).abs());
            }
        }
        worst
    }
}

impl fmt::Display for CoinMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CoinMatrix[{}x{}]", self.dim, self.dim)?;
        for r in 0..self.dim {
            let cells: Vec<String> = self.row(r).iter().map(|v| format!("{:>7.4}", v)).collect();
            writeln!(f, "  [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Grover diffusion coin of dimension `degree`.
pub fn grover_coin(degree: usize) -> CoinMatrix {
    if degree == 0 {
        return CoinMatrix::from_fn(0, |_, _| 0.0);
    }
    let off = 2.0 / degree as f64;
    let diag = off - 1.0;
    CoinMatrix::from_fn(degree, |r, c| if r == c { diag } else { off })
}

/// Negative identity coin of dimension `degree`.
pub fn negative_identity_coin(degree: usize) -> CoinMatrix {
    CoinMatrix::from_fn(degree, |r, c| if r == c { -1.0 } else { 0.0 })
}

/// Coins for one run: a Grover coin per distinct degree, plus the
/// negative-identity coin of the marked vertex during a search.
#[derive(Debug, Clone)]
pub(crate) struct CoinTable {
    grover: BTreeMap<usize, CoinMatrix>,
    marked: Option<(usize, CoinMatrix)>,
}

impl CoinTable {
    pub(crate) fn new(layout: &CoinLayout, marked: Option<usize>) -> Self {
        let mut grover = BTreeMap::new();
        for v in 0..layout.vertex_count() {
            let d = layout.degree(v);
            grover.entry(d).or_insert_with(|| grover_coin(d));
        }
        let marked = marked.map(|m| (m, negative_identity_coin(layout.degree(m))));
        Self { grover, marked }
    }

    /// Which coin `vertex` uses.
    pub(crate) fn kind_for(&self, vertex: usize) -> CoinKind {
        match self.marked {
            Some((m, _)) if m == vertex => CoinKind::NegativeIdentity,
            _ => CoinKind::Grover,
        }
    }

    /// The coin matrix for `vertex`, whose degree is `degree`.
    pub(crate) fn coin_for(&self, vertex: usize, degree: usize) -> Option<&CoinMatrix> {
        match (&self.marked, self.kind_for(vertex)) {
            (Some((_, coin)), CoinKind::NegativeIdentity) => Some(coin),
            _ => self.grover.get(&degree),
        }
    }
}
