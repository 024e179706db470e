// src/core/state.rs

use super::error::{QwError, Result};
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// The full coin-space state of a walker on an `n`-vertex graph.
///
/// Entry `(i, j)` holds the amplitude of the walker sitting at vertex `i`
/// pointing along its edge towards `j`. Entries where `(i, j)` is not an
/// edge stay zero for the whole run. Storage is a flat row-major buffer
/// of `n * n` complex values; row `i` is vertex `i`'s local coin space
/// spread over the full width.
///
/// Coins and seeds in this crate are real, so the imaginary parts stay at
/// zero; complex storage keeps the state type aligned with the usual
/// quantum-state representation and makes `norm_sqr` the measurement rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeSpace {
    vertex_count: usize,
    amplitudes: Vec<Complex<f64>>,
}

impl AmplitudeSpace {
    /// Allocates an all-zero space for `vertex_count` vertices.
    ///
    /// Returns `QwError::Allocation` if `vertex_count²` overflows or the
    /// buffer cannot be reserved.
    pub(crate) fn zeroed(vertex_count: usize) -> Result<Self> {
        let len = vertex_count.checked_mul(vertex_count).ok_or_else(|| QwError::Allocation {
            message: format!("amplitude space for {} vertices overflows usize", vertex_count),
        })?;
        let mut amplitudes = Vec::new();
        amplitudes.try_reserve_exact(len).map_err(|e| QwError::Allocation {
            message: format!("cannot reserve {} amplitudes: {}", len, e),
        })?;
        amplitudes.resize(len, Complex::zero());
        Ok(Self { vertex_count, amplitudes })
    }

    /// Number of vertices (rows) in the space.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Amplitude at `(vertex, towards)`, or `None` when either index is out of range.
    pub fn amplitude(&self, vertex: usize, towards: usize) -> Option<Complex<f64>> {
        if vertex >= self.vertex_count || towards >= self.vertex_count {
            return None;
        }
        Some(self.amplitudes[vertex * self.vertex_count + towards])
    }

    pub(crate) fn set(&mut self, vertex: usize, towards: usize, value: Complex<f64>) {
        let n = self.vertex_count;
        self.amplitudes[vertex * n + towards] = value;
    }

    /// Row `vertex` of the space.
    pub fn row(&self, vertex: usize) -> &[Complex<f64>] {
        let n = self.vertex_count;
        &self.amplitudes[vertex * n..(vertex + 1) * n]
    }

    /// Iterates the rows in vertex order.
    pub fn rows(&self) -> impl Iterator<Item = &[Complex<f64>]> {
        // max(1) keeps chunks_exact valid for the empty graph; the buffer is empty then.
        self.amplitudes.chunks_exact(self.vertex_count.max(1))
    }

    pub(crate) fn as_slice(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Measurement probability of finding the walker at `vertex`.
    pub fn vertex_probability(&self, vertex: usize) -> f64 {
        self.row(vertex).iter().map(|c| c.norm_sqr()).sum()
    }

    /// Sum of all squared amplitudes; stays at its seeded value under evolution.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }
}

impl fmt::Display for AmplitudeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AmplitudeSpace[{} vertices]", self.vertex_count)?;
        for (i, row) in self.rows().enumerate() {
            write!(f, "  {:>3}: [", i)?;
            for (j, c) in row.iter().enumerate() {
                write!(f, "{}{:.4}", if j > 0 { ", " } else { "" }, c.re)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_space_has_no_probability() -> Result<()> {
        let space = AmplitudeSpace::zeroed(3)?;
        assert_eq!(space.vertex_count(), 3);
        assert_eq!(space.rows().count(), 3);
        assert_eq!(space.total_probability(), 0.0);
        Ok(())
    }

    #[test]
    fn test_empty_space_has_no_rows() -> Result<()> {
        let space = AmplitudeSpace::zeroed(0)?;
        assert_eq!(space.rows().count(), 0);
        assert_eq!(space.amplitude(0, 0), None);
        Ok(())
    }

    #[test]
    fn test_vertex_probability_sums_row() -> Result<()> {
        let mut space = AmplitudeSpace::zeroed(2)?;
        space.set(0, 1, Complex::new(0.6, 0.0));
        space.set(1, 0, Complex::new(0.0, 0.8));
        assert!((space.vertex_probability(0) - 0.36).abs() < 1e-12);
        assert!((space.vertex_probability(1) - 0.64).abs() < 1e-12);
        assert!((space.total_probability() - 1.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_overflowing_size_is_allocation_failure() {
        let err = AmplitudeSpace::zeroed(usize::MAX).unwrap_err();
        assert!(matches!(err, QwError::Allocation { .. }));
    }
}
