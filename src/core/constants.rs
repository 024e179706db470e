//! Numeric tolerances and defaults shared by the engine and its collaborators.

/// Defaults used when a caller does not specify a value.
pub mod qw_constants {
    /// Allowed deviation of total probability from its initial value.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Allowed deviation of `CᵀC` from the identity for coin matrices.
    pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-12;
    /// Number of time steps when none is given.
    pub const DEFAULT_STEPS: usize = 200;
    /// Comment stamped into QWML files written by this crate.
    pub const DEFAULT_COMMENT: &str = "computed_by_qwalk";
}
