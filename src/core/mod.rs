// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;
pub mod constants;

pub use error::{QwError, Result};
pub use state::AmplitudeSpace;
pub use constants::qw_constants::{DEFAULT_COMMENT, DEFAULT_STEPS, NORM_TOLERANCE, ORTHOGONALITY_TOLERANCE};
