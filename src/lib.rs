// src/lib.rs

//! `qwalk` - discrete-time coined quantum walks on graphs
//!
//! A walker lives on the arcs of an undirected graph: amplitude `(i, j)`
//! belongs to vertex `i`, pointing towards neighbour `j`. Every time step
//! applies a coin at each vertex (the Grover diffusion coin, or `−I` at the
//! marked vertex of a search) and then the flip-flop shift that moves
//! amplitude across each edge. The per-vertex measurement probabilities of
//! every step are collected in a [`ProbabilityTable`], which can be written
//! as a raw grid or as a QWML document.

pub mod core;
pub mod graph;
pub mod operations;
pub mod params;
pub mod simulation;
pub mod validation;
pub mod io;

// Re-export the most common types for easier top-level use
pub use crate::core::{QwError, Result, AmplitudeSpace, DEFAULT_COMMENT, DEFAULT_STEPS};
pub use graph::{generators, Graph, CoinLayout, compute_degrees, incident_neighbors};
pub use operations::{CoinKind, CoinMatrix, grover_coin, negative_identity_coin};
pub use params::{WalkParameters, WalkParametersBuilder, WalkProcedure};
pub use simulation::{quantum_search, quantum_walk, ProbabilityTable, Walker};
pub use validation::{
    check_coin_orthogonal,
    check_normalization,
    check_probability_conservation,
    validate_table,
};

// Example 1: Walk on a 4-cycle
// The two halves of the walker leave vertex 0 in opposite directions and
// meet again at the antipodal vertex after two steps.
/// ```
/// use approx::assert_relative_eq;
/// use qwalk::{generators, quantum_walk, QwError};
///
/// let graph = generators::cycle(4);
/// let table = quantum_walk(&graph, 0, 3)?;
///
/// assert_eq!(table.steps(), 3);
/// // Two arcs of 1/√2 each: the sum is 1 up to rounding.
/// assert_relative_eq!(table.probability_at(0, 0).unwrap_or(0.0), 1.0, epsilon = 1e-12);
/// assert_relative_eq!(table.probability_at(1, 1).unwrap_or(0.0), 0.5, epsilon = 1e-12);
/// assert_relative_eq!(table.probability_at(2, 2).unwrap_or(0.0), 1.0, epsilon = 1e-12);
/// # Ok::<(), QwError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Search on the complete graph K8
// After two steps the marked vertex holds (17/7)^2 / 8 of the probability.
/// ```
/// use qwalk::{generators, WalkParametersBuilder, Walker, QwError};
///
/// let graph = generators::complete(8);
/// let params = WalkParametersBuilder::new().marked(5).steps(3).build()?;
/// let table = Walker::new().run(&graph, &params)?;
///
/// assert!((table.probability_at(5, 0).unwrap_or(0.0) - 0.125).abs() < 1e-12);
/// let amplified = table.probability_at(5, 2).unwrap_or(0.0);
/// assert!((amplified - 289.0 / 392.0).abs() < 1e-9, "got {}", amplified);
/// # Ok::<(), QwError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 3: Rejected configurations
/// ```
/// use qwalk::{generators, Graph, WalkParametersBuilder, Walker, QwError};
///
/// // Start and marked vertex together are a conflict.
/// let conflict = WalkParametersBuilder::new().start(0).marked(1).build();
/// assert!(matches!(conflict, Err(QwError::ConfigurationConflict { .. })));
///
/// // An isolated start vertex has no edge to carry amplitude.
/// let mut graph = generators::path(3);
/// graph.remove_edge(1, 2);
/// let params = WalkParametersBuilder::new().start(2).build()?;
/// let err = Walker::new().run(&graph, &params).unwrap_err();
/// assert!(matches!(err, QwError::InvalidVertex { vertex: 2, .. }));
/// # Ok::<(), QwError>(())
/// ```
#[doc(hidden)]
const _: () = ();
