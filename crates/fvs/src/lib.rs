//! Approximate minimum Feedback Vertex Sets on planar proximity graphs.
//!
//! Two points are adjacent iff their Euclidean distance is below a threshold.
//! The solver removes as few vertices as it can so the rest is a forest:
//! degree-biased greedy construction, a threaded "remove 2, add 1" local
//! search, and a small population driver that keeps the best candidates
//! across rounds.
//!
//! Layout
//! - `graph`: vertex sets, the edge oracle, and the acyclicity test.
//! - `search`: construction, local search, and the population driver.
//! - `validate`: an independent feasibility check for callers and tests.
//! - `rand`: reproducible synthetic instances.

pub mod api;
pub mod graph;
pub mod rand;
pub mod search;
pub mod validate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Point2;
pub use search::{solve, solve_with_defaults, solve_with_report, SolveError, SolverCfg};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::graph::{AdjacencyOracle, ForestChecker, NeighborCache, VertexSet};
    pub use crate::rand::{generate_points, GenCfg, ReplayToken};
    pub use crate::search::{
        solve, solve_with_defaults, solve_with_report, Candidate, SolveError, SolveReport,
        SolverCfg, StopReason,
    };
    pub use crate::validate::is_valid_fvs;
    pub use nalgebra::Point2;
}
