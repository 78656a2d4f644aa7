//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a stable public API. It is a convenience surface for the CLI,
//!   benches, and experiments. Breaking changes are allowed and expected.

// Graph primitives
pub use crate::graph::{is_forest, AdjacencyOracle, ForestChecker, NeighborCache, VertexSet};
// Search
pub use crate::search::{
    greedy::{build_greedy, Construction},
    local_search::LocalSearch,
    population::{Outcome, PopulationDriver},
    solve, solve_with_defaults, solve_with_report, Candidate, SolveError, SolveReport, SolverCfg,
    StopReason,
};
// Instances and checks
pub use crate::rand::{generate_points, DegreeCap, GenCfg, GenError, ReplayToken};
pub use crate::validate::{count_cycles_rank, is_valid_fvs};
