//! Graph primitives over a fixed universe of vertex ids `0..n`.
//!
//! Purpose
//! - `VertexSet`: dynamic subset with O(1) membership and ordered iteration.
//! - `AdjacencyOracle`: the proximity relation, computed once from coordinates.
//! - `ForestChecker`: acyclicity of an induced subgraph, full or against a
//!   `NeighborCache` snapshot with one vertex masked out.
//!
//! Layout
//! - `vertex_set.rs` (arena-backed ordered set), `adjacency.rs` (edge matrix),
//!   `forest.rs` (iterative DFS and the neighbor snapshot).

mod adjacency;
mod forest;
mod vertex_set;

pub use adjacency::AdjacencyOracle;
pub use forest::{is_forest, ForestChecker, NeighborCache};
pub use vertex_set::VertexSet;

/// Sentinel index for "no vertex" in links and DFS frames.
pub(crate) const NIL: usize = usize::MAX;

#[cfg(test)]
mod tests;
