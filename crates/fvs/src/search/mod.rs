//! Heuristic FVS search: greedy construction, "remove 2, add 1" local search,
//! and a bounded population driver.
//!
//! Flow
//! - `solve*` validates input, collapses duplicate points, builds the
//!   `AdjacencyOracle` once, and hands the universe to `PopulationDriver`.
//! - The driver seeds `SolverCfg::population` candidates via `greedy` +
//!   `local_search`, then runs rounds (refine, evict to half, refill) until
//!   `patience` non-improving rounds or `max_rounds`.
//!
//! Non-determinism
//! - Construction is randomized and the local search accepts whichever worker
//!   certifies a move first. Only feasibility is guaranteed, not the exact
//!   output; `SolverCfg::seed` pins the sequential randomness only.

pub mod greedy;
pub mod local_search;
pub mod population;

use std::collections::HashSet;
use std::fmt;

use nalgebra::Point2;

use crate::graph::{AdjacencyOracle, VertexSet};
use population::PopulationDriver;

/// Solver tunables. `Default` mirrors the reference run settings.
#[derive(Clone, Copy, Debug)]
pub struct SolverCfg {
    /// Population capacity; each round keeps half and refills to this size.
    pub population: usize,
    /// Stop after this many consecutive rounds without a strictly better best.
    pub patience: usize,
    /// Hard cap on rounds after initialization.
    pub max_rounds: usize,
    /// Cap on local-search passes per refinement; `None` runs to convergence.
    pub ls_max_passes: Option<usize>,
    /// Probability of taking the second-highest degree vertex in construction.
    pub second_choice_prob: f64,
    /// Seed for construction and shuffling; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverCfg {
    fn default() -> Self {
        Self {
            population: 10,
            patience: 4,
            max_rounds: 2024,
            ls_max_passes: None,
            second_choice_prob: 0.1,
            seed: None,
        }
    }
}

/// Errors that abort a solve. Construction anomalies are not errors.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveError {
    /// The point set was empty.
    EmptyInput,
    /// Threshold is NaN or negative.
    InvalidThreshold { threshold: f64 },
    /// A local-search worker panicked or did not report completion.
    WorkerFailed { reason: String },
}

impl SolveError {
    pub(crate) fn worker(reason: impl Into<String>) -> Self {
        Self::WorkerFailed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input point set is empty"),
            Self::InvalidThreshold { threshold } => {
                write!(f, "invalid distance threshold: {threshold}")
            }
            Self::WorkerFailed { reason } => write!(f, "local search failed: {reason}"),
        }
    }
}

impl std::error::Error for SolveError {}

/// One proposed FVS as distinct vertex ids; score is its length.
///
/// Value object: search steps produce new candidates instead of editing one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
    vertices: Vec<usize>,
}

impl Candidate {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self { vertices }
    }

    /// Smaller is better.
    #[inline]
    pub fn score(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.vertices
    }

    /// `points \ self`: the part that must stay a forest.
    pub fn complement(&self, points: &VertexSet) -> VertexSet {
        let mut rest = points.clone();
        for &v in &self.vertices {
            rest.remove(v);
        }
        rest
    }
}

/// Why the driver stopped iterating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Patience,
    MaxRounds,
    /// The best candidate is empty; no smaller one exists.
    Optimal,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patience => write!(f, "patience"),
            Self::MaxRounds => write!(f, "max_rounds"),
            Self::Optimal => write!(f, "optimal"),
        }
    }
}

/// Full result of a solve.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// The FVS, as points.
    pub fvs: Vec<Point2<f64>>,
    /// Positions of `fvs` in the caller's input slice (first occurrence).
    pub indices: Vec<usize>,
    /// Best score after initialization, then after each round.
    pub history: Vec<usize>,
    pub rounds: usize,
    pub stop: StopReason,
    /// Constructions that ran out of vertices before reaching a forest.
    pub anomalies: usize,
}

/// Approximate minimum FVS of the proximity graph `|p - q| < threshold`.
pub fn solve(
    points: &[Point2<f64>],
    threshold: f64,
    cfg: SolverCfg,
) -> Result<Vec<Point2<f64>>, SolveError> {
    solve_with_report(points, threshold, cfg).map(|r| r.fvs)
}

/// Convenience: `solve` with `SolverCfg::default()`.
pub fn solve_with_defaults(
    points: &[Point2<f64>],
    threshold: f64,
) -> Result<Vec<Point2<f64>>, SolveError> {
    solve(points, threshold, SolverCfg::default())
}

/// Solve and keep the run bookkeeping (history, rounds, stop reason).
pub fn solve_with_report(
    points: &[Point2<f64>],
    threshold: f64,
    cfg: SolverCfg,
) -> Result<SolveReport, SolveError> {
    if points.is_empty() {
        return Err(SolveError::EmptyInput);
    }
    if threshold.is_nan() || threshold < 0.0 {
        return Err(SolveError::InvalidThreshold { threshold });
    }
    let (unique, origin) = dedup_points(points);
    let oracle = AdjacencyOracle::from_points(&unique, threshold);
    let universe = VertexSet::full(unique.len());
    tracing::info!(
        points = unique.len(),
        duplicates = points.len() - unique.len(),
        edges = oracle.edge_count_in(&universe),
        threshold,
        "solve_start"
    );

    let outcome = PopulationDriver::new(&oracle, cfg).solve(&universe)?;
    tracing::info!(
        size = outcome.best.score(),
        rounds = outcome.rounds,
        stop = %outcome.stop,
        anomalies = outcome.anomalies,
        "solve_done"
    );

    let ids = outcome.best.into_vec();
    Ok(SolveReport {
        fvs: ids.iter().map(|&v| unique[v]).collect(),
        indices: ids.iter().map(|&v| origin[v]).collect(),
        history: outcome.history,
        rounds: outcome.rounds,
        stop: outcome.stop,
        anomalies: outcome.anomalies,
    })
}

/// Collapse exact duplicates; returns the unique points and, per unique
/// point, the index of its first occurrence in the input.
fn dedup_points(points: &[Point2<f64>]) -> (Vec<Point2<f64>>, Vec<usize>) {
    let mut seen = HashSet::with_capacity(points.len());
    let mut unique = Vec::with_capacity(points.len());
    let mut origin = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        // +0.0 folds -0.0 into 0.0 so both hash alike.
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if seen.insert(key) {
            unique.push(*p);
            origin.push(i);
        }
    }
    (unique, origin)
}
