//! "Remove 2, add 1" local search with a racing parallel scan.
//!
//! One pass shuffles the candidate and spawns one scoped worker per outer
//! position `i`. Worker `i` scans `j > i` and every non-candidate `r`, asking
//! whether `rest ∪ {c_i, c_j} \ {r}` is a forest. The first worker to certify
//! such a triple publishes the smaller candidate and raises `found`; the
//! others poll `found` and exit.
//!
//! Shared state per pass
//! - read-only: oracle, shuffled order, `rest` ids, the base `NeighborCache`;
//! - `found` (AtomicBool), polled by every worker;
//! - the winning move, written once into a `OnceLock` before `found` is set.
//!
//! `run_workers` joins every handle before the pass result is read; a worker
//! that panicked fails the pass with `SolveError::WorkerFailed`.
//!
//! Each worker clones the base cache and attaches `c_i` then `c_j` on top, so
//! a trial only masks out `r` instead of rebuilding neighbor lists.

use std::iter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Candidate, SolveError};
use crate::graph::{AdjacencyOracle, ForestChecker, NeighborCache, VertexSet};

/// Local search bound to one oracle.
#[derive(Clone, Copy, Debug)]
pub struct LocalSearch<'a> {
    oracle: &'a AdjacencyOracle,
    max_passes: Option<usize>,
    #[cfg(test)]
    fail_worker: Option<usize>,
}

/// Result of driving the search on one candidate.
#[derive(Clone, Debug)]
pub struct Refinement {
    pub candidate: Candidate,
    /// Passes that found an improving move.
    pub improvements: usize,
    /// The last pass found nothing (a local optimum for this neighborhood).
    pub converged: bool,
}

/// Scratch shared by the workers of one pass.
struct Pass<'p> {
    oracle: &'p AdjacencyOracle,
    order: &'p [usize],
    rest: &'p [usize],
    base: &'p NeighborCache,
    found: &'p AtomicBool,
    winner: &'p OnceLock<Candidate>,
}

impl<'a> LocalSearch<'a> {
    pub fn new(oracle: &'a AdjacencyOracle) -> Self {
        Self {
            oracle,
            max_passes: None,
            #[cfg(test)]
            fail_worker: None,
        }
    }

    /// Stop after `passes` improving passes even if more moves exist.
    pub fn with_max_passes(mut self, passes: Option<usize>) -> Self {
        self.max_passes = passes;
        self
    }

    /// Repeat `remove2add1` until a pass finds nothing (or the pass cap).
    ///
    /// Never returns a larger candidate; the complement stays a forest
    /// whenever the input's was.
    pub fn improve<R: Rng + ?Sized>(
        &self,
        candidate: &Candidate,
        points: &VertexSet,
        rng: &mut R,
    ) -> Result<Refinement, SolveError> {
        let mut current = candidate.clone();
        let mut improvements = 0;
        loop {
            if self.max_passes.is_some_and(|cap| improvements >= cap) {
                return Ok(Refinement {
                    candidate: current,
                    improvements,
                    converged: false,
                });
            }
            match self.remove2add1(&current, points, rng)? {
                Some(next) => {
                    tracing::debug!(from = current.score(), to = next.score(), "ls_improved");
                    current = next;
                    improvements += 1;
                }
                None => {
                    return Ok(Refinement {
                        candidate: current,
                        improvements,
                        converged: true,
                    })
                }
            }
        }
    }

    /// One exhaustive pass. `Some` holds a candidate one vertex smaller.
    pub fn remove2add1<R: Rng + ?Sized>(
        &self,
        candidate: &Candidate,
        points: &VertexSet,
        rng: &mut R,
    ) -> Result<Option<Candidate>, SolveError> {
        let mut order = candidate.vertices().to_vec();
        order.shuffle(rng);
        let rest_set = candidate.complement(points);
        let rest: Vec<usize> = rest_set.iter().collect();
        if order.len() < 2 || rest.is_empty() {
            return Ok(None);
        }

        let base = NeighborCache::build(self.oracle, &rest_set);
        let found = AtomicBool::new(false);
        let winner = OnceLock::new();
        let pass = Pass {
            oracle: self.oracle,
            order: &order,
            rest: &rest,
            base: &base,
            found: &found,
            winner: &winner,
        };

        run_workers(order.len(), |i| {
            self.inject_fault(i);
            pass.scan(i);
        })?;
        Ok(winner.into_inner())
    }

    #[cfg(test)]
    fn failing_worker(mut self, i: usize) -> Self {
        self.fail_worker = Some(i);
        self
    }

    #[cfg(test)]
    fn inject_fault(&self, i: usize) {
        if self.fail_worker == Some(i) {
            panic!("worker {i} failed");
        }
    }

    #[cfg(not(test))]
    #[inline(always)]
    fn inject_fault(&self, _i: usize) {}
}

/// Run `work(i)` for every `i < workers` on scoped threads and join them all.
fn run_workers<F>(workers: usize, work: F) -> Result<(), SolveError>
where
    F: Fn(usize) + Sync,
{
    let panicked = std::thread::scope(|scope| {
        let work = &work;
        let handles: Vec<_> = (0..workers)
            .map(|i| scope.spawn(move || work(i)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count()
    });
    if panicked > 0 {
        return Err(SolveError::worker(format!(
            "{panicked} of {workers} workers panicked"
        )));
    }
    Ok(())
}

impl Pass<'_> {
    fn scan(&self, i: usize) {
        if i + 1 >= self.order.len() {
            return;
        }
        let mut cache = self.base.clone();
        let mut checker = ForestChecker::new(cache.members().universe());
        cache.attach(self.oracle, self.order[i]);
        for j in (i + 1)..self.order.len() {
            if self.found.load(Ordering::Acquire) {
                return;
            }
            let q = self.order[j];
            cache.attach(self.oracle, q);
            for &r in self.rest {
                if self.found.load(Ordering::Relaxed) {
                    return;
                }
                if checker.is_forest_cached(&cache, Some(r)) {
                    self.publish(i, j, r);
                    return;
                }
            }
            cache.detach(q);
        }
    }

    /// Only the first certified move is kept; it is stored before `found`
    /// is raised.
    fn publish(&self, i: usize, j: usize, r: usize) {
        let next: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != i && k != j)
            .map(|(_, &v)| v)
            .chain(iter::once(r))
            .collect();
        if self.winner.set(Candidate::new(next)).is_ok() {
            self.found.store(true, Ordering::Release);
        }
    }
}
