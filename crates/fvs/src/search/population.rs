//! Population driver: INITIALIZING → ITERATING → DONE.
//!
//! - Initializing: fill the population with greedy + refined candidates.
//! - One round: refine every member, evict the largest down to half
//!   capacity, refill with fresh candidates, record the new best.
//! - Done: `patience` consecutive rounds without a strictly smaller best,
//!   `max_rounds` rounds, or an empty best (nothing left to improve).
//!
//! Members whose last refinement converged are not re-searched: a pass that
//! found no move is exhaustive, so repeating it cannot improve them.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::greedy::build_greedy;
use super::local_search::LocalSearch;
use super::{Candidate, SolveError, SolverCfg, StopReason};
use crate::graph::{AdjacencyOracle, VertexSet};

#[derive(Clone, Debug)]
struct Member {
    candidate: Candidate,
    converged: bool,
}

/// Bounded collection of candidates kept in ascending score order.
#[derive(Clone, Debug)]
pub(crate) struct Population {
    capacity: usize,
    members: Vec<Member>,
}

impl Population {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Insert keeping score order; equal scores keep arrival order.
    fn push_member(&mut self, member: Member) {
        let score = member.candidate.score();
        let at = self
            .members
            .partition_point(|m| m.candidate.score() <= score);
        self.members.insert(at, member);
    }

    /// Smallest candidate.
    pub fn best(&self) -> Option<&Candidate> {
        self.members.first().map(|m| &m.candidate)
    }

    /// Drop the largest members until at most `keep` remain.
    pub fn evict_to(&mut self, keep: usize) {
        self.members.truncate(keep);
    }

    pub fn scores(&self) -> Vec<usize> {
        self.members.iter().map(|m| m.candidate.score()).collect()
    }

    fn into_best(self) -> Option<Candidate> {
        self.members.into_iter().next().map(|m| m.candidate)
    }
}

/// What a finished run hands back to `solve_with_report`.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub best: Candidate,
    /// Best score after initialization, then after each round.
    pub history: Vec<usize>,
    pub rounds: usize,
    pub stop: StopReason,
    pub anomalies: usize,
}

/// Runs the population search over one oracle.
pub struct PopulationDriver<'a> {
    oracle: &'a AdjacencyOracle,
    cfg: SolverCfg,
    search: LocalSearch<'a>,
    rng: StdRng,
    anomalies: usize,
}

impl<'a> PopulationDriver<'a> {
    pub fn new(oracle: &'a AdjacencyOracle, cfg: SolverCfg) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            oracle,
            cfg,
            search: LocalSearch::new(oracle).with_max_passes(cfg.ls_max_passes),
            rng,
            anomalies: 0,
        }
    }

    /// Sole search entry point; `points` must be non-empty.
    pub fn solve(&mut self, points: &VertexSet) -> Result<Outcome, SolveError> {
        if points.is_empty() {
            return Err(SolveError::EmptyInput);
        }
        let capacity = self.cfg.population.max(1);
        let keep = (capacity / 2).max(1);

        let mut population = Population::new(capacity);
        self.refill(&mut population, points)?;
        let mut best = population.best().map_or(0, Candidate::score);
        let mut history = vec![best];
        tracing::debug!(best, scores = ?population.scores(), "population_seeded");

        let mut stale = 0;
        let mut rounds = 0;
        let stop = loop {
            if best == 0 {
                break StopReason::Optimal;
            }
            if rounds >= self.cfg.max_rounds {
                break StopReason::MaxRounds;
            }
            rounds += 1;

            population = self.refine_all(population, points)?;
            population.evict_to(keep);
            self.refill(&mut population, points)?;

            let round_best = population.best().map_or(0, Candidate::score);
            history.push(round_best);
            if round_best < best {
                best = round_best;
                stale = 0;
            } else {
                stale += 1;
            }
            tracing::debug!(
                round = rounds,
                best = round_best,
                stale,
                scores = ?population.scores(),
                "round_done"
            );
            if stale >= self.cfg.patience {
                break StopReason::Patience;
            }
        };

        let anomalies = self.anomalies;
        let best = population.into_best().unwrap_or_default();
        Ok(Outcome {
            best,
            history,
            rounds,
            stop,
            anomalies,
        })
    }

    /// Greedy construction followed by local search to convergence.
    fn fresh(&mut self, points: &VertexSet) -> Result<Member, SolveError> {
        let built = build_greedy(
            self.oracle,
            points,
            self.cfg.second_choice_prob,
            &mut self.rng,
        );
        if built.exhausted {
            self.anomalies += 1;
        }
        let refined = self.search.improve(&built.candidate, points, &mut self.rng)?;
        Ok(Member {
            candidate: refined.candidate,
            converged: refined.converged,
        })
    }

    fn refill(&mut self, population: &mut Population, points: &VertexSet) -> Result<(), SolveError> {
        while !population.is_full() {
            let member = self.fresh(points)?;
            let optimal = member.candidate.is_empty();
            population.push_member(member);
            if optimal {
                break;
            }
        }
        Ok(())
    }

    fn refine_all(
        &mut self,
        population: Population,
        points: &VertexSet,
    ) -> Result<Population, SolveError> {
        let mut next = Population::new(population.capacity);
        for member in population.members {
            if member.converged {
                next.push_member(member);
                continue;
            }
            let refined = self.search.improve(&member.candidate, points, &mut self.rng)?;
            next.push_member(Member {
                candidate: refined.candidate,
                converged: refined.converged,
            });
        }
        Ok(next)
    }
}
