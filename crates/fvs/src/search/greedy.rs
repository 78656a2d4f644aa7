//! Degree-biased greedy construction.
//!
//! Repeat until the working set is a forest: strip vertices of degree <= 1
//! (they lie on no cycle), rank the rest by degree (random tie order), and
//! move the top vertex into the result, or the runner-up with probability
//! `second_choice_prob`.

use rand::seq::SliceRandom;
use rand::Rng;

use super::Candidate;
use crate::graph::{AdjacencyOracle, ForestChecker, VertexSet};

/// Result of one construction.
#[derive(Clone, Debug)]
pub struct Construction {
    pub candidate: Candidate,
    /// The working set emptied before it was recognized as a forest. The
    /// candidate is then partial and may be infeasible.
    pub exhausted: bool,
}

/// Build one FVS candidate for the subgraph induced by `points`.
pub fn build_greedy<R: Rng + ?Sized>(
    oracle: &AdjacencyOracle,
    points: &VertexSet,
    second_choice_prob: f64,
    rng: &mut R,
) -> Construction {
    let p_second = if second_choice_prob.is_finite() {
        second_choice_prob.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut work = points.clone();
    let mut checker = ForestChecker::new(work.universe());
    let mut degree = vec![0usize; work.universe()];
    let mut ranked = Vec::with_capacity(work.len());
    let mut picked = Vec::new();

    while !checker.is_forest(oracle, &work) {
        for v in work.iter() {
            degree[v] = oracle.degree_in(v, &work);
        }
        strip_leaves(oracle, &mut work, &mut degree);
        // Guard only: a non-forest keeps a non-empty 2-core after stripping,
        // so this does not fire while the loop condition holds.
        if work.is_empty() {
            tracing::warn!(
                picked = picked.len(),
                "points exhausted before the remainder became a forest"
            );
            return Construction {
                candidate: Candidate::new(picked),
                exhausted: true,
            };
        }

        ranked.clear();
        ranked.extend(work.iter());
        ranked.shuffle(rng);
        // stable: the shuffle decides ties
        ranked.sort_by(|a, b| degree[*b].cmp(&degree[*a]));
        let chosen = if ranked.len() > 1 && rng.gen_bool(p_second) {
            ranked[1]
        } else {
            ranked[0]
        };
        picked.push(chosen);
        work.remove(chosen);
    }

    Construction {
        candidate: Candidate::new(picked),
        exhausted: false,
    }
}

/// Remove vertices of degree <= 1 until none remain, keeping `degree`
/// current for the survivors.
fn strip_leaves(oracle: &AdjacencyOracle, work: &mut VertexSet, degree: &mut [usize]) {
    let mut queue: Vec<usize> = work.iter().filter(|&v| degree[v] <= 1).collect();
    while let Some(v) = queue.pop() {
        if !work.remove(v) {
            continue;
        }
        for u in oracle.neighbors_in(v, work) {
            degree[u] -= 1;
            if degree[u] == 1 {
                queue.push(u);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::is_forest;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn strip_leaves_keeps_only_the_two_core() {
        // triangle 0-1-2 with a tail 2-3-4 and an isolated 5
        let g = AdjacencyOracle::from_edges(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let mut work = VertexSet::full(6);
        let mut degree: Vec<usize> = (0..6).map(|v| g.degree_in(v, &work)).collect();
        strip_leaves(&g, &mut work, &mut degree);
        assert_eq!(work.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(degree[2], 2);
    }

    #[test]
    fn forest_input_needs_no_picks() {
        let g = AdjacencyOracle::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let mut rng = StdRng::seed_from_u64(1);
        let c = build_greedy(&g, &VertexSet::full(4), 0.1, &mut rng);
        assert!(c.candidate.is_empty());
        assert!(!c.exhausted);
    }

    #[test]
    fn hub_is_taken_first_without_diversification() {
        // wheel: hub 0 joined to a 5-cycle 1..=5
        let mut edges = vec![(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)];
        edges.extend((1..=5).map(|v| (0, v)));
        let g = AdjacencyOracle::from_edges(6, &edges);
        let all = VertexSet::full(6);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let c = build_greedy(&g, &all, 0.0, &mut rng);
            assert_eq!(c.candidate.vertices()[0], 0);
            assert_eq!(c.candidate.score(), 2);
            assert!(is_forest(&g, &c.candidate.complement(&all)));
        }
    }

    #[test]
    fn respects_the_given_subset() {
        let g = AdjacencyOracle::from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]);
        let subset = VertexSet::from_ids(5, [0, 1, 2]);
        let mut rng = StdRng::seed_from_u64(3);
        let c = build_greedy(&g, &subset, 0.5, &mut rng);
        assert_eq!(c.candidate.score(), 1);
        assert!(subset.contains(c.candidate.vertices()[0]));
    }
}
