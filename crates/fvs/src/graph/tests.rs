use super::*;
use nalgebra::Point2;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Spanning-forest reference: acyclic iff edges == vertices - components.
fn union_find_is_forest(n: usize, edges: &[(usize, usize)], members: &[usize]) -> bool {
    let inside: Vec<bool> = (0..n).map(|v| members.contains(&v)).collect();
    let mut parent: Vec<usize> = (0..n).collect();
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }
    let mut seen = BTreeSet::new();
    let mut edge_count = 0usize;
    let mut components = members.len();
    for &(a, b) in edges {
        if a == b || !inside[a] || !inside[b] || !seen.insert((a.min(b), a.max(b))) {
            continue;
        }
        edge_count += 1;
        let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
        if ra != rb {
            parent[ra] = rb;
            components -= 1;
        }
    }
    edge_count == members.len() - components
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<usize>)> {
    (1usize..=20).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..40),
            prop::collection::vec(0..n, 0..=n),
        )
    })
}

#[test]
fn full_set_links_in_order() {
    let s = VertexSet::full(5);
    assert_eq!(s.len(), 5);
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(s.first(), Some(0));
    assert!(VertexSet::full(0).is_empty());
}

#[test]
fn insert_remove_keeps_ascending_order() {
    let mut s = VertexSet::new(10);
    for v in [7, 2, 9, 0, 5] {
        assert!(s.insert(v));
    }
    assert!(!s.insert(5));
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 2, 5, 7, 9]);
    assert!(s.remove(0));
    assert!(!s.remove(0));
    assert!(s.remove(7));
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 5, 9]);
    // toggle: re-inserting right after removal relinks in place
    assert!(s.remove(5));
    assert!(s.insert(5));
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 5, 9]);
    // 7's stale link to 5 still brackets it after 8 arrives
    s.insert(8);
    s.insert(7);
    assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 5, 7, 8, 9]);
    for v in [2, 5, 7, 8, 9] {
        assert!(s.remove(v));
    }
    assert!(s.is_empty());
    assert_eq!(s.iter().count(), 0);
    assert_eq!(s.first(), None);
    assert_eq!(s.universe(), 10);
}

#[test]
fn clone_is_independent_and_equality_ignores_stale_links() {
    let mut a = VertexSet::full(6);
    a.remove(3);
    let mut b = a.clone();
    b.remove(4);
    assert!(a.contains(4));
    assert!(!b.contains(4));
    b.insert(4);
    assert_eq!(a, b);
    assert_eq!(VertexSet::from_ids(6, [0, 1, 2, 4, 5]), a);
}

#[test]
fn oracle_uses_strict_threshold() {
    let pts = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(0.0, 2.0),
    ];
    let g = AdjacencyOracle::from_points(&pts, 1.5);
    assert!(g.is_edge(0, 1) && g.is_edge(1, 0));
    assert!(!g.is_edge(0, 2));
    assert!(!g.is_edge(0, 0));
    // distance exactly equal to the threshold is not an edge
    let g2 = AdjacencyOracle::from_points(&pts, 1.0);
    assert!(!g2.is_edge(0, 1));
    let all = VertexSet::full(3);
    assert_eq!(g.degree_in(0, &all), 1);
    assert_eq!(g.edge_count_in(&all), 1);
}

#[test]
fn empty_and_small_sets_are_forests() {
    let g = AdjacencyOracle::from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
    assert!(is_forest(&g, &VertexSet::new(3)));
    assert!(is_forest(&g, &VertexSet::from_ids(3, [0, 1])));
    assert!(!is_forest(&g, &VertexSet::full(3)));
}

#[test]
fn disconnected_trees_and_a_later_cycle() {
    // two paths plus a square in the last component
    let edges = [(0, 1), (1, 2), (3, 4), (5, 6), (6, 7), (7, 8), (8, 5)];
    let g = AdjacencyOracle::from_edges(9, &edges);
    let mut checker = ForestChecker::new(9);
    assert!(!checker.is_forest(&g, &VertexSet::full(9)));
    let mut s = VertexSet::full(9);
    s.remove(7);
    assert!(checker.is_forest(&g, &s));
    // scratch reuse gives the same answer twice
    assert!(checker.is_forest(&g, &s));
}

#[test]
fn cache_attach_detach_matches_full_scan() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (4, 5), (5, 2)];
    let g = AdjacencyOracle::from_edges(6, &edges);
    let base = VertexSet::from_ids(6, [0, 1, 2, 4]);
    let mut cache = NeighborCache::build(&g, &base);
    let mut checker = ForestChecker::new(6);
    assert!(checker.is_forest_cached(&cache, None));
    assert!(cache.attach(&g, 3));
    assert!(!cache.attach(&g, 3));
    assert!(!checker.is_forest_cached(&cache, None));
    assert!(checker.is_forest_cached(&cache, Some(0)));
    assert!(checker.is_forest_cached(&cache, Some(2)));
    assert!(cache.attach(&g, 5));
    assert!(!checker.is_forest_cached(&cache, Some(0)));
    assert!(checker.is_forest_cached(&cache, Some(2)));
    assert!(cache.detach(5));
    assert!(cache.detach(3));
    assert!(!cache.detach(3));
    assert_eq!(cache.members(), &base);
    assert_eq!(cache.neighbors(2), &[1, 4]);
}

proptest! {
    #[test]
    fn forest_check_matches_spanning_forest((n, edges, members) in graph_strategy()) {
        let g = AdjacencyOracle::from_edges(n, &edges);
        let set = VertexSet::from_ids(n, members.iter().copied());
        let uniq: Vec<usize> = set.iter().collect();
        let expected = union_find_is_forest(n, &edges, &uniq);
        let mut checker = ForestChecker::new(n);
        let first = checker.is_forest(&g, &set);
        let second = checker.is_forest(&g, &set);
        prop_assert_eq!(first, expected);
        prop_assert_eq!(second, expected);
    }

    #[test]
    fn cached_check_matches_full_scan(
        (n, edges, members) in graph_strategy(),
        extra in 0usize..20,
        removed in 0usize..20,
    ) {
        let g = AdjacencyOracle::from_edges(n, &edges);
        let set = VertexSet::from_ids(n, members.iter().copied());
        let extra = extra % n;
        let removed = removed % n;
        let mut cache = NeighborCache::build(&g, &set);
        cache.attach(&g, extra);
        let mut expected_set = set.clone();
        expected_set.insert(extra);
        expected_set.remove(removed);
        let mut checker = ForestChecker::new(n);
        let cached = checker.is_forest_cached(&cache, Some(removed));
        let full = checker.is_forest(&g, &expected_set);
        prop_assert_eq!(cached, full);
    }

    #[test]
    fn vertex_set_tracks_btreeset(ops in prop::collection::vec((any::<bool>(), 0usize..32), 0..200)) {
        let mut s = VertexSet::new(32);
        let mut reference = BTreeSet::new();
        for (add, v) in ops {
            if add {
                prop_assert_eq!(s.insert(v), reference.insert(v));
            } else {
                prop_assert_eq!(s.remove(v), reference.remove(&v));
            }
            prop_assert_eq!(s.len(), reference.len());
        }
        prop_assert_eq!(s.iter().collect::<Vec<_>>(), reference.into_iter().collect::<Vec<_>>());
    }
}
