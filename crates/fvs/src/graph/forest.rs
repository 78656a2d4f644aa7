//! Acyclicity test for induced subgraphs.
//!
//! Iterative DFS over `(parent, vertex)` frames. Vertices are marked when
//! pushed, so reaching an already-marked vertex through any edge other than
//! the tree edge to the parent closes a cycle.
//!
//! Two neighbor sources:
//! - full scan: neighbors recomputed from the `AdjacencyOracle` against the set
//!   (O(|S|) per vertex, O(|S|²) per call);
//! - `NeighborCache`: neighbor lists snapshotted for a base set, with one
//!   vertex attached live on top and one vertex masked out per query.

use super::{AdjacencyOracle, VertexSet, NIL};

/// Reusable scratch for repeated forest checks over one universe.
///
/// Marks are epoch-stamped so a check never clears the whole array.
#[derive(Clone, Debug, Default)]
pub struct ForestChecker {
    mark: Vec<u32>,
    epoch: u32,
    stack: Vec<(usize, usize)>,
}

impl ForestChecker {
    pub fn new(n: usize) -> Self {
        Self {
            mark: vec![0; n],
            epoch: 0,
            stack: Vec::new(),
        }
    }

    /// True iff the subgraph induced by `set` is acyclic. Empty sets are forests.
    pub fn is_forest(&mut self, oracle: &AdjacencyOracle, set: &VertexSet) -> bool {
        self.run(set, NIL, |v| oracle.neighbors_in(v, set))
    }

    /// Same test on `cache.members() \ {removed}`, using the cached lists.
    pub fn is_forest_cached(&mut self, cache: &NeighborCache, removed: Option<usize>) -> bool {
        let skip = removed.unwrap_or(NIL);
        self.run(cache.members(), skip, |v| {
            cache.neighbors(v).iter().copied().filter(move |&u| u != skip)
        })
    }

    fn run<F, I>(&mut self, members: &VertexSet, skip: usize, neighbors: F) -> bool
    where
        F: Fn(usize) -> I,
        I: Iterator<Item = usize>,
    {
        if self.mark.len() < members.universe() {
            self.mark.resize(members.universe(), 0);
        }
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.mark.fill(0);
            self.epoch = 1;
        }
        let epoch = self.epoch;

        for root in members.iter() {
            if root == skip || self.mark[root] == epoch {
                continue;
            }
            self.mark[root] = epoch;
            self.stack.clear();
            self.stack.push((NIL, root));
            while let Some((parent, v)) = self.stack.pop() {
                for u in neighbors(v) {
                    if u == parent {
                        continue;
                    }
                    if self.mark[u] == epoch {
                        self.stack.clear();
                        return false;
                    }
                    self.mark[u] = epoch;
                    self.stack.push((v, u));
                }
            }
        }
        true
    }
}

/// One-shot convenience around `ForestChecker::is_forest`.
pub fn is_forest(oracle: &AdjacencyOracle, set: &VertexSet) -> bool {
    ForestChecker::new(set.universe()).is_forest(oracle, set)
}

/// Neighbor lists of a base set, restricted to its members.
///
/// `attach`/`detach` add or drop a single vertex in O(|members|): its list is
/// computed live from the oracle and it is appended to its neighbors' lists.
/// Every other list is reused as is.
#[derive(Clone, Debug)]
pub struct NeighborCache {
    members: VertexSet,
    lists: Vec<Vec<usize>>,
}

impl NeighborCache {
    pub fn build(oracle: &AdjacencyOracle, set: &VertexSet) -> Self {
        let mut lists = vec![Vec::new(); set.universe()];
        for v in set.iter() {
            lists[v] = oracle.neighbors_in(v, set).collect();
        }
        Self {
            members: set.clone(),
            lists,
        }
    }

    #[inline]
    pub fn members(&self) -> &VertexSet {
        &self.members
    }

    /// Cached neighbors of `v` among the members (empty for non-members).
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.lists[v]
    }

    /// Add `v` to the members; false if already present.
    pub fn attach(&mut self, oracle: &AdjacencyOracle, v: usize) -> bool {
        if self.members.contains(v) {
            return false;
        }
        let mut list = std::mem::take(&mut self.lists[v]);
        list.clear();
        list.extend(oracle.neighbors_in(v, &self.members));
        for &u in &list {
            self.lists[u].push(v);
        }
        self.lists[v] = list;
        self.members.insert(v);
        true
    }

    /// Drop `v` from the members; false if absent.
    pub fn detach(&mut self, v: usize) -> bool {
        if !self.members.remove(v) {
            return false;
        }
        let mut list = std::mem::take(&mut self.lists[v]);
        for &u in &list {
            let row = &mut self.lists[u];
            if let Some(pos) = row.iter().rposition(|&w| w == v) {
                row.swap_remove(pos);
            }
        }
        list.clear();
        self.lists[v] = list;
        true
    }
}
