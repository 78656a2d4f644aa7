//! Independent feasibility check for FVS results.
//!
//! Shares no code with the solver's DFS: distances are recomputed from
//! coordinates and acyclicity is decided by union-find rank counting
//! (a graph is a forest iff it has `|V| - components` edges).

use nalgebra::Point2;

/// True iff every point of `fvs` is in `points` and the proximity graph on
/// `points \ fvs` (edges at distance `< threshold`) is a forest.
///
/// Points are matched by exact coordinates; duplicates in `points` count once.
pub fn is_valid_fvs(points: &[Point2<f64>], fvs: &[Point2<f64>], threshold: f64) -> bool {
    if fvs.iter().any(|f| !points.contains(f)) {
        return false;
    }
    let mut rest: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if !fvs.contains(p) && !rest.contains(p) {
            rest.push(*p);
        }
    }
    count_cycles_rank(&rest, threshold) == 0
}

/// Cyclomatic number `|E| - |V| + components` of the proximity graph.
pub fn count_cycles_rank(points: &[Point2<f64>], threshold: f64) -> usize {
    let n = points.len();
    let mut uf = UnionFind::new(n);
    let mut edges = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            if nalgebra::distance(&points[i], &points[j]) < threshold {
                edges += 1;
                uf.union(i, j);
            }
        }
    }
    edges + uf.components - n
}

struct UnionFind {
    parent: Vec<usize>,
    components: usize,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            components: n,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
            self.components -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn square_cycle_needs_one_vertex() {
        let pts = square();
        assert_eq!(count_cycles_rank(&pts, 1.1), 1);
        assert!(!is_valid_fvs(&pts, &[], 1.1));
        assert!(is_valid_fvs(&pts, &[pts[2]], 1.1));
        // diagonals join at 1.5: K4 has rank 3
        assert_eq!(count_cycles_rank(&pts, 1.5), 3);
        assert!(!is_valid_fvs(&pts, &[pts[2]], 1.5));
        assert!(is_valid_fvs(&pts, &[pts[0], pts[2]], 1.5));
    }

    #[test]
    fn foreign_points_are_rejected() {
        let pts = square();
        assert!(!is_valid_fvs(&pts, &[Point2::new(5.0, 5.0)], 1.1));
    }

    #[test]
    fn empty_and_sparse_inputs_are_forests() {
        assert!(is_valid_fvs(&[], &[], 10.0));
        assert!(is_valid_fvs(&square(), &[], 0.0));
    }
}
