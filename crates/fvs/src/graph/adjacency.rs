//! Proximity relation over point ids.

use nalgebra::Point2;

use super::VertexSet;

/// Symmetric `n × n` edge predicate: `edge(p, q) = |p - q| < threshold`.
///
/// Built once per solve from coordinates; immutable afterwards. The diagonal
/// is stored as `false` so callers never see self-loops.
#[derive(Clone, Debug)]
pub struct AdjacencyOracle {
    n: usize,
    bits: Vec<bool>,
}

impl AdjacencyOracle {
    pub fn from_points(points: &[Point2<f64>], threshold: f64) -> Self {
        let n = points.len();
        let mut bits = vec![false; n * n];
        for p in 0..n {
            for q in (p + 1)..n {
                if nalgebra::distance(&points[p], &points[q]) < threshold {
                    bits[p * n + q] = true;
                    bits[q * n + p] = true;
                }
            }
        }
        Self { n, bits }
    }

    /// Build from an explicit edge list over `0..n` (tests, non-geometric callers).
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut bits = vec![false; n * n];
        for &(p, q) in edges {
            if p != q {
                bits[p * n + q] = true;
                bits[q * n + p] = true;
            }
        }
        Self { n, bits }
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn is_edge(&self, p: usize, q: usize) -> bool {
        self.bits[p * self.n + q]
    }

    /// Members of `set` adjacent to `v`, ascending. O(|set|).
    #[inline]
    pub fn neighbors_in<'a>(
        &'a self,
        v: usize,
        set: &'a VertexSet,
    ) -> impl Iterator<Item = usize> + 'a {
        let row = &self.bits[v * self.n..(v + 1) * self.n];
        set.iter().filter(move |&u| row[u])
    }

    #[inline]
    pub fn degree_in(&self, v: usize, set: &VertexSet) -> usize {
        self.neighbors_in(v, set).count()
    }

    /// Number of edges with both endpoints in `set`.
    pub fn edge_count_in(&self, set: &VertexSet) -> usize {
        set.iter()
            .map(|v| self.neighbors_in(v, set).filter(|&u| u > v).count())
            .sum()
    }
}
