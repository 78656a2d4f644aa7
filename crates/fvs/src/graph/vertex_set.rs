//! Ordered vertex subset backed by fixed arrays.
//!
//! Members are threaded through `next`/`prev` arrays indexed by id, in
//! ascending id order, with `head` as the first member. Removal keeps the
//! removed vertex's stale links; re-inserting it right after (the toggle
//! pattern of the local search) can relink in O(1) when those links still
//! bracket the vertex.

use super::NIL;

#[derive(Clone, Debug)]
pub struct VertexSet {
    present: Vec<bool>,
    next: Vec<usize>,
    prev: Vec<usize>,
    head: usize,
    len: usize,
}

impl VertexSet {
    /// Empty subset of the universe `0..n`.
    pub fn new(n: usize) -> Self {
        Self {
            present: vec![false; n],
            next: vec![NIL; n],
            prev: vec![NIL; n],
            head: NIL,
            len: 0,
        }
    }

    /// The whole universe `0..n`, linked in O(n).
    pub fn full(n: usize) -> Self {
        let next = (0..n).map(|v| if v + 1 < n { v + 1 } else { NIL }).collect();
        let prev = (0..n).map(|v| if v == 0 { NIL } else { v - 1 }).collect();
        Self {
            present: vec![true; n],
            next,
            prev,
            head: if n == 0 { NIL } else { 0 },
            len: n,
        }
    }

    /// Subset of `0..n` holding `ids`. Out-of-range ids panic.
    pub fn from_ids<I: IntoIterator<Item = usize>>(n: usize, ids: I) -> Self {
        let mut set = Self::new(n);
        for v in ids {
            set.insert(v);
        }
        set
    }

    /// Size of the universe, not of the subset.
    #[inline]
    pub fn universe(&self) -> usize {
        self.present.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.present.get(v).copied().unwrap_or(false)
    }

    /// Smallest member, if any.
    #[inline]
    pub fn first(&self) -> Option<usize> {
        (self.head != NIL).then_some(self.head)
    }

    /// Insert `v`; returns false if it was already present.
    pub fn insert(&mut self, v: usize) -> bool {
        if self.present[v] {
            return false;
        }
        let pred = self.predecessor_of(v);
        let succ = if pred == NIL { self.head } else { self.next[pred] };
        self.prev[v] = pred;
        self.next[v] = succ;
        if pred == NIL {
            self.head = v;
        } else {
            self.next[pred] = v;
        }
        if succ != NIL {
            self.prev[succ] = v;
        }
        self.present[v] = true;
        self.len += 1;
        true
    }

    /// Remove `v`; returns false if it was absent. Leaves `v`'s own links stale.
    pub fn remove(&mut self, v: usize) -> bool {
        if !self.contains(v) {
            return false;
        }
        let (p, n) = (self.prev[v], self.next[v]);
        if p == NIL {
            self.head = n;
        } else {
            self.next[p] = n;
        }
        if n != NIL {
            self.prev[n] = p;
        }
        self.present[v] = false;
        self.len -= 1;
        true
    }

    /// Members in ascending id order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            set: self,
            cur: self.head,
            remaining: self.len,
        }
    }

    /// Largest member below `v`, or `NIL`.
    fn predecessor_of(&self, v: usize) -> usize {
        // Stale link from an earlier removal: valid iff it still brackets `v`.
        let hint = self.prev[v];
        if hint == NIL {
            if self.head == NIL || self.head > v {
                return NIL;
            }
        } else if hint < v && self.present[hint] {
            let after = self.next[hint];
            if after == NIL || after > v {
                return hint;
            }
        }
        (0..v).rev().find(|&u| self.present[u]).unwrap_or(NIL)
    }
}

// Links of absent vertices are stale, so equality looks at membership only.
impl PartialEq for VertexSet {
    fn eq(&self, other: &Self) -> bool {
        self.present == other.present
    }
}

impl Eq for VertexSet {}

impl<'a> IntoIterator for &'a VertexSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over a `VertexSet`.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    set: &'a VertexSet,
    cur: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.cur == NIL {
            return None;
        }
        let v = self.cur;
        self.cur = self.set.next[v];
        self.remaining -= 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
