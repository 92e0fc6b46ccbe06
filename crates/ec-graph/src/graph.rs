use std::collections::BTreeSet;

use ec_core::{Error, Point3f, Result};

/// Undirected edge between two distinct point indices, stored with the
/// smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    a: usize,
    b: usize,
}

impl Edge {
    /// Canonical edge for `{i, j}`; `None` for a self-loop.
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            core::cmp::Ordering::Less => Some(Self { a: i, b: j }),
            core::cmp::Ordering::Greater => Some(Self { a: j, b: i }),
            core::cmp::Ordering::Equal => None,
        }
    }

    pub fn a(self) -> usize {
        self.a
    }

    pub fn b(self) -> usize {
        self.b
    }

    pub fn pair(self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn touches(self, v: usize) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    pub fn other(self, v: usize) -> Option<usize> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Candidate connectivity over one fixed point set.
///
/// Indices are only meaningful against the exact slice the graph was built
/// from. Iteration is ascending by `(a, b)`; that order carries no meaning
/// beyond determinism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeGraph {
    num_points: usize,
    max_dist: Option<f32>,
    edges: BTreeSet<Edge>,
}

impl EdgeGraph {
    pub(crate) fn new(num_points: usize, max_dist: Option<f32>) -> Self {
        Self {
            num_points,
            max_dist,
            edges: BTreeSet::new(),
        }
    }

    pub(crate) fn insert(&mut self, edge: Edge) -> bool {
        debug_assert!(edge.b < self.num_points);
        self.edges.insert(edge)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Size of the point set the graph was built over.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Admission threshold that was applied; `None` when fewer than two
    /// points meant no threshold was computed, `Some(inf)` when gating was
    /// disabled.
    pub fn max_dist(&self) -> Option<f32> {
        self.max_dist
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        Edge::new(i, j).is_some_and(|e| self.edges.contains(&e))
    }

    pub fn degree(&self, v: usize) -> usize {
        self.edges.iter().filter(|e| e.touches(v)).count()
    }

    pub fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0_usize; self.num_points];
        for e in &self.edges {
            deg[e.a] += 1;
            deg[e.b] += 1;
        }
        deg
    }

    pub fn to_pairs(&self) -> Vec<(usize, usize)> {
        self.iter().map(Edge::pair).collect()
    }

    /// Resolves every edge to its endpoint coordinates.
    ///
    /// `points` must be the set the graph was built over; a set of a
    /// different length fails with [`Error::SizeMismatch`].
    pub fn segments(&self, points: &[Point3f]) -> Result<Vec<(Point3f, Point3f)>> {
        if points.len() != self.num_points {
            return Err(Error::SizeMismatch {
                expected: self.num_points,
                actual: points.len(),
            });
        }

        Ok(self.iter().map(|e| (points[e.a], points[e.b])).collect())
    }
}

impl<'a> IntoIterator for &'a EdgeGraph {
    type Item = &'a Edge;
    type IntoIter = std::collections::btree_set::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
