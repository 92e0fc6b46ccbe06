use ec_core::Point3f;
use rstar::RTree;
use rstar::primitives::GeomWithData;

/// One result of a nearest-neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Exact Euclidean k-nearest-neighbour queries over an indexed point set.
///
/// Implementations return at most `m` stored points ordered by
/// `(distance, index)` ascending: ties are broken by the smaller stored
/// index. A stored point equal to the query is returned like any other
/// point; callers exclude self-matches by index.
pub trait SpatialIndex: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nearest(&self, query: Point3f, m: usize) -> Vec<Neighbor>;
}

type Entry = GeomWithData<[f32; 3], usize>;

/// R-tree backed index, bulk loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RTreeIndex {
    tree: RTree<Entry>,
    points: Vec<Point3f>,
}

impl RTreeIndex {
    pub fn build(points: &[Point3f]) -> Self {
        let entries: Vec<Entry> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(p.to_array(), i))
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            points: points.to_vec(),
        }
    }
}

impl SpatialIndex for RTreeIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, query: Point3f, m: usize) -> Vec<Neighbor> {
        let m = m.min(self.points.len());
        if m == 0 {
            return Vec::new();
        }

        // Pull candidates until the tree moves strictly past the m-th
        // distance so every point tied with it is seen before sorting.
        let q = query.to_array();
        let mut candidates = Vec::with_capacity(m + 1);
        let mut cutoff = f32::INFINITY;
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&q) {
            if candidates.len() >= m && d2 > cutoff {
                break;
            }
            candidates.push(entry.data);
            if candidates.len() == m {
                cutoff = d2 * (1.0 + 4.0 * f32::EPSILON);
            }
        }

        rank(&self.points, query, candidates, m)
    }
}

/// Brute-force index. Quadratic for all-points queries; useful for small
/// sets and as a reference for other implementations.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    points: Vec<Point3f>,
}

impl LinearIndex {
    pub fn build(points: &[Point3f]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl SpatialIndex for LinearIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, query: Point3f, m: usize) -> Vec<Neighbor> {
        rank(&self.points, query, (0..self.points.len()).collect(), m)
    }
}

fn rank(points: &[Point3f], query: Point3f, candidates: Vec<usize>, m: usize) -> Vec<Neighbor> {
    let mut out: Vec<Neighbor> = candidates
        .into_iter()
        .map(|index| Neighbor {
            index,
            distance: query.distance(points[index]),
        })
        .collect();

    out.sort_unstable_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.index.cmp(&b.index))
    });
    out.truncate(m);
    out
}
