//! Duplicate point detection keyed by the coordinate kind.
//!
//! Boundary reconstruction looks points up by exact position. Integer coordinates hash
//! bit exact; floating point coordinates cannot soundly hash, so they go through a
//! nearest neighbor index instead.
use crate::core::math::Point2;
use crate::core::traits::MergeNum;
use rstar::primitives::GeomWithData;
use rstar::{RTree, RTreeNum};
use std::collections::HashMap;
use std::hash::Hash;

/// Point to index lookup used by boundary reconstruction.
///
/// Inserting a point that is already present replaces the recorded index, so a lookup
/// always answers with the most recent position of a vertex.
pub trait PointIndexMap<T>: Default
where
    T: MergeNum,
{
    fn clear(&mut self);

    /// True iff a point exactly equal to `p` is stored.
    fn contains(&self, p: Point2<T>) -> bool;

    fn insert(&mut self, p: Point2<T>, index: usize);

    /// Index recorded for `p`. The point must be present.
    fn index_of(&self, p: Point2<T>) -> usize;
}

/// Exact hash index for integer coordinates.
#[derive(Debug, Default)]
pub struct HashPointIndex<T>
where
    T: MergeNum + Eq + Hash,
{
    map: HashMap<Point2<T>, usize>,
}

impl<T> PointIndexMap<T> for HashPointIndex<T>
where
    T: MergeNum + Eq + Hash,
{
    #[inline]
    fn clear(&mut self) {
        self.map.clear();
    }

    #[inline]
    fn contains(&self, p: Point2<T>) -> bool {
        self.map.contains_key(&p)
    }

    #[inline]
    fn insert(&mut self, p: Point2<T>, index: usize) {
        self.map.insert(p, index);
    }

    #[inline]
    fn index_of(&self, p: Point2<T>) -> usize {
        self.map[&p]
    }
}

type IndexedPoint<T> = GeomWithData<[T; 2], usize>;

/// Nearest neighbor index for floating point coordinates.
pub struct NearestPointIndex<T>
where
    T: MergeNum + RTreeNum,
{
    tree: RTree<IndexedPoint<T>>,
}

impl<T> Default for NearestPointIndex<T>
where
    T: MergeNum + RTreeNum,
{
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<T> PointIndexMap<T> for NearestPointIndex<T>
where
    T: MergeNum + RTreeNum,
{
    fn clear(&mut self) {
        self.tree = RTree::new();
    }

    fn contains(&self, p: Point2<T>) -> bool {
        self.tree.locate_at_point(&[p.x, p.y]).is_some()
    }

    fn insert(&mut self, p: Point2<T>, index: usize) {
        self.tree.remove_at_point(&[p.x, p.y]);
        self.tree.insert(IndexedPoint::new([p.x, p.y], index));
    }

    fn index_of(&self, p: Point2<T>) -> usize {
        let nearest = self
            .tree
            .nearest_neighbor(&[p.x, p.y])
            .expect("point index queried while empty");
        // lookups only happen for points known to be stored
        assert!(
            *nearest.geom() == [p.x, p.y],
            "nearest stored point does not equal the queried point"
        );
        nearest.data
    }
}

/// Coordinate types with a point index strategy, selected at compile time.
pub trait PointIndexed: MergeNum {
    type Map: PointIndexMap<Self>;
}

impl PointIndexed for i32 {
    type Map = HashPointIndex<i32>;
}

impl PointIndexed for i64 {
    type Map = HashPointIndex<i64>;
}

impl PointIndexed for f32 {
    type Map = NearestPointIndex<f32>;
}

impl PointIndexed for f64 {
    type Map = NearestPointIndex<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_index_is_exact() {
        let mut map = <i64 as PointIndexed>::Map::default();
        map.insert(Point2::new(3, 4), 7);
        assert!(map.contains(Point2::new(3, 4)));
        assert!(!map.contains(Point2::new(3, 5)));
        assert_eq!(map.index_of(Point2::new(3, 4)), 7);
    }

    #[test]
    fn insert_replaces_recorded_index() {
        let mut map = <i64 as PointIndexed>::Map::default();
        map.insert(Point2::new(1, 1), 2);
        map.insert(Point2::new(1, 1), 9);
        assert_eq!(map.index_of(Point2::new(1, 1)), 9);

        let mut map = <f64 as PointIndexed>::Map::default();
        map.insert(Point2::new(1.0, 1.0), 2);
        map.insert(Point2::new(1.0, 1.0), 9);
        assert_eq!(map.index_of(Point2::new(1.0, 1.0)), 9);
    }

    #[test]
    fn nearest_index_contains_is_exact() {
        let mut map = <f64 as PointIndexed>::Map::default();
        map.insert(Point2::new(0.5, 0.5), 0);
        assert!(map.contains(Point2::new(0.5, 0.5)));
        assert!(!map.contains(Point2::new(0.5, 0.5000001)));
        assert_eq!(map.index_of(Point2::new(0.5, 0.5)), 0);
    }

    #[test]
    #[should_panic(expected = "nearest stored point")]
    fn nearest_index_lookup_requires_exact_match() {
        let mut map = <f64 as PointIndexed>::Map::default();
        map.insert(Point2::new(0.0, 0.0), 0);
        map.index_of(Point2::new(1.0, 1.0));
    }

    #[test]
    fn clear_empties_both_strategies() {
        let mut hash = <i32 as PointIndexed>::Map::default();
        hash.insert(Point2::new(1, 2), 0);
        PointIndexMap::clear(&mut hash);
        assert!(!hash.contains(Point2::new(1, 2)));

        let mut nearest = <f32 as PointIndexed>::Map::default();
        nearest.insert(Point2::new(1.0, 2.0), 0);
        nearest.clear();
        assert!(!nearest.contains(Point2::new(1.0, 2.0)));
    }
}
