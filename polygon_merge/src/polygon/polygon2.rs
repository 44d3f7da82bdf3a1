use crate::core::math::{Box2, Point2};
use crate::core::traits::MergeNum;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed polygon ring stored as an ordered vertex sequence without a repeated closing
/// vertex (the closing edge from the last vertex back to the first is implied).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Polygon2<T = f64> {
    /// Contiguous ring vertexes.
    pub points: Vec<Point2<T>>,
}

/// Boundary polyline, the raw output form of the boolean kernel where a repeated
/// vertex encodes a hole pinch.
pub type Polyline2<T> = Vec<Point2<T>>;

impl<T> Polygon2<T>
where
    T: MergeNum,
{
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn from_points(points: Vec<Point2<T>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn push(&mut self, p: Point2<T>) {
        self.points.push(p);
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point2<T>> {
        self.points.iter()
    }

    /// Signed area of the ring widened to `f64`, positive for counter clockwise
    /// winding.
    ///
    /// # Examples
    ///
    /// ```
    /// # use polygon_merge::polygon;
    /// let square = polygon![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
    /// assert_eq!(square.area(), 100.0);
    /// ```
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[(i + 1) % self.points.len()];
            sum += a.x.to_f64() * b.y.to_f64() - b.x.to_f64() * a.y.to_f64();
        }
        sum / 2.0
    }

    /// True when the ring winds counter clockwise.
    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.area() > 0.0
    }

    /// Reverse the winding direction in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Axis aligned extents of the ring, empty for an empty ring.
    pub fn extents(&self) -> Box2<T> {
        let mut bbox = Box2::empty();
        for p in &self.points {
            bbox.union_point(*p);
        }
        bbox
    }
}

impl<T> Index<usize> for Polygon2<T> {
    type Output = Point2<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<T> IndexMut<usize> for Polygon2<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl<T> From<Box2<T>> for Polygon2<T>
where
    T: MergeNum,
{
    /// Counter clockwise rectangle ring covering the box.
    fn from(b: Box2<T>) -> Self {
        Self {
            points: vec![
                b.min,
                Point2::new(b.max.x, b.min.y),
                b.max,
                Point2::new(b.min.x, b.max.y),
            ],
        }
    }
}

/// Polygon with holes: an outline ring plus zero or more interior hole rings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PolygonWithHoles2<T = f64> {
    pub outline: Polygon2<T>,
    pub holes: Vec<Polygon2<T>>,
}

impl<T> From<Polygon2<T>> for PolygonWithHoles2<T>
where
    T: MergeNum,
{
    fn from(outline: Polygon2<T>) -> Self {
        Self {
            outline,
            holes: Vec::new(),
        }
    }
}

impl<T> From<Box2<T>> for PolygonWithHoles2<T>
where
    T: MergeNum,
{
    fn from(b: Box2<T>) -> Self {
        Self {
            outline: b.into(),
            holes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_follows_winding() {
        let ccw = polygon![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)];
        assert!(ccw.is_ccw());
        assert_fuzzy_eq!(ccw.area(), 12.0);

        let mut cw = ccw.clone();
        cw.reverse();
        assert!(!cw.is_ccw());
        assert_fuzzy_eq!(cw.area(), -12.0);
    }

    #[test]
    fn box_converts_to_ccw_ring() {
        let ring: Polygon2<i64> = Box2::new(0, 0, 10, 5).into();
        assert_eq!(ring.len(), 4);
        assert!(ring.is_ccw());
        assert_eq!(ring.extents(), Box2::new(0, 0, 10, 5));
    }

    #[test]
    fn integer_area_widens() {
        let tri = Polygon2::from_points(vec![
            Point2::new(0_i64, 0),
            Point2::new(10, 0),
            Point2::new(0, 10),
        ]);
        assert_eq!(tri.area(), 50.0);
    }
}
