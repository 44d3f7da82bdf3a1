//! Outline and hole extraction from self contacting boundary polylines.
//!
//! The boolean kernel reports each connected region as one closed boundary polyline in
//! which holes are encoded by self contact: a vertex position appears twice iff the
//! boundary pinches around a hole. Extraction walks the polyline over a doubly linked
//! index ring, splicing each pinched loop out as a hole and leaving the outer solid
//! ring behind.
use crate::core::traits::MergeNum;
use crate::polygon::{Polygon2, Polyline2};

use super::point_index::{PointIndexMap, PointIndexed};
use super::prop_polygon::PropPolygon;

/// Rebuild a polygon with holes from a closed boundary polyline with self contact hole
/// encoding.
///
/// Ring orientation is left as traversed; callers normalize the result when they need
/// winding guarantees.
pub fn extract_polygon<P, T>(mut boundary: Polyline2<T>, property: P) -> PropPolygon<P, T>
where
    T: PointIndexed,
{
    if boundary.len() > 1 && boundary.first() == boundary.last() {
        boundary.pop();
    }
    let n = boundary.len();
    debug_assert!(n >= 3, "boundary polyline needs at least 3 distinct vertexes");

    let mut next: Vec<usize> = (1..=n).map(|i| i % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();

    let mut holes: Vec<Polygon2<T>> = Vec::new();
    let mut pt_map = T::Map::default();
    for i in 0..n {
        let p = boundary[i];
        if pt_map.contains(p) {
            // second visit of this position: a pinched loop ends here
            let first = pt_map.index_of(p);
            let follow = next[i];
            next[i] = first;

            let mut ring = Polygon2::new();
            let mut idx = first;
            while first != next[idx] {
                ring.push(boundary[idx]);
                idx = next[idx];
            }
            if accepts_hole(&ring) {
                holes.push(ring);
            }

            // splice the loop out and close the remaining ring through i
            let before = prev[first];
            next[before] = i;
            prev[i] = before;
            next[i] = follow;
        }
        pt_map.insert(p, i);
    }

    let mut solid = Polygon2::with_capacity(n);
    let start = n - 1;
    let mut idx = start;
    while start != next[idx] {
        solid.push(boundary[idx]);
        idx = next[idx];
    }
    solid.push(boundary[idx]);

    PropPolygon {
        property,
        solid,
        holes,
    }
}

/// A pinched loop only counts as a hole when it can enclose area: at least 3 vertexes
/// (keyhole bridges pinch off 2 vertex loops) and a non degenerate extent, wider and
/// taller than one unit for integers, positive area for floats.
fn accepts_hole<T>(ring: &Polygon2<T>) -> bool
where
    T: MergeNum,
{
    if ring.len() < 3 {
        return false;
    }
    let extents = ring.extents();
    if T::INTEGRAL {
        extents.width().gt_tol(T::one()) && extents.height().gt_tol(T::one())
    } else {
        extents.area().gt_tol(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Box2, Point2};

    fn pts<T: MergeNum>(raw: &[(T, T)]) -> Polyline2<T> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn figure_eight_yields_solid_and_hole() {
        // outer square with an inner square keyholed through (0,0)->(5,5)
        let boundary = pts(&[
            (0.0, 0.0),
            (5.0, 5.0),
            (15.0, 5.0),
            (15.0, 15.0),
            (5.0, 15.0),
            (5.0, 5.0),
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 20.0),
            (0.0, 20.0),
            (0.0, 0.0),
        ]);
        let pd = extract_polygon(boundary, 1_u32);
        assert_eq!(pd.holes.len(), 1);
        assert_eq!(pd.solid.len(), 4);
        let solid_area = pd.solid.area().abs();
        let hole_area = pd.holes[0].area().abs();
        assert_fuzzy_eq!(solid_area, 400.0);
        assert_fuzzy_eq!(hole_area, 100.0);
        assert_fuzzy_eq!(solid_area - hole_area, 400.0 - 100.0);
    }

    #[test]
    fn integer_boundary_decodes_hole() {
        let boundary = pts(&[
            (0_i64, 0),
            (5, 5),
            (15, 5),
            (15, 15),
            (5, 15),
            (5, 5),
            (0, 0),
            (20, 0),
            (20, 20),
            (0, 20),
        ]);
        let pd = extract_polygon(boundary, 1_u32);
        assert_eq!(pd.holes.len(), 1);
        assert_eq!(pd.solid.extents(), Box2::new(0, 0, 20, 20));
        assert_eq!(pd.holes[0].extents(), Box2::new(5, 5, 15, 15));
    }

    #[test]
    fn degenerate_pinch_is_not_a_hole() {
        // a zero width spike visits (5,0) twice but encloses nothing
        let boundary = pts(&[
            (0.0, 0.0),
            (5.0, 0.0),
            (5.0, 3.0),
            (5.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let pd = extract_polygon(boundary, 1_u32);
        assert!(pd.holes.is_empty());
        assert_eq!(pd.solid.extents(), Box2::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn plain_ring_passes_through() {
        let boundary = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let pd = extract_polygon(boundary, 7_u32);
        assert!(pd.holes.is_empty());
        assert_eq!(pd.solid.len(), 4);
        assert_eq!(pd.solid.extents(), Box2::new(0, 0, 10, 10));
    }
}
