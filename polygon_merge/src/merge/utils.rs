//! Polygon point cleaning.
use crate::core::traits::MergeNum;
use crate::polygon::{simplify_ring, Polygon2};

use super::prop_polygon::PropPolygon;

/// Iterated simplification of one ring.
///
/// Simplifies until the vertex count stabilizes, then drops a last vertex that ended
/// up within `dist` of the first. Results with fewer than 3 vertexes are discarded and
/// the input ring kept.
pub fn clean_polygon<T>(polygon: &mut Polygon2<T>, dist: f64)
where
    T: MergeNum,
{
    let mut current = polygon.points.clone();
    loop {
        let simplified = simplify_ring(&current, dist);
        let stable = simplified.len() == current.len();
        current = simplified;
        if stable {
            break;
        }
    }

    if current.len() > 1 {
        let first = current[0];
        let last = current[current.len() - 1];
        if first.dist_sq(last) <= dist * dist {
            current.pop();
        }
    }

    if current.len() >= 3 {
        polygon.points = current;
    }
}

/// Clean the solid and every hole ring of each polygon.
pub fn clean_polygons<P, T>(polygons: &mut [PropPolygon<P, T>], dist: f64)
where
    T: MergeNum,
{
    for pd in polygons {
        clean_polygon(&mut pd.solid, dist);
        for hole in &mut pd.holes {
            clean_polygon(hole, dist);
        }
    }
}
