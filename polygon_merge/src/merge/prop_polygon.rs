use crate::core::math::Box2;
use crate::core::traits::MergeNum;
use crate::polygon::{Polygon2, PolygonWithHoles2};

use super::rect_tree::Extents2D;

/// Polygon tagged with a property: one solid ring plus zero or more hole rings.
///
/// After [normalize](Self::normalize) the solid ring winds counter clockwise and every
/// hole ring winds clockwise, independent of the input winding.
#[derive(Debug, Clone)]
pub struct PropPolygon<P, T = f64> {
    pub property: P,
    pub solid: Polygon2<T>,
    pub holes: Vec<Polygon2<T>>,
}

impl<P, T> PropPolygon<P, T>
where
    T: MergeNum,
{
    pub fn new(property: P, shape: impl Into<PolygonWithHoles2<T>>) -> Self {
        let shape = shape.into();
        Self {
            property,
            solid: shape.outline,
            holes: shape.holes,
        }
    }

    #[inline]
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Union of the solid and hole extents.
    pub fn bbox(&self) -> Box2<T> {
        let mut bbox = self.solid.extents();
        for hole in &self.holes {
            bbox.union_box(&hole.extents());
        }
        bbox
    }

    /// Flip the solid ring counter clockwise and every hole ring clockwise.
    pub fn normalize(&mut self) {
        if !self.solid.is_ccw() {
            self.solid.reverse();
        }
        for hole in &mut self.holes {
            if hole.is_ccw() {
                hole.reverse();
            }
        }
    }

    /// Signed area of the solid ring.
    #[inline]
    pub fn covered_area(&self) -> f64 {
        self.solid.area()
    }

    /// Drop holes whose area is strictly below `area`.
    pub fn remove_tiny_holes(&mut self, area: f64) {
        self.holes.retain(|hole| !hole.area().abs().lt_tol(area));
    }
}

impl<P, T> Extents2D<T> for PropPolygon<P, T>
where
    T: MergeNum,
{
    #[inline]
    fn extents(&self) -> Box2<T> {
        self.bbox()
    }
}
