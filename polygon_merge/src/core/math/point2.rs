use crate::core::traits::MergeNum;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D point with x and y components.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point2<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T> Point2<T>
where
    T: MergeNum,
{
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Squared distance to `other`, widened to `f64`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use polygon_merge::core::math::Point2;
    /// let a = Point2::new(0, 0);
    /// let b = Point2::new(3, 4);
    /// assert_eq!(a.dist_sq(b), 25.0);
    /// ```
    #[inline]
    pub fn dist_sq(self, other: Self) -> f64 {
        let dx = self.x.to_f64() - other.x.to_f64();
        let dy = self.y.to_f64() - other.y.to_f64();
        dx * dx + dy * dy
    }

    /// Componentwise tolerant equality.
    #[inline]
    pub fn eq_tol(self, other: Self) -> bool {
        self.x.eq_tol(other.x) && self.y.eq_tol(other.y)
    }
}
