use super::{FuzzyEq, FuzzyOrd};
use num_traits::{Bounded, Num, NumCast};

/// Trait representing a coordinate number (signed integer or floating point) the merge
/// engine can operate on.
///
/// The comparison methods carry the tolerance policy of the coordinate kind: integers
/// compare bit exact, floating point values compare through [FuzzyEq]/[FuzzyOrd]. The
/// `*_tol` strict orderings (`lt_tol`, `gt_tol`) only hold when the difference exceeds
/// the tolerance, while the lenient orderings (`le_tol`, `ge_tol`) also hold for
/// approximately equal values.
///
/// # Examples
///
/// ```
/// # use polygon_merge::core::traits::MergeNum;
/// assert!(3_i64.lt_tol(4));
/// assert!(!1.0_f64.lt_tol(1.0 + 1e-12));
/// assert!(1.0_f64.le_tol(1.0 + 1e-12));
/// ```
pub trait MergeNum:
    Num
    + NumCast
    + Bounded
    + PartialOrd
    + Copy
    + Default
    + std::fmt::Debug
    + Send
    + Sync
    + 'static
{
    /// True for integer coordinate types; selects integer specific behavior at compile
    /// time (degenerate hole rejection, exact duplicate hashing).
    const INTEGRAL: bool;

    /// Equal within the tolerance of the coordinate kind.
    fn eq_tol(self, other: Self) -> bool;

    /// Not equal beyond the tolerance.
    #[inline]
    fn ne_tol(self, other: Self) -> bool {
        !self.eq_tol(other)
    }

    /// Less than by more than the tolerance.
    fn lt_tol(self, other: Self) -> bool;

    /// Less than or approximately equal.
    fn le_tol(self, other: Self) -> bool;

    /// Greater than by more than the tolerance.
    #[inline]
    fn gt_tol(self, other: Self) -> bool {
        other.lt_tol(self)
    }

    /// Greater than or approximately equal.
    #[inline]
    fn ge_tol(self, other: Self) -> bool {
        other.le_tol(self)
    }

    /// Widen to `f64` for area and distance computation.
    fn to_f64(self) -> f64;

    /// Narrow from `f64`, rounding for integer coordinate types.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_merge_num_integer {
    ($ty:ty) => {
        impl MergeNum for $ty {
            const INTEGRAL: bool = true;
            #[inline]
            fn eq_tol(self, other: Self) -> bool {
                self == other
            }
            #[inline]
            fn lt_tol(self, other: Self) -> bool {
                self < other
            }
            #[inline]
            fn le_tol(self, other: Self) -> bool {
                self <= other
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(value: f64) -> Self {
                value.round() as $ty
            }
        }
    };
}

macro_rules! impl_merge_num_float {
    ($ty:ty) => {
        impl MergeNum for $ty {
            const INTEGRAL: bool = false;
            #[inline]
            fn eq_tol(self, other: Self) -> bool {
                self.fuzzy_eq(other)
            }
            #[inline]
            fn lt_tol(self, other: Self) -> bool {
                !self.fuzzy_gt(other)
            }
            #[inline]
            fn le_tol(self, other: Self) -> bool {
                self.fuzzy_lt(other)
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $ty
            }
        }
    };
}

impl_merge_num_integer!(i32);
impl_merge_num_integer!(i64);
impl_merge_num_float!(f32);
impl_merge_num_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_comparisons_are_exact() {
        assert!(5_i32.eq_tol(5));
        assert!(5_i32.ne_tol(6));
        assert!(5_i64.lt_tol(6));
        assert!(!5_i64.lt_tol(5));
        assert!(5_i64.le_tol(5));
        assert!(6_i64.gt_tol(5));
        assert!(5_i64.ge_tol(5));
    }

    #[test]
    fn float_comparisons_are_tolerant() {
        assert!(1.0_f64.eq_tol(1.0 + 1e-12));
        assert!(1.0_f64.ne_tol(1.1));
        // strict orderings only hold beyond the tolerance
        assert!(!1.0_f64.lt_tol(1.0 + 1e-12));
        assert!(1.0_f64.lt_tol(1.1));
        // lenient orderings hold for approximately equal values
        assert!(1.0_f64.le_tol(1.0 - 1e-12));
        assert!(1.0_f64.ge_tol(1.0 + 1e-12));
    }

    #[test]
    fn from_f64_rounds_integers() {
        assert_eq!(i64::from_f64(2.6), 3);
        assert_eq!(i64::from_f64(-2.6), -3);
        assert_eq!(i32::from_f64(2.4), 2);
    }
}
