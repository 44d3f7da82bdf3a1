/// Macro used for fuzzy equal assertions.
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        #[allow(unused_imports)]
        use $crate::core::traits::*;
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        #[allow(unused_imports)]
        use $crate::core::traits::*;
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Macro used for implementing other macros. Used for extracting macro repetition count
/// for reserving capacity up front.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Construct a [Polygon2](crate::polygon::Polygon2) with the vertexes given as a list
/// of `(x, y)` tuples.
///
/// # Examples
///
/// ```
/// # use polygon_merge::polygon;
/// # use polygon_merge::core::math::Point2;
/// let square = polygon![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
/// assert_eq!(square.len(), 4);
/// assert_eq!(square[0], Point2::new(0.0, 0.0));
/// ```
#[macro_export]
macro_rules! polygon {
    ($( $pt:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$($crate::replace_expr!(($pt) ())),*]);
            let mut pl = $crate::polygon::Polygon2::with_capacity(size);
            $(
                pl.push($crate::core::math::Point2::new($pt.0, $pt.1));
            )*
            pl
        }
    };
}
