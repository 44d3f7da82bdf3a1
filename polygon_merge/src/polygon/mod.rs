//! Polygon data types and simplification.
mod polygon2;
mod simplify;

pub use polygon2::*;
pub use simplify::*;
