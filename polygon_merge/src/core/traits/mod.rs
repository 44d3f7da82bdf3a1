//! Numeric traits used across the crate: fuzzy float comparison and the coordinate
//! number abstraction.
mod fuzzy_eq;
mod fuzzy_ord;
mod merge_num;

pub use fuzzy_eq::*;
pub use fuzzy_ord::*;
pub use merge_num::*;
