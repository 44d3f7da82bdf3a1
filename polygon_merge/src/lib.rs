//! Parallel 2D polygon merge engine.
//!
//! Takes a large collection of polygons, each tagged with a caller supplied property,
//! and produces a smaller collection of non overlapping polygons with holes in which
//! adjacent or overlapping inputs sharing a property are fused into one region.
//! Overlaps between polygons of different properties are either collapsed onto a
//! canonical property or reported as conflict regions.
//!
//! Merging runs over a rectangle tree of localized merge tasks, bottom up, either
//! single threaded through [merge::PolygonMerger::merge] or on a worker pool through
//! [merge::MergeRunner].

#[macro_use]
mod macros;
pub mod core;
pub mod merge;
pub mod polygon;
