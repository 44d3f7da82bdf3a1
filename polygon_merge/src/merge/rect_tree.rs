//! Rectangle tree spatial partitioner.
//!
//! Subdivides a flat list of bbox-able objects into a tree whose leaves hold at most a
//! threshold number of objects. Nodes split by bisecting the longer axis of their
//! extent; objects straddling the split plane are retained at the parent, which is
//! where overlaps across partition boundaries get merged later.
use crate::core::math::Box2;
use crate::core::traits::MergeNum;

/// Types that expose axis aligned extents for spatial partitioning.
pub trait Extents2D<T>
where
    T: MergeNum,
{
    fn extents(&self) -> Box2<T>;
}

/// Node of the rectangle tree. The root node doubles as the tree handle.
///
/// Node boxes are tight: after a build each node's box is the union of the extents of
/// the objects in its subtree, so sibling boxes only intersect where object geometry
/// actually comes close.
#[derive(Debug)]
pub struct RectNode<T, O> {
    bbox: Box2<T>,
    objs: Vec<O>,
    children: Vec<RectNode<T, O>>,
}

impl<T, O> Default for RectNode<T, O>
where
    T: MergeNum,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O> RectNode<T, O>
where
    T: MergeNum,
{
    pub fn new() -> Self {
        Self {
            bbox: Box2::empty(),
            objs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Seed the node extent; a following build with objects recomputes it tight.
    #[inline]
    pub fn set_bbox(&mut self, bbox: Box2<T>) {
        self.bbox = bbox;
    }

    #[inline]
    pub fn bbox(&self) -> Box2<T> {
        self.bbox
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[inline]
    pub fn children(&self) -> &[RectNode<T, O>] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut [RectNode<T, O>] {
        &mut self.children
    }

    /// Objects held at this node (not the subtree).
    #[inline]
    pub fn objects(&self) -> &[O] {
        &self.objs
    }

    /// Move the local object list out of the node.
    #[inline]
    pub fn take_objects(&mut self) -> Vec<O> {
        std::mem::take(&mut self.objs)
    }

    /// Drain the node and its subtree into `out`. Each object is yielded exactly once;
    /// the subtree structure is discarded.
    pub fn take_all_objects(&mut self, out: &mut Vec<O>) {
        out.append(&mut self.objs);
        for child in &mut self.children {
            child.take_all_objects(out);
        }
        self.children.clear();
    }

    /// Visit every object of the subtree in place.
    pub fn visit_objects<'a>(&'a self, visit: &mut impl FnMut(&'a O)) {
        for obj in &self.objs {
            visit(obj);
        }
        for child in &self.children {
            child.visit_objects(visit);
        }
    }

    /// True when the subtree holds at least one object.
    pub fn has_objects(&self) -> bool {
        !self.objs.is_empty() || self.children.iter().any(|c| c.has_objects())
    }

    pub fn clear(&mut self) {
        self.objs.clear();
        self.children.clear();
        self.bbox = Box2::empty();
    }
}

impl<T, O> RectNode<T, O>
where
    T: MergeNum,
    O: Extents2D<T>,
{
    /// Move `objs` into the node and split until every leaf population is at most
    /// `threshold`. A threshold of 0 flattens everything into this node as a single
    /// leaf.
    pub fn build(&mut self, objs: Vec<O>, threshold: usize) {
        self.children.clear();
        self.objs = objs;

        let mut bbox = Box2::empty();
        for obj in &self.objs {
            bbox.union_box(&obj.extents());
        }
        if bbox.is_valid() {
            self.bbox = bbox;
        }

        if threshold == 0 {
            return;
        }
        self.split(threshold);
    }

    fn split(&mut self, threshold: usize) {
        if self.objs.len() <= threshold || !self.bbox.is_valid() {
            return;
        }

        let axis = self.bbox.longer_axis();
        let mid = self.bbox.mid(axis);
        let (lo_edge, hi_edge) = self.bbox.axis_span(axis);
        // box too narrow to bisect further
        if mid.eq_tol(lo_edge) || mid.eq_tol(hi_edge) {
            return;
        }

        let mut lo: Vec<O> = Vec::new();
        let mut hi: Vec<O> = Vec::new();
        let mut stay: Vec<O> = Vec::new();
        for obj in self.objs.drain(..) {
            let (obj_min, obj_max) = obj.extents().axis_span(axis);
            if obj_max.le_tol(mid) {
                lo.push(obj);
            } else if obj_min.ge_tol(mid) {
                hi.push(obj);
            } else {
                stay.push(obj);
            }
        }

        if stay.is_empty() && (lo.is_empty() || hi.is_empty()) {
            // everything landed on one side, splitting cannot make progress
            self.objs = if lo.is_empty() { hi } else { lo };
            return;
        }
        self.objs = stay;

        for part in [lo, hi] {
            if part.is_empty() {
                continue;
            }
            let mut child = RectNode::new();
            child.build(part, threshold);
            self.children.push(child);
        }
    }
}
