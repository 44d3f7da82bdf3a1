//! Merger façade and the per node merge step.
use std::collections::{BTreeSet, HashMap};
use std::mem;
use std::sync::{Mutex, RwLock};

use crate::core::math::Box2;
use crate::core::traits::MergeNum;
use crate::polygon::{PolygonWithHoles2, Polyline2};

use super::boolean::PropertyMerge;
use super::boundary::extract_polygon;
use super::connectivity::overlap_groups;
use super::point_index::PointIndexed;
use super::prop_polygon::PropPolygon;
use super::rect_tree::RectNode;
use super::utils::clean_polygons;
use super::Property;

/// Options controlling a merge run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSettings {
    /// Run iterated point simplification before and after merging.
    pub clean_polygon_points: bool,
    /// Simplification tolerance.
    pub clean_point_dist: f64,
    /// Record conflict regions instead of collapsing properties.
    pub check_property_diff: bool,
    /// Drop merged solids with area below [tiny_solid_area](Self::tiny_solid_area) in
    /// post processing.
    pub ignore_tiny_solid: bool,
    pub tiny_solid_area: f64,
    /// Drop holes with area below [tiny_holes_area](Self::tiny_holes_area) after a
    /// merge step.
    pub ignore_tiny_holes: bool,
    pub tiny_holes_area: f64,
    /// Leaf capacity of the merge task tree.
    pub merge_threshold: usize,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            clean_polygon_points: false,
            clean_point_dist: 0.0,
            check_property_diff: false,
            ignore_tiny_solid: false,
            tiny_solid_area: 0.0,
            ignore_tiny_holes: false,
            tiny_holes_area: 0.0,
            merge_threshold: 1024,
        }
    }
}

/// Region covered by polygons of two or more distinct properties.
#[derive(Debug, Clone)]
pub struct PropDiffRegion<P, T = f64> {
    pub properties: BTreeSet<P>,
    /// Boundary polylines exactly as produced by the union kernel.
    pub boundaries: Vec<Polyline2<T>>,
}

/// Node type of the merge task tree.
pub type MergeTaskNode<P, T> = RectNode<T, PropPolygon<P, T>>;

/// Merges property tagged polygons into non overlapping polygons with holes.
///
/// Inputs are collected through [add_object](Self::add_object), fused by
/// [merge](Self::merge) (or in parallel by [MergeRunner](super::MergeRunner)) and read
/// back through [all_polygons](Self::all_polygons). The merger owns every polygon it
/// stores; references handed out are invalidated by the next merge or clear.
pub struct PolygonMerger<P, T = f64>
where
    P: Property,
    T: PointIndexed,
{
    bbox: Box2<T>,
    datas: Vec<PropPolygon<P, T>>,
    task_tree: MergeTaskNode<P, T>,
    settings: MergeSettings,
    aliases: RwLock<HashMap<P, P>>,
    prop_diffs: Mutex<Vec<PropDiffRegion<P, T>>>,
}

impl<P, T> Default for PolygonMerger<P, T>
where
    P: Property,
    T: PointIndexed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> PolygonMerger<P, T>
where
    P: Property,
    T: PointIndexed,
{
    pub fn new() -> Self {
        Self {
            bbox: Box2::empty(),
            datas: Vec::new(),
            task_tree: RectNode::new(),
            settings: MergeSettings::default(),
            aliases: RwLock::new(HashMap::new()),
            prop_diffs: Mutex::new(Vec::new()),
        }
    }

    pub fn set_merge_settings(&mut self, settings: MergeSettings) {
        self.settings = settings;
    }

    /// Add a polygon. Accepts anything convertible to [PolygonWithHoles2]: a box, a
    /// plain polygon, or a polygon with holes. The input is normalized and the engine
    /// bbox extended. The returned reference is read access only and is invalidated by
    /// any merge step.
    pub fn add_object(
        &mut self,
        property: P,
        shape: impl Into<PolygonWithHoles2<T>>,
    ) -> &PropPolygon<P, T> {
        let mut pd = PropPolygon::new(property, shape);
        pd.normalize();
        self.bbox.union_box(&pd.bbox());
        self.datas.push(pd);
        &self.datas[self.datas.len() - 1]
    }

    /// Single threaded merge: preprocess, merge the task tree bottom up, postprocess.
    pub fn merge(&mut self) {
        self.pre_process();
        let mut tree = mem::take(&mut self.task_tree);
        self.merge_region(&mut tree);
        self.task_tree = tree;
        self.post_process();
    }

    /// All polygons currently held: the task tree contents, or the flat input list
    /// while no tree has been built yet.
    pub fn all_polygons(&self) -> Vec<&PropPolygon<P, T>> {
        let mut out = Vec::new();
        self.task_tree.visit_objects(&mut |pd| out.push(pd));
        if out.is_empty() {
            out.extend(self.datas.iter());
        }
        out
    }

    /// Accumulated extent of every added polygon.
    #[inline]
    pub fn bbox(&self) -> Box2<T> {
        self.bbox
    }

    /// Conflict regions recorded so far (only populated with
    /// [check_property_diff](MergeSettings::check_property_diff) set).
    pub fn prop_diff_areas(&self) -> Vec<PropDiffRegion<P, T>> {
        self.prop_diffs.lock().unwrap().clone()
    }

    /// Properties collapsed onto a canonical representative while conflict reporting
    /// was disabled.
    pub fn property_aliases(&self) -> HashMap<P, P> {
        self.aliases.read().unwrap().clone()
    }

    /// Drop every polygon and reset all run state.
    pub fn clear(&mut self) {
        self.datas.clear();
        self.task_tree.clear();
        self.aliases.write().unwrap().clear();
        self.prop_diffs.lock().unwrap().clear();
        self.bbox = Box2::empty();
    }

    pub(crate) fn pre_process(&mut self) {
        if self.settings.clean_polygon_points && self.settings.clean_point_dist > 0.0 {
            self.clean_all();
        }
        self.build_task_tree();
    }

    pub(crate) fn post_process(&mut self) {
        if self.settings.clean_polygon_points && self.settings.clean_point_dist > 0.0 {
            self.clean_all();
        }
        if self.settings.ignore_tiny_solid && self.settings.tiny_solid_area > 0.0 {
            self.filter_tiny_solids();
        }
    }

    pub(crate) fn take_task_tree(&mut self) -> MergeTaskNode<P, T> {
        mem::take(&mut self.task_tree)
    }

    pub(crate) fn put_task_tree(&mut self, tree: MergeTaskNode<P, T>) {
        self.task_tree = tree;
    }

    /// Recursive bottom up merge of a subtree.
    pub(crate) fn merge_region(&self, node: &mut MergeTaskNode<P, T>) {
        for child in node.children_mut() {
            self.merge_region(child);
        }
        self.merge_node(node);
    }

    /// The per node merge step. Children must already be merged (each one a leaf).
    pub(crate) fn merge_node(&self, node: &mut MergeTaskNode<P, T>) {
        let mut merged = false;
        let mut merged_objs: Vec<PropPolygon<P, T>> = Vec::new();

        // children whose extents touch hold regions that may overlap across the
        // partition boundary; fuse each connected group
        let child_boxes: Vec<Box2<T>> = node.children().iter().map(|c| c.bbox()).collect();
        for group in overlap_groups(&child_boxes) {
            let mut objs = Vec::new();
            for child_idx in group {
                let child = &mut node.children_mut()[child_idx];
                objs.append(&mut child.take_objects());
                child.clear();
            }
            self.merge_polygons(&mut objs);
            merged_objs.append(&mut objs);
            merged = true;
        }

        let had_local_objs = !node.objects().is_empty();
        let mut all_objs = Vec::new();
        node.take_all_objects(&mut all_objs);
        all_objs.append(&mut merged_objs);

        // straddling objects retained at this level may overlap anything below
        if had_local_objs {
            self.merge_polygons(&mut all_objs);
            merged = true;
        }

        if merged {
            self.filter_tiny_holes(&mut all_objs);
        }
        node.build(all_objs, 0);
    }

    /// Union kernel wrapper: fuse a polygon list in place, resolving properties
    /// through the alias map and recording conflicts or new aliases.
    pub(crate) fn merge_polygons(&self, polygons: &mut Vec<PropPolygon<P, T>>) {
        if polygons.len() <= 1 {
            return;
        }
        loop {
            let mut kernel = PropertyMerge::new();
            {
                let aliases = self.aliases.read().unwrap();
                for pd in polygons.drain(..) {
                    let PropPolygon {
                        property,
                        solid,
                        holes,
                    } = pd;
                    let property = aliases.get(&property).cloned().unwrap_or(property);
                    kernel.insert(&solid, property.clone(), false);
                    for hole in &holes {
                        kernel.insert(hole, property.clone(), true);
                    }
                }
            }

            let mut recorded_alias = false;
            for (properties, regions) in kernel.merge() {
                let mut outs: Vec<Polyline2<T>> = Vec::new();
                if !regions.is_empty() {
                    regions.get(&mut outs);
                }
                debug_assert!(!properties.is_empty());

                let property = if properties.len() > 1 {
                    if self.settings.check_property_diff {
                        self.prop_diffs.lock().unwrap().push(PropDiffRegion {
                            properties,
                            boundaries: outs,
                        });
                        continue;
                    }
                    // collapse onto the smallest property and remember the rewrite
                    let mut iter = properties.into_iter();
                    let canonical = iter.next().expect("property set cannot be empty");
                    let mut aliases = self.aliases.write().unwrap();
                    for other in iter {
                        let previous = aliases.insert(other, canonical.clone());
                        if previous.as_ref() != Some(&canonical) {
                            recorded_alias = true;
                        }
                    }
                    canonical
                } else {
                    properties
                        .into_iter()
                        .next()
                        .expect("property set cannot be empty")
                };

                for out in outs {
                    let mut pd = extract_polygon(out, property.clone());
                    pd.normalize();
                    polygons.push(pd);
                }
            }

            // a new alias means some output still carries a now collapsed property;
            // run the fused list through the kernel again so it converges
            if !recorded_alias || polygons.len() <= 1 {
                break;
            }
        }
    }

    fn build_task_tree(&mut self) {
        self.task_tree.set_bbox(self.bbox);
        let mut datas = mem::take(&mut self.datas);
        // a previous merge leaves results in the tree; rebuild over both
        self.task_tree.take_all_objects(&mut datas);
        self.task_tree.build(datas, self.settings.merge_threshold);
    }

    fn clean_all(&mut self) {
        let dist = self.settings.clean_point_dist;
        if self.task_tree.has_objects() {
            let mut polygons = Vec::new();
            self.task_tree.take_all_objects(&mut polygons);
            clean_polygons(&mut polygons, dist);
            self.task_tree.build(polygons, 0);
        } else {
            clean_polygons(&mut self.datas, dist);
        }
    }

    fn filter_tiny_holes(&self, polygons: &mut [PropPolygon<P, T>]) {
        if self.settings.ignore_tiny_holes && self.settings.tiny_holes_area > 0.0 {
            for pd in polygons {
                pd.remove_tiny_holes(self.settings.tiny_holes_area);
            }
        }
    }

    fn filter_tiny_solids(&mut self) {
        let mut polygons = Vec::new();
        self.task_tree.take_all_objects(&mut polygons);
        let threshold = self.settings.tiny_solid_area;
        polygons.retain(|pd| !pd.covered_area().lt_tol(threshold));
        self.task_tree.build(polygons, 0);
    }
}
