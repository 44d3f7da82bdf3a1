//! Property aware boolean union kernel.
//!
//! Rings are widened to `f64` and composed with [geo]'s boolean operations; the result
//! maps each set of properties to the region covered by exactly that set. Regions are
//! reported as closed boundary polylines with self contact hole encoding, the form
//! [extract_polygon](super::extract_polygon) decodes.
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use geo::{Area, BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon};

use crate::core::math::Point2;
use crate::core::traits::MergeNum;
use crate::polygon::{Polygon2, Polyline2};

use super::Property;

/// Region set attributed to one property combination.
pub struct PolygonSet<T> {
    regions: MultiPolygon<f64>,
    _num: PhantomData<T>,
}

impl<T> PolygonSet<T>
where
    T: MergeNum,
{
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.0.is_empty()
    }

    /// Emit one closed boundary polyline per connected region.
    ///
    /// Holes are keyholed into the outer ring: the boundary runs to the hole through a
    /// bridge vertex pair, around the hole, and back, so the hole start and the bridge
    /// anchor each appear twice.
    pub fn get(&self, out: &mut Vec<Polyline2<T>>) {
        for poly in &self.regions.0 {
            if let Some(boundary) = keyholed_boundary(poly) {
                out.push(
                    boundary
                        .into_iter()
                        .map(|c| Point2::new(T::from_f64(c.x), T::from_f64(c.y)))
                        .collect(),
                );
            }
        }
    }
}

/// Property aware polygon union primitive.
///
/// Accepts rings tagged with a property and a solid/hole flag; [merge](Self::merge)
/// resolves them into a mapping from property set to the region covered by exactly
/// that set of properties.
pub struct PropertyMerge<P, T>
where
    P: Property,
    T: MergeNum,
{
    polygons: Vec<(P, GeoPolygon<f64>)>,
    _num: PhantomData<T>,
}

impl<P, T> Default for PropertyMerge<P, T>
where
    P: Property,
    T: MergeNum,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> PropertyMerge<P, T>
where
    P: Property,
    T: MergeNum,
{
    pub fn new() -> Self {
        Self {
            polygons: Vec::new(),
            _num: PhantomData,
        }
    }

    /// Insert a ring. A hole ring is attached to the most recently inserted solid
    /// ring, which must exist and carry the same property.
    pub fn insert(&mut self, ring: &Polygon2<T>, property: P, is_hole: bool) {
        let ls = to_line_string(ring);
        if is_hole {
            let (last_property, poly) = self
                .polygons
                .last_mut()
                .expect("hole ring inserted before any solid ring");
            assert!(
                *last_property == property,
                "hole ring property does not match its solid ring"
            );
            poly.interiors_push(ls);
        } else {
            self.polygons.push((property, GeoPolygon::new(ls, Vec::new())));
        }
    }

    /// Union the inserted polygons and attribute every covered region to the exact set
    /// of properties covering it.
    pub fn merge(self) -> BTreeMap<BTreeSet<P>, PolygonSet<T>> {
        let mut by_property: BTreeMap<P, Vec<MultiPolygon<f64>>> = BTreeMap::new();
        for (property, poly) in self.polygons {
            by_property
                .entry(property)
                .or_default()
                .push(MultiPolygon::new(vec![poly]));
        }

        // overlay refinement: fold each property region in, splitting existing entries
        // into inside/outside parts
        let mut entries: Vec<(BTreeSet<P>, MultiPolygon<f64>)> = Vec::new();
        for (property, group) in by_property {
            let mut remaining = union_all(group);
            let mut split = Vec::with_capacity(entries.len() + 2);
            for (properties, region) in entries {
                if !covers_area(&remaining) {
                    split.push((properties, region));
                    continue;
                }
                let common = region.intersection(&remaining);
                if !covers_area(&common) {
                    split.push((properties, region));
                    continue;
                }
                let outside = region.difference(&remaining);
                remaining = remaining.difference(&region);
                if covers_area(&outside) {
                    split.push((properties.clone(), outside));
                }
                let mut joint = properties;
                joint.insert(property.clone());
                split.push((joint, common));
            }
            if covers_area(&remaining) {
                split.push((BTreeSet::from([property]), remaining));
            }
            entries = split;
        }

        let mut results: BTreeMap<BTreeSet<P>, PolygonSet<T>> = BTreeMap::new();
        for (properties, regions) in entries {
            match results.entry(properties) {
                Entry::Vacant(vacant) => {
                    vacant.insert(PolygonSet {
                        regions,
                        _num: PhantomData,
                    });
                }
                Entry::Occupied(mut occupied) => {
                    occupied.get_mut().regions.0.extend(regions.0);
                }
            }
        }
        results
    }
}

fn to_line_string<T>(ring: &Polygon2<T>) -> LineString<f64>
where
    T: MergeNum,
{
    LineString::new(
        ring.iter()
            .map(|p| Coord {
                x: p.x.to_f64(),
                y: p.y.to_f64(),
            })
            .collect(),
    )
}

/// Cascaded pairwise union.
fn union_all(mut regions: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while regions.len() > 1 {
        let mut merged = Vec::with_capacity(regions.len() / 2 + 1);
        let mut iter = regions.into_iter();
        while let Some(a) = iter.next() {
            match iter.next() {
                Some(b) => merged.push(a.union(&b)),
                None => merged.push(a),
            }
        }
        regions = merged;
    }
    regions
        .into_iter()
        .next()
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

/// True when the region covers actual area beyond the float tolerance, filtering out
/// empty results and the near zero area slivers boolean ops leave along shared edges.
fn covers_area(regions: &MultiPolygon<f64>) -> bool {
    !regions.0.is_empty() && regions.unsigned_area().gt_tol(0.0)
}

/// Ring coordinates without the closing duplicate.
fn ring_coords(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut coords = ring.0.clone();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// One closed boundary polyline for a polygon, holes keyholed into the outer ring.
fn keyholed_boundary(poly: &GeoPolygon<f64>) -> Option<Vec<Coord<f64>>> {
    let exterior = ring_coords(poly.exterior());
    if exterior.len() < 3 {
        return None;
    }

    // bridge every hole to its nearest exterior vertex
    let mut attached: Vec<Vec<(usize, Vec<Coord<f64>>, bool)>> = vec![Vec::new(); exterior.len()];
    for hole in poly.interiors() {
        let hole_pts = ring_coords(hole);
        if hole_pts.len() < 3 {
            continue;
        }
        let mut anchor = 0;
        let mut hole_start = 0;
        let mut best = f64::INFINITY;
        for (i, a) in exterior.iter().enumerate() {
            for (j, b) in hole_pts.iter().enumerate() {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                let dist_sq = dx * dx + dy * dy;
                if dist_sq < best {
                    best = dist_sq;
                    anchor = i;
                    hole_start = j;
                }
            }
        }
        let shared_vertex = best == 0.0;
        attached[anchor].push((hole_start, hole_pts, shared_vertex));
    }

    let mut boundary = Vec::with_capacity(exterior.len() + 2);
    for (i, a) in exterior.iter().enumerate() {
        boundary.push(*a);
        for (hole_start, hole_pts, shared_vertex) in &attached[i] {
            let start = *hole_start;
            if *shared_vertex {
                // the hole touches the exterior exactly at the anchor
                boundary.extend(hole_pts[start + 1..].iter().copied());
                boundary.extend(hole_pts[..start].iter().copied());
                boundary.push(hole_pts[start]);
            } else {
                boundary.extend(hole_pts[start..].iter().copied());
                boundary.extend(hole_pts[..start].iter().copied());
                boundary.push(hole_pts[start]);
                boundary.push(*a);
            }
        }
    }
    // close the polyline
    boundary.push(boundary[0]);
    Some(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::extract_polygon;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon2<f64> {
        polygon![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
    }

    #[test]
    fn same_property_overlap_unions() {
        let mut kernel = PropertyMerge::<u32, f64>::new();
        kernel.insert(&square(0.0, 0.0, 10.0, 10.0), 1, false);
        kernel.insert(&square(5.0, 5.0, 15.0, 15.0), 1, false);
        let results = kernel.merge();
        assert_eq!(results.len(), 1);

        let (properties, regions) = results.into_iter().next().unwrap();
        assert_eq!(properties, BTreeSet::from([1]));
        let mut outs = Vec::new();
        regions.get(&mut outs);
        assert_eq!(outs.len(), 1);
        let pd = extract_polygon(outs.into_iter().next().unwrap(), 1_u32);
        assert_fuzzy_eq!(pd.solid.area().abs(), 175.0, 1e-6);
    }

    #[test]
    fn distinct_properties_refine_into_exact_sets() {
        let mut kernel = PropertyMerge::<u32, f64>::new();
        kernel.insert(&square(0.0, 0.0, 10.0, 10.0), 1, false);
        kernel.insert(&square(5.0, 5.0, 15.0, 15.0), 2, false);
        let results = kernel.merge();

        let keys: Vec<BTreeSet<u32>> = results.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                BTreeSet::from([1]),
                BTreeSet::from([1, 2]),
                BTreeSet::from([2])
            ]
        );

        let joint = &results[&BTreeSet::from([1, 2])];
        let mut outs = Vec::new();
        joint.get(&mut outs);
        assert_eq!(outs.len(), 1);
        let pd = extract_polygon(outs.into_iter().next().unwrap(), 0_u32);
        assert_fuzzy_eq!(pd.solid.area().abs(), 25.0, 1e-6);
    }

    #[test]
    fn disjoint_same_property_regions_stay_separate() {
        let mut kernel = PropertyMerge::<u32, f64>::new();
        kernel.insert(&square(0.0, 0.0, 10.0, 10.0), 1, false);
        kernel.insert(&square(20.0, 0.0, 30.0, 10.0), 1, false);
        let results = kernel.merge();
        assert_eq!(results.len(), 1);
        let mut outs = Vec::new();
        results[&BTreeSet::from([1])].get(&mut outs);
        assert_eq!(outs.len(), 2);
    }

    #[test]
    fn holes_keyhole_and_decode() {
        let mut kernel = PropertyMerge::<u32, f64>::new();
        // frame of four bars leaves a hole in the middle
        kernel.insert(&square(0.0, 0.0, 50.0, 10.0), 1, false);
        kernel.insert(&square(0.0, 40.0, 50.0, 50.0), 1, false);
        kernel.insert(&square(0.0, 0.0, 10.0, 50.0), 1, false);
        kernel.insert(&square(40.0, 0.0, 50.0, 50.0), 1, false);
        let results = kernel.merge();
        assert_eq!(results.len(), 1);

        let mut outs = Vec::new();
        results[&BTreeSet::from([1])].get(&mut outs);
        assert_eq!(outs.len(), 1);
        let pd = extract_polygon(outs.into_iter().next().unwrap(), 1_u32);
        assert_eq!(pd.holes.len(), 1);
        assert_fuzzy_eq!(pd.solid.area().abs(), 2500.0, 1e-6);
        assert_fuzzy_eq!(pd.holes[0].area().abs(), 900.0, 1e-6);
    }

    #[test]
    fn inserted_holes_subtract_from_their_solid() {
        let mut kernel = PropertyMerge::<u32, f64>::new();
        kernel.insert(&square(0.0, 0.0, 20.0, 20.0), 1, false);
        kernel.insert(&square(5.0, 5.0, 15.0, 15.0), 1, true);
        let results = kernel.merge();
        let mut outs = Vec::new();
        results[&BTreeSet::from([1])].get(&mut outs);
        assert_eq!(outs.len(), 1);
        let pd = extract_polygon(outs.into_iter().next().unwrap(), 1_u32);
        assert_eq!(pd.holes.len(), 1);
        assert_fuzzy_eq!(pd.solid.area().abs() - pd.holes[0].area().abs(), 300.0, 1e-6);
    }
}
