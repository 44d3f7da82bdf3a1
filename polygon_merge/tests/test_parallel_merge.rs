use polygon_merge::assert_fuzzy_eq;
use polygon_merge::core::math::Box2;
use polygon_merge::merge::{MergeRunner, MergeSettings, PolygonMerger};

fn chain_merger(properties: &[u32]) -> PolygonMerger<u32, f64> {
    let mut merger = PolygonMerger::new();
    merger.set_merge_settings(MergeSettings {
        merge_threshold: 2,
        ..Default::default()
    });
    for (i, &property) in properties.iter().enumerate() {
        let x = i as f64 * 8.0;
        merger.add_object(property, Box2::new(x, 0.0, x + 10.0, 10.0));
    }
    merger
}

fn chain_area(count: usize) -> f64 {
    ((count as f64 - 1.0) * 8.0 + 10.0) * 10.0
}

#[test]
fn parallel_run_matches_the_single_threaded_merge() {
    let properties = vec![1_u32; 20];

    let mut serial = chain_merger(&properties);
    serial.merge();
    let serial_polygons = serial.all_polygons();

    let mut parallel = chain_merger(&properties);
    MergeRunner::new(&mut parallel, 4).run();
    let parallel_polygons = parallel.all_polygons();

    assert_eq!(serial_polygons.len(), 1);
    assert_eq!(parallel_polygons.len(), serial_polygons.len());
    assert_fuzzy_eq!(
        parallel_polygons[0].covered_area(),
        serial_polygons[0].covered_area(),
        1e-6
    );
    assert_fuzzy_eq!(parallel_polygons[0].covered_area(), chain_area(20), 1e-6);
}

#[test]
fn parallel_property_collapse_converges() {
    let properties: Vec<u32> = (0..16).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
    let mut merger = chain_merger(&properties);
    MergeRunner::new(&mut merger, 4).run();

    let polygons = merger.all_polygons();
    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].property, 1);
    assert_fuzzy_eq!(polygons[0].covered_area(), chain_area(16), 1e-6);
    assert_eq!(merger.property_aliases().get(&2), Some(&1));
}

#[test]
fn parallel_conflict_reporting_accumulates() {
    let properties: Vec<u32> = (0..16).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
    let mut merger = chain_merger(&properties);
    merger.set_merge_settings(MergeSettings {
        merge_threshold: 2,
        check_property_diff: true,
        ..Default::default()
    });
    MergeRunner::new(&mut merger, 4).run();

    let conflicts = merger.prop_diff_areas();
    assert!(!conflicts.is_empty());
    for conflict in &conflicts {
        assert!(conflict.properties.len() >= 2);
    }
    // conflict area is excluded from the outputs, so no polygon interior overlaps
    let polygons = merger.all_polygons();
    assert!(!polygons.is_empty());
    assert!(polygons.iter().all(|pd| pd.property == 1 || pd.property == 2));
}

#[test]
fn default_thread_count_runs() {
    let mut merger = chain_merger(&[1, 1, 1]);
    MergeRunner::new(&mut merger, 0).run();
    assert_eq!(merger.all_polygons().len(), 1);
}
