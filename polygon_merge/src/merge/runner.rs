//! Parallel merge execution.
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::merger::{MergeTaskNode, PolygonMerger};
use super::point_index::PointIndexed;
use super::Property;

/// Drives a merge over a worker pool.
///
/// The task tree is walked as a dependency DAG: every node merges strictly after all
/// of its children, children of disjoint subtrees merge in parallel. Shared state (the
/// property alias map and the conflict list) is synchronized inside the merger.
///
/// # Examples
///
/// ```
/// # use polygon_merge::core::math::Box2;
/// # use polygon_merge::merge::{MergeRunner, PolygonMerger};
/// let mut merger: PolygonMerger<u32, i64> = PolygonMerger::new();
/// merger.add_object(1, Box2::new(0, 0, 10, 10));
/// merger.add_object(1, Box2::new(8, 0, 20, 10));
/// MergeRunner::new(&mut merger, 4).run();
/// assert_eq!(merger.all_polygons().len(), 1);
/// ```
pub struct MergeRunner<'m, P, T>
where
    P: Property,
    T: PointIndexed,
{
    merger: &'m mut PolygonMerger<P, T>,
    threads: usize,
}

impl<'m, P, T> MergeRunner<'m, P, T>
where
    P: Property,
    T: PointIndexed,
{
    /// A runner over `threads` worker threads; 0 lets the pool pick the default.
    pub fn new(merger: &'m mut PolygonMerger<P, T>, threads: usize) -> Self {
        Self { merger, threads }
    }

    /// Preprocess, drain the task DAG over the worker pool, postprocess. Blocks until
    /// the merge completes.
    pub fn run(&mut self) {
        self.merger.pre_process();

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .expect("failed to build merge worker pool");
        let mut tree = self.merger.take_task_tree();
        {
            let merger: &PolygonMerger<P, T> = self.merger;
            pool.install(|| merge_subtree(merger, &mut tree));
        }
        self.merger.put_task_tree(tree);

        self.merger.post_process();
    }
}

/// Children first, in parallel; the node body afterwards.
fn merge_subtree<P, T>(merger: &PolygonMerger<P, T>, node: &mut MergeTaskNode<P, T>)
where
    P: Property,
    T: PointIndexed,
{
    node.children_mut()
        .par_iter_mut()
        .for_each(|child| merge_subtree(merger, child));
    merger.merge_node(node);
}
