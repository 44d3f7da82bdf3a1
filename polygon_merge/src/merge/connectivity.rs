//! Connected component grouping over bounding boxes.
use crate::core::math::Box2;
use crate::core::traits::MergeNum;

/// Disjoint set forest over indices `0..n`.
#[derive(Debug)]
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            // path halving
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Groups of indices whose boxes form connected overlap components (touching counts).
/// Singleton components are omitted; group and member order follow the input order.
pub(crate) fn overlap_groups<T>(boxes: &[Box2<T>]) -> Vec<Vec<usize>>
where
    T: MergeNum,
{
    let mut sets = DisjointSets::new(boxes.len());
    for i in 0..boxes.len() {
        for j in (i + 1)..boxes.len() {
            if boxes[i].intersects(&boxes[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root = vec![usize::MAX; boxes.len()];
    for i in 0..boxes.len() {
        let root = sets.find(i);
        if group_of_root[root] == usize::MAX {
            group_of_root[root] = groups.len();
            groups.push(Vec::new());
        }
        groups[group_of_root[root]].push(i);
    }
    groups.retain(|g| g.len() > 1);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_boxes_form_no_groups() {
        let boxes = vec![
            Box2::new(0, 0, 10, 10),
            Box2::new(20, 0, 30, 10),
            Box2::new(40, 0, 50, 10),
        ];
        assert!(overlap_groups(&boxes).is_empty());
    }

    #[test]
    fn touching_boxes_group() {
        let boxes = vec![
            Box2::new(0, 0, 10, 10),
            Box2::new(10, 0, 20, 10),
            Box2::new(40, 0, 50, 10),
        ];
        assert_eq!(overlap_groups(&boxes), vec![vec![0, 1]]);
    }

    #[test]
    fn chains_connect_transitively() {
        let boxes = vec![
            Box2::new(0.0, 0.0, 10.0, 10.0),
            Box2::new(30.0, 0.0, 40.0, 10.0),
            Box2::new(8.0, 0.0, 18.0, 10.0),
            Box2::new(16.0, 0.0, 31.0, 10.0),
        ];
        // 0-2, 2-3 and 3-1 overlap, so all four connect
        assert_eq!(overlap_groups(&boxes), vec![vec![0, 1, 2, 3]]);
    }
}
