//! Leaf clusters: childless siblings packed into one grid box.
//!
//! Wide flat teams would otherwise spread across the whole chart. Visible
//! nodes without visible reports are grouped by their honored manager; each
//! group of two or more becomes a `rows × columns` grid that the layerer
//! treats as a single box.

use crate::graph::{HierarchyIndex, Point};
use crate::view::Visibility;

use super::{LayoutConfig, Size};

/// A grid of leaf nodes under one manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCluster {
    /// Slot of the shared manager.
    pub parent: usize,
    /// Member slots in first-appearance order, filled row-major.
    pub members: Vec<usize>,
    pub columns: usize,
}

impl LeafCluster {
    pub fn rows(&self) -> usize {
        self.members.len().div_ceil(self.columns)
    }

    /// Outer size of the grid.
    pub fn size(&self, config: &LayoutConfig) -> Size {
        let cols = self.columns as f64;
        let rows = self.rows() as f64;
        Size::new(
            cols * config.node_width + (cols - 1.0) * config.leaf_gutter,
            rows * config.node_height + (rows - 1.0) * config.leaf_gutter,
        )
    }

    /// Grid cell `(row, column)` of the i-th member.
    #[inline]
    pub fn cell(&self, i: usize) -> (usize, usize) {
        (i / self.columns, i % self.columns)
    }

    /// Top-left corner of the i-th member given the grid's top-left corner.
    pub fn member_position(&self, i: usize, origin: Point, config: &LayoutConfig) -> Point {
        let (row, col) = self.cell(i);
        origin.offset(
            col as f64 * (config.node_width + config.leaf_gutter),
            row as f64 * (config.node_height + config.leaf_gutter),
        )
    }
}

/// Group visible leaves by their visible honored manager.
pub fn cluster_leaves(
    index: &HierarchyIndex,
    visibility: &Visibility,
    leaf_columns: u32,
) -> Vec<LeafCluster> {
    let n = index.len();
    let max_columns = leaf_columns.max(1) as usize;

    let mut group_of_parent: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();

    for slot in 0..n {
        if !visibility.is_visible(slot) {
            continue;
        }
        let Some(parent) = index.parent_slot(slot) else {
            continue;
        };
        if !visibility.is_visible(parent) {
            continue;
        }
        let is_leaf = index
            .tree_children_of(slot)
            .iter()
            .all(|&c| !visibility.is_visible(c));
        if !is_leaf {
            continue;
        }

        match group_of_parent[parent] {
            Some(g) => groups[g].1.push(slot),
            None => {
                group_of_parent[parent] = Some(groups.len());
                groups.push((parent, vec![slot]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(parent, members)| LeafCluster {
            parent,
            columns: max_columns.min(members.len()),
            members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{OrgEdge, OrgNode};
    use crate::view::{SessionOptions, ViewState, resolve_visibility};

    fn star(leaves: usize) -> (Vec<OrgNode>, Vec<OrgEdge>) {
        let mut nodes = vec![OrgNode::new("boss", "Manager")];
        let mut edges = Vec::new();
        for i in 0..leaves {
            let id = format!("leaf{i}");
            nodes.push(OrgNode::new(id.clone(), "Engineer"));
            edges.push(OrgEdge::between("boss", id));
        }
        (nodes, edges)
    }

    fn clusters(nodes: &[OrgNode], edges: &[OrgEdge], columns: u32) -> Vec<LeafCluster> {
        let index = HierarchyIndex::build(nodes, edges);
        let vis = resolve_visibility(
            &index,
            &index.slot_nodes(nodes),
            edges,
            &ViewState::default(),
            &SessionOptions::default(),
        );
        cluster_leaves(&index, &vis, columns)
    }

    #[test]
    fn test_five_leaves_two_columns() {
        let (nodes, edges) = star(5);
        let found = clusters(&nodes, &edges, 2);

        assert_eq!(found.len(), 1);
        let cluster = &found[0];
        assert_eq!(cluster.parent, 0);
        assert_eq!(cluster.members, vec![1, 2, 3, 4, 5]);
        assert_eq!(cluster.columns, 2);
        assert_eq!(cluster.rows(), 3);
        assert_eq!(cluster.cell(4), (2, 0), "fifth leaf opens row three");

        let size = cluster.size(&LayoutConfig::default());
        assert_eq!(size, Size::new(2.0 * 240.0 + 50.0, 3.0 * 150.0 + 2.0 * 50.0));
    }

    #[test]
    fn test_columns_capped_by_member_count() {
        let (nodes, edges) = star(3);
        let found = clusters(&nodes, &edges, 5);
        assert_eq!(found[0].columns, 3);
        assert_eq!(found[0].rows(), 1);
    }

    #[test]
    fn test_single_leaf_is_not_clustered() {
        let (nodes, edges) = star(1);
        assert!(clusters(&nodes, &edges, 2).is_empty());
    }

    #[test]
    fn test_managers_are_not_leaves() {
        let (mut nodes, mut edges) = star(2);
        nodes.push(OrgNode::new("sub", "Engineer"));
        edges.push(OrgEdge::between("leaf0", "sub"));
        let found = clusters(&nodes, &edges, 2);
        // leaf0 now manages someone, leaving leaf1 alone under boss.
        assert!(found.iter().all(|c| c.parent != 0));
    }

    #[test]
    fn test_member_position_row_major() {
        let cluster = LeafCluster {
            parent: 0,
            members: vec![1, 2, 3],
            columns: 2,
        };
        let config = LayoutConfig::default();
        let origin = Point::new(10.0, 20.0);
        assert_eq!(cluster.member_position(0, origin, &config), Point::new(10.0, 20.0));
        assert_eq!(cluster.member_position(1, origin, &config), Point::new(300.0, 20.0));
        assert_eq!(cluster.member_position(2, origin, &config), Point::new(10.0, 220.0));
    }
}
