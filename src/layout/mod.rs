//! Chart layout.
//!
//! This module turns the visible part of the hierarchy into top-left box
//! positions. The pipeline is:
//! 1. [`leaf_cluster`]: childless siblings are packed into grid clusters
//! 2. a [`Layerer`] places ordinary nodes and clusters on rank-constrained
//!    layers ([`dagre::DagreLayout`], backed by `dugong`, is the bundled implementation)
//! 3. clusters expand back into individual grid cells
//!
//! [`team_groups`] computes the team frames drawn around laid-out members.

pub mod dagre;
pub mod leaf_cluster;
pub mod team_groups;

use serde::{Deserialize, Serialize};

use crate::graph::{HierarchyIndex, Point};
use crate::view::Visibility;

pub use dagre::DagreLayout;
pub use leaf_cluster::{LeafCluster, cluster_leaves};
pub use team_groups::{Rect, TeamGroup, TeamGroupBox, team_group_boxes, team_groups};

/// Flow direction of reporting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Managers above reports.
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    /// Managers left of reports.
    #[serde(rename = "LR")]
    LeftRight,
}

/// Side of a card an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
}

/// Edge anchor hints for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handles {
    /// Where the incoming (manager) edge attaches.
    pub target: HandleSide,
    /// Where outgoing (report) edges attach.
    pub source: HandleSide,
}

impl LayoutDirection {
    pub fn handles(self) -> Handles {
        match self {
            LayoutDirection::TopBottom => Handles {
                target: HandleSide::Top,
                source: HandleSide::Bottom,
            },
            LayoutDirection::LeftRight => Handles {
                target: HandleSide::Left,
                source: HandleSide::Right,
            },
        }
    }
}

/// Configuration for the chart layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Card width.
    pub node_width: f64,
    /// Card height.
    pub node_height: f64,
    /// Gap between cells of a leaf cluster.
    pub leaf_gutter: f64,
    /// Gap between consecutive layers.
    pub rank_separation: f64,
    /// Minimum gap between neighbors on one layer.
    pub node_separation: f64,
    /// Margin of a team frame around its members.
    pub team_padding: f64,
    pub direction: LayoutDirection,
    /// Minimum gap next to an edge's routing points on one layer.
    pub edge_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 240.0,
            node_height: 150.0,
            leaf_gutter: 50.0,
            rank_separation: 50.0,
            node_separation: 50.0,
            team_padding: 20.0,
            direction: LayoutDirection::TopBottom,
            edge_separation: 20.0,
        }
    }
}

/// Width and height of a box to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A directed edge of the graph handed to a [`Layerer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEdge {
    pub source: usize,
    pub target: usize,
    /// Minimum number of layers between source and target.
    pub minlen: u32,
}

/// Boxes and rank constraints to be laid out.
#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    pub nodes: Vec<Size>,
    pub edges: Vec<LayerEdge>,
}

/// A layered graph drawing algorithm.
///
/// Implementations return one center point per input node, in input order.
/// Identical input must produce identical output.
pub trait Layerer {
    fn layerize(&self, graph: &LayerGraph, config: &LayoutConfig) -> Vec<Point>;
}

/// Positions of the visible nodes of one chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLayout {
    /// Top-left corner per slot; `None` for hidden nodes.
    pub positions: Vec<Option<Point>>,
    pub clusters: Vec<LeafCluster>,
    pub handles: Option<Handles>,
}

impl ChartLayout {
    /// Laid-out top-left corner of a slot.
    #[inline]
    pub fn position(&self, slot: usize) -> Option<Point> {
        self.positions.get(slot).copied().flatten()
    }
}

/// A box in the reduced graph: one ordinary node or one leaf cluster.
#[derive(Debug, Clone, Copy)]
enum Unit {
    Node(usize),
    Cluster(usize),
}

/// Lay out the visible part of the hierarchy.
///
/// Only honored-parent edges between visible nodes shape the layout. Each
/// edge asks for `max(1, rank(report) - rank(manager))` layers; the edge into
/// a leaf cluster takes the largest request among its members.
pub fn compute_layout(
    index: &HierarchyIndex,
    visibility: &Visibility,
    ranks: &[u32],
    leaf_columns: u32,
    config: &LayoutConfig,
    layerer: &dyn Layerer,
) -> ChartLayout {
    let n = index.len();
    let clusters = cluster_leaves(index, visibility, leaf_columns);

    let mut cluster_of: Vec<Option<usize>> = vec![None; n];
    for (c, cluster) in clusters.iter().enumerate() {
        for &member in &cluster.members {
            cluster_of[member] = Some(c);
        }
    }

    // Units in slot order of their first member.
    let mut units: Vec<Unit> = Vec::new();
    let mut unit_of: Vec<usize> = vec![usize::MAX; n];
    let mut cluster_unit: Vec<Option<usize>> = vec![None; clusters.len()];
    let mut graph = LayerGraph::default();

    for slot in (0..n).filter(|&s| visibility.is_visible(s)) {
        let unit = match cluster_of[slot] {
            Some(c) => match cluster_unit[c] {
                Some(u) => u,
                None => {
                    let u = units.len();
                    units.push(Unit::Cluster(c));
                    graph.nodes.push(clusters[c].size(config));
                    cluster_unit[c] = Some(u);
                    u
                }
            },
            None => {
                units.push(Unit::Node(slot));
                graph.nodes.push(Size::new(config.node_width, config.node_height));
                units.len() - 1
            }
        };
        unit_of[slot] = unit;
    }

    let mut cluster_edge: Vec<Option<usize>> = vec![None; clusters.len()];
    for parent in (0..n).filter(|&s| visibility.is_visible(s)) {
        for &child in index.tree_children_of(parent) {
            if !visibility.is_visible(child) {
                continue;
            }
            let wanted = i64::from(ranks[child]) - i64::from(ranks[parent]);
            let minlen = wanted.max(1) as u32;

            if let Some(c) = cluster_of[child] {
                if let Some(e) = cluster_edge[c] {
                    let edge: &mut LayerEdge = &mut graph.edges[e];
                    edge.minlen = edge.minlen.max(minlen);
                    continue;
                }
                cluster_edge[c] = Some(graph.edges.len());
            }
            graph.edges.push(LayerEdge {
                source: unit_of[parent],
                target: unit_of[child],
                minlen,
            });
        }
    }

    let centers = layerer.layerize(&graph, config);

    let mut positions: Vec<Option<Point>> = vec![None; n];
    for (u, unit) in units.iter().enumerate() {
        let center = centers.get(u).copied().unwrap_or_default();
        let size = graph.nodes[u];
        let origin = center.offset(-size.width / 2.0, -size.height / 2.0);
        match *unit {
            Unit::Node(slot) => positions[slot] = Some(origin),
            Unit::Cluster(c) => {
                let cluster = &clusters[c];
                for (i, &member) in cluster.members.iter().enumerate() {
                    positions[member] = Some(cluster.member_position(i, origin, config));
                }
            }
        }
    }

    ChartLayout {
        positions,
        clusters,
        handles: Some(config.direction.handles()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{OrgEdge, OrgNode};
    use crate::view::{LeadershipLayer, SessionOptions, ViewState, assign_ranks, resolve_visibility};

    struct Chart {
        nodes: Vec<OrgNode>,
        edges: Vec<OrgEdge>,
    }

    impl Chart {
        fn layout(&self, view: &ViewState) -> (HierarchyIndex, ChartLayout) {
            let index = HierarchyIndex::build(&self.nodes, &self.edges);
            let slot_nodes = index.slot_nodes(&self.nodes);
            let vis = resolve_visibility(&index, &slot_nodes, &self.edges, view, &SessionOptions::default());
            let ranks = assign_ranks(&index, &slot_nodes, &view.leadership_layers);
            let layout = compute_layout(
                &index,
                &vis,
                &ranks,
                view.effective_leaf_columns(),
                &LayoutConfig::default(),
                &DagreLayout,
            );
            (index, layout)
        }
    }

    fn pos(index: &HierarchyIndex, layout: &ChartLayout, id: &str) -> Point {
        index
            .slot(id)
            .and_then(|s| layout.position(s))
            .unwrap_or_else(|| panic!("{id} should be laid out"))
    }

    #[test]
    fn test_leaf_cluster_grid() {
        let mut nodes = vec![OrgNode::new("boss", "Manager")];
        let mut edges = Vec::new();
        for i in 0..5 {
            nodes.push(OrgNode::new(format!("l{i}"), "Engineer"));
            edges.push(OrgEdge::between("boss", format!("l{i}")));
        }
        let chart = Chart { nodes, edges };
        let (index, layout) = chart.layout(&ViewState::default());

        let boss = pos(&index, &layout, "boss");
        let cells: Vec<Point> = (0..5).map(|i| pos(&index, &layout, &format!("l{i}"))).collect();

        assert_eq!(cells[0].y, boss.y + 150.0 + 50.0, "cluster starts one layer down");
        assert_eq!(cells[1].x, cells[0].x + 290.0);
        assert_eq!(cells[1].y, cells[0].y);
        assert_eq!(cells[2].y, cells[0].y + 200.0);
        assert_eq!(cells[4].x, cells[0].x, "fifth leaf sits in the first column");
        assert_eq!(cells[4].y, cells[0].y + 400.0);
        assert!(
            cells.iter().all(|c| c.x != cells[0].x + 290.0 || c.y != cells[4].y),
            "second column of the last row stays empty"
        );
        assert_eq!(layout.clusters.len(), 1);
    }

    #[test]
    fn test_short_cluster_row_is_centered_under_manager() {
        let chart = Chart {
            nodes: vec![
                OrgNode::new("boss", "Manager"),
                OrgNode::new("a", "Engineer"),
                OrgNode::new("b", "Engineer"),
            ],
            edges: vec![OrgEdge::between("boss", "a"), OrgEdge::between("boss", "b")],
        };
        let view = ViewState {
            leaf_columns: 4,
            ..Default::default()
        };
        let (index, layout) = chart.layout(&view);

        assert_eq!(layout.clusters[0].columns, 2, "two leaves make a two-wide row");
        let boss = pos(&index, &layout, "boss");
        let a = pos(&index, &layout, "a");
        let b = pos(&index, &layout, "b");
        assert_eq!(a.y, b.y);
        let row_center = (a.x + b.x + 240.0) / 2.0;
        assert!((row_center - (boss.x + 120.0)).abs() < 1e-6);
    }

    #[test]
    fn test_rank_forces_tiers() {
        // Every manager gets one report so nothing is clustered.
        let mut nodes = vec![
            OrgNode::new("ceo", "CEO"),
            OrgNode::new("em", "Engineering Manager"),
            OrgNode::new("eng", "Staff Engineer"),
            OrgNode::new("lead", "Chapter Lead"),
        ];
        let mut edges = vec![
            OrgEdge::between("ceo", "em"),
            OrgEdge::between("ceo", "eng"),
            OrgEdge::between("ceo", "lead"),
        ];
        for manager in ["em", "eng", "lead"] {
            let report = format!("{manager}-report");
            nodes.push(OrgNode::new(report.clone(), "Analyst"));
            edges.push(OrgEdge::between(manager, report));
        }
        let chart = Chart { nodes, edges };
        let view = ViewState {
            leadership_layers: vec![
                LeadershipLayer::new("l1", "Chapter Lead"),
                LeadershipLayer::new("l2", "Engineering Manager"),
            ],
            ..Default::default()
        };
        let (index, layout) = chart.layout(&view);
        assert!(layout.clusters.is_empty());

        let ceo = pos(&index, &layout, "ceo");
        let lead = pos(&index, &layout, "lead");
        let em = pos(&index, &layout, "em");
        let eng = pos(&index, &layout, "eng");
        assert!(ceo.y < lead.y);
        assert!(lead.y < em.y, "layer one sits above layer two");
        assert!(em.y < eng.y, "unmatched titles sit below every layer");
        assert!(pos(&index, &layout, "eng-report").y > eng.y);
    }

    #[test]
    fn test_hidden_nodes_are_not_positioned() {
        let chart = Chart {
            nodes: vec![OrgNode::new("a", "Role"), OrgNode::new("b", "Role")],
            edges: vec![OrgEdge::between("a", "b")],
        };
        let view = ViewState::default().toggle_collapse("a", false);
        let (index, layout) = chart.layout(&view);
        assert!(layout.position(index.slot("a").unwrap()).is_some());
        assert!(layout.position(index.slot("b").unwrap()).is_none());
        assert_eq!(layout.handles, Some(LayoutDirection::TopBottom.handles()));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let chart = Chart {
            nodes: (0..12).map(|i| OrgNode::new(format!("n{i}"), "Role")).collect(),
            edges: (1..12)
                .map(|i| OrgEdge::between(format!("n{}", (i - 1) / 3), format!("n{i}")))
                .collect(),
        };
        let view = ViewState {
            max_depth: 10,
            ..Default::default()
        };
        assert_eq!(chart.layout(&view).1, chart.layout(&view).1);
    }

    #[test]
    fn test_empty_chart() {
        let chart = Chart {
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        let (_, layout) = chart.layout(&ViewState::default());
        assert!(layout.positions.is_empty());
    }
}
