//! The resolve pipeline.
//!
//! [`resolve`] runs every resolver over one snapshot and assembles the
//! renderer-facing [`ResolvedChart`]. It is a pure function: the same
//! snapshot, view and options always produce the same chart, which is what
//! lets [`toggle_collapse_transition`] compare a node's position across a
//! toggle.

use log::debug;
use serde::Serialize;

use crate::color::{ColorRules, TeamColor, contrast_text_color, team_color};
use crate::graph::{HierarchyWarning, MutationError, NodeStatus, OrgSnapshot, Point};
use crate::layout::{Handles, LayoutConfig, Layerer, TeamGroupBox, compute_layout, team_group_boxes, team_groups};
use crate::view::{SessionOptions, ViewState, assign_ranks, resolve_visibility};

/// A node as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    pub id: String,
    /// Laid-out top-left corner; hidden nodes keep their stored position.
    pub position: Point,
    pub hidden: bool,
    pub depth: u32,
    pub rank: u32,
    pub status: NodeStatus,
    pub color: String,
    pub text_color: &'static str,
    pub team_color: TeamColor,
    pub is_collapsed: bool,
    pub has_children: bool,
    pub leads_to_vacancy: bool,
    pub direct_reports_count: usize,
    pub total_reports_count: usize,
    pub matches_search: bool,
}

/// A reporting line as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub hidden: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChart {
    /// One entry per distinct node id, input order.
    pub nodes: Vec<ResolvedNode>,
    /// Input order.
    pub edges: Vec<ResolvedEdge>,
    pub team_groups: Vec<TeamGroupBox>,
    pub handles: Handles,
    pub warnings: Vec<HierarchyWarning>,
}

impl ResolvedChart {
    /// Look up a resolved node by id.
    pub fn node(&self, id: &str) -> Option<&ResolvedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Resolve a snapshot into a renderable chart.
pub fn resolve(
    snapshot: &OrgSnapshot,
    view: &ViewState,
    session: &SessionOptions,
    config: &LayoutConfig,
    layerer: &dyn Layerer,
) -> ResolvedChart {
    let index = snapshot.index();
    let slot_nodes = index.slot_nodes(&snapshot.nodes);

    let visibility = resolve_visibility(&index, &slot_nodes, &snapshot.edges, view, session);
    let ranks = assign_ranks(&index, &slot_nodes, &view.leadership_layers);
    let layout = compute_layout(
        &index,
        &visibility,
        &ranks,
        view.effective_leaf_columns(),
        config,
        layerer,
    );
    let groups = team_groups(&index, &slot_nodes, &snapshot.edges);
    let boxes = team_group_boxes(&groups, &layout, config);
    let colors = ColorRules::new(view);

    let nodes: Vec<ResolvedNode> = slot_nodes
        .iter()
        .enumerate()
        .map(|(slot, node)| {
            let vis = &visibility.nodes[slot];
            let color = colors.color_for(&node.job_title).to_string();
            ResolvedNode {
                id: node.id.clone(),
                position: layout.position(slot).unwrap_or(node.position),
                hidden: vis.hidden,
                depth: vis.depth,
                rank: ranks[slot],
                status: node.status,
                text_color: contrast_text_color(&color),
                color,
                team_color: team_color(&node.team),
                is_collapsed: vis.is_collapsed,
                has_children: vis.has_children,
                leads_to_vacancy: vis.leads_to_vacancy,
                direct_reports_count: vis.direct_reports_count,
                total_reports_count: vis.total_reports_count,
                matches_search: vis.matches_search,
            }
        })
        .collect();

    let edges: Vec<ResolvedEdge> = snapshot
        .edges
        .iter()
        .zip(&visibility.edge_hidden)
        .map(|(edge, &hidden)| ResolvedEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            hidden,
        })
        .collect();

    debug!(
        "resolved chart: {} nodes ({} visible), {} edges, {} leaf clusters, {} team frames",
        nodes.len(),
        visibility.visible_count(),
        edges.len(),
        layout.clusters.len(),
        boxes.len()
    );

    ResolvedChart {
        nodes,
        edges,
        team_groups: boxes,
        handles: config.direction.handles(),
        warnings: index.warnings().to_vec(),
    }
}

/// Result of toggling one node's collapse state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapseTransition {
    pub view_state: ViewState,
    /// Position of the toggled node before the toggle.
    pub before: Point,
    /// Position of the toggled node after the toggle.
    pub after: Point,
}

impl CollapseTransition {
    /// Shift that keeps the toggled node still on screen.
    pub fn delta(&self) -> Point {
        Point::new(self.after.x - self.before.x, self.after.y - self.before.y)
    }
}

/// Toggle collapse on `id` and report where the node was and will be.
pub fn toggle_collapse_transition(
    snapshot: &OrgSnapshot,
    view: &ViewState,
    session: &SessionOptions,
    config: &LayoutConfig,
    layerer: &dyn Layerer,
    id: &str,
) -> Result<CollapseTransition, MutationError> {
    let before = resolve(snapshot, view, session, config, layerer);
    let node = before
        .node(id)
        .ok_or_else(|| MutationError::UnknownNode(id.to_string()))?;

    let view_state = view.toggle_collapse(id, node.is_collapsed);
    let after = resolve(snapshot, &view_state, session, config, layerer);
    let after_position = after.node(id).map_or(node.position, |n| n.position);

    Ok(CollapseTransition {
        before: node.position,
        after: after_position,
        view_state,
    })
}
