//! Team frames.
//!
//! Direct reports of one manager that share a team are framed together; the
//! manager joins the frame when it belongs to the same team. A frame needs at
//! least two members and is sized around whichever members are laid out.

use serde::Serialize;

use crate::graph::{HierarchyIndex, OrgEdge, OrgNode};

use super::{ChartLayout, LayoutConfig};

/// Axis-aligned rectangle in chart space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Grow the rectangle by `padding` on every side.
    pub fn inflate(self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + 2.0 * padding,
            height: self.height + 2.0 * padding,
        }
    }
}

/// Members of one team frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGroup {
    /// `team-group-<manager>-<team>`
    pub id: String,
    pub parent_id: String,
    pub team: String,
    /// Member slots: reports first (edge order), then the manager if included.
    #[serde(skip)]
    pub members: Vec<usize>,
    pub member_ids: Vec<String>,
}

/// A team frame placed around its laid-out members.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamGroupBox {
    pub id: String,
    pub team: String,
    #[serde(flatten)]
    pub bounds: Rect,
}

/// Find the team frames of a snapshot.
///
/// Managers are visited in the order they first appear as an edge source.
pub fn team_groups(index: &HierarchyIndex, slot_nodes: &[&OrgNode], edges: &[OrgEdge]) -> Vec<TeamGroup> {
    let mut seen_parent = vec![false; index.len()];
    let mut groups = Vec::new();

    for edge in edges {
        let Some(parent) = index.slot(&edge.source) else {
            continue;
        };
        if seen_parent[parent] {
            continue;
        }
        seen_parent[parent] = true;

        let mut by_team: Vec<(&str, Vec<usize>)> = Vec::new();
        for &child in index.children_of(parent) {
            let team = slot_nodes[child].team.as_str();
            if team.is_empty() {
                continue;
            }
            match by_team.iter_mut().find(|(t, _)| *t == team) {
                Some((_, members)) => members.push(child),
                None => by_team.push((team, vec![child])),
            }
        }

        let manager = slot_nodes[parent];
        for (team, mut members) in by_team {
            if manager.team == team {
                members.push(parent);
            }
            if members.len() < 2 {
                continue;
            }
            groups.push(TeamGroup {
                id: format!("team-group-{}-{}", manager.id, team),
                parent_id: manager.id.clone(),
                team: team.to_string(),
                member_ids: members.iter().map(|&m| index.id(m).to_string()).collect(),
                members,
            });
        }
    }
    groups
}

/// Frame each group around its visible members. Groups with none are dropped.
pub fn team_group_boxes(
    groups: &[TeamGroup],
    layout: &ChartLayout,
    config: &LayoutConfig,
) -> Vec<TeamGroupBox> {
    groups
        .iter()
        .filter_map(|group| {
            let placed: Vec<_> = group.members.iter().filter_map(|&m| layout.position(m)).collect();
            if placed.is_empty() {
                return None;
            }
            let min_x = placed.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let min_y = placed.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
            let max_x = placed.iter().map(|p| p.x + config.node_width).fold(f64::NEG_INFINITY, f64::max);
            let max_y = placed.iter().map(|p| p.y + config.node_height).fold(f64::NEG_INFINITY, f64::max);

            Some(TeamGroupBox {
                id: group.id.clone(),
                team: group.team.clone(),
                bounds: Rect {
                    x: min_x,
                    y: min_y,
                    width: max_x - min_x,
                    height: max_y - min_y,
                }
                .inflate(config.team_padding),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;

    fn fixture() -> (Vec<OrgNode>, Vec<OrgEdge>) {
        (
            vec![
                OrgNode::new("boss", "Manager").with_team("Core"),
                OrgNode::new("a", "Engineer").with_team("Core"),
                OrgNode::new("b", "Engineer").with_team("Web"),
                OrgNode::new("c", "Engineer").with_team("Web"),
                OrgNode::new("d", "Engineer"),
            ],
            vec![
                OrgEdge::between("boss", "a"),
                OrgEdge::between("boss", "b"),
                OrgEdge::between("boss", "c"),
                OrgEdge::between("boss", "d"),
            ],
        )
    }

    #[test]
    fn test_groups_by_team_with_manager() {
        let (nodes, edges) = fixture();
        let index = HierarchyIndex::build(&nodes, &edges);
        let groups = team_groups(&index, &index.slot_nodes(&nodes), &edges);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "team-group-boss-Core");
        assert_eq!(groups[0].member_ids, vec!["a", "boss"]);
        assert_eq!(groups[1].id, "team-group-boss-Web");
        assert_eq!(groups[1].member_ids, vec!["b", "c"]);
    }

    #[test]
    fn test_single_member_team_is_dropped() {
        let nodes = vec![
            OrgNode::new("boss", "Manager").with_team("Ops"),
            OrgNode::new("a", "Engineer").with_team("Core"),
        ];
        let edges = vec![OrgEdge::between("boss", "a")];
        let index = HierarchyIndex::build(&nodes, &edges);
        assert!(team_groups(&index, &index.slot_nodes(&nodes), &edges).is_empty());
    }

    #[test]
    fn test_box_spans_visible_members_with_padding() {
        let (nodes, edges) = fixture();
        let index = HierarchyIndex::build(&nodes, &edges);
        let groups = team_groups(&index, &index.slot_nodes(&nodes), &edges);

        let mut positions = vec![None; nodes.len()];
        positions[2] = Some(Point::new(0.0, 200.0));
        positions[3] = Some(Point::new(290.0, 200.0));
        let layout = ChartLayout {
            positions,
            ..Default::default()
        };

        let boxes = team_group_boxes(&groups, &layout, &LayoutConfig::default());
        assert_eq!(boxes.len(), 1, "the Core group has no visible member");
        assert_eq!(boxes[0].id, "team-group-boss-Web");
        assert_eq!(
            boxes[0].bounds,
            Rect {
                x: -20.0,
                y: 180.0,
                width: 530.0 + 40.0,
                height: 150.0 + 40.0,
            }
        );
    }
}
