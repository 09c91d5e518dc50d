//! Depth, collapse and visibility resolution.
//!
//! The resolver walks the honored-parent tree top-down from every root,
//! carrying `(depth, hidden_by_ancestor)`. Nodes no root reaches (members of a
//! pure cycle and their subtrees) are entered afterwards as pseudo-roots in
//! slot order, so every node receives a depth.
//!
//! A node's children are hidden when the node is hidden or collapsed. The
//! collapse rule is the manual override sets on top of the depth limit, with
//! recruiter mode forcing vacancy chains open and everything else shut.

use serde::Serialize;

use crate::graph::{HierarchyIndex, OrgEdge, OrgNode};

use super::state::{SessionOptions, ViewState};

/// Per-node result of the visibility pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisibility {
    /// Distance from the (pseudo-)root, starting at 1.
    pub depth: u32,
    pub hidden: bool,
    pub is_collapsed: bool,
    pub has_children: bool,
    pub leads_to_vacancy: bool,
    pub direct_reports_count: usize,
    pub total_reports_count: usize,
    pub matches_search: bool,
}

/// Visibility of a whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Visibility {
    /// Slot order.
    pub nodes: Vec<NodeVisibility>,
    /// Edge input order.
    pub edge_hidden: Vec<bool>,
}

impl Visibility {
    /// Check if the node in `slot` is shown.
    #[inline]
    pub fn is_visible(&self, slot: usize) -> bool {
        !self.nodes[slot].hidden
    }

    /// Number of shown nodes.
    pub fn visible_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.hidden).count()
    }
}

/// Lowercased search tokens. Empty when search is inactive.
pub struct SearchQuery {
    tokens: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        Self {
            tokens: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Every token must appear in one of the searchable fields.
    pub fn matches(&self, node: &OrgNode) -> bool {
        if !self.is_active() {
            return false;
        }
        let mut fields = vec![
            node.first_name.to_lowercase(),
            node.last_name.to_lowercase(),
            node.job_title.to_lowercase(),
            node.team.to_lowercase(),
        ];
        if node.is_vacancy() {
            fields.push("empty".to_string());
        }
        self.tokens
            .iter()
            .all(|token| fields.iter().any(|f| f.contains(token.as_str())))
    }
}

/// Resolve depth, visibility, collapse flags and report counts.
pub fn resolve_visibility(
    index: &HierarchyIndex,
    slot_nodes: &[&OrgNode],
    edges: &[OrgEdge],
    view: &ViewState,
    session: &SessionOptions,
) -> Visibility {
    let n = index.len();
    let max_depth = view.effective_max_depth();
    let search = SearchQuery::parse(&session.search_query);

    let leads_to_vacancy = vacancy_ancestors(index, slot_nodes);

    let mut out: Vec<NodeVisibility> = (0..n)
        .map(|slot| NodeVisibility {
            has_children: !index.children_of(slot).is_empty(),
            leads_to_vacancy: leads_to_vacancy[slot],
            direct_reports_count: index.children_of(slot).len(),
            total_reports_count: index.descendant_count(slot),
            matches_search: search.matches(slot_nodes[slot]),
            ..Default::default()
        })
        .collect();

    let collapse_rule = |slot: usize, depth: u32| -> bool {
        let id = index.id(slot);
        if session.recruiter_mode {
            if leads_to_vacancy[slot] {
                return false;
            }
            if !index.children_of(slot).is_empty() {
                return true;
            }
        }
        view.collapsed_nodes.contains(id)
            || (depth >= max_depth && !view.expanded_nodes.contains(id))
    };

    let mut visited = vec![false; n];
    let entries: Vec<usize> = index.root_slots().iter().copied().chain(0..n).collect();

    for entry in entries {
        if visited[entry] {
            continue;
        }
        visited[entry] = true;
        let mut stack: Vec<(usize, u32, bool)> = vec![(entry, 1, false)];

        while let Some((slot, depth, hidden_by_ancestor)) = stack.pop() {
            let pruned = session.recruiter_mode
                && !slot_nodes[slot].is_vacancy()
                && !leads_to_vacancy[slot];
            let hidden = hidden_by_ancestor || pruned;
            let collapsed = collapse_rule(slot, depth);

            let node = &mut out[slot];
            node.depth = depth;
            node.hidden = hidden;
            node.is_collapsed = collapsed;

            let children_hidden = hidden || collapsed;
            // Reverse push keeps pre-order in edge order.
            for &child in index.tree_children_of(slot).iter().rev() {
                if !visited[child] {
                    visited[child] = true;
                    stack.push((child, depth + 1, children_hidden));
                }
            }
        }
    }

    let edge_hidden = edges
        .iter()
        .map(|edge| match (index.slot(&edge.source), index.slot(&edge.target)) {
            (Some(s), Some(t)) => out[s].hidden || out[t].hidden,
            _ => true,
        })
        .collect();

    Visibility {
        nodes: out,
        edge_hidden,
    }
}

/// Mark every node with a vacancy somewhere below it.
///
/// Walks upward from each vacancy over all reporting lines. A node already
/// marked had its own ancestors marked when it was reached, so the walk stops
/// there. The vacancy itself is only marked when another vacancy sits below it.
fn vacancy_ancestors(index: &HierarchyIndex, slot_nodes: &[&OrgNode]) -> Vec<bool> {
    let n = index.len();
    let mut marked = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();

    for vacancy in (0..n).filter(|&slot| slot_nodes[slot].is_vacancy()) {
        stack.extend_from_slice(index.parents_of(vacancy));
        while let Some(v) = stack.pop() {
            if v == vacancy || marked[v] {
                continue;
            }
            marked[v] = true;
            stack.extend_from_slice(index.parents_of(v));
        }
    }

    marked
}
