//! Organization statistics: size, depth, span of control and filter coverage.

use std::collections::VecDeque;

use serde::Serialize;

use crate::graph::{HierarchyIndex, OrgNode};
use crate::view::{FilterGroup, split_keywords};

/// Match count of one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCount {
    pub id: String,
    pub name: String,
    pub pattern: String,
    pub color: String,
    pub count: usize,
}

/// Coverage of one filter group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroupStats {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub filter_counts: Vec<FilterCount>,
    /// Nodes matched by no filter of the group.
    pub rest_count: usize,
}

/// Summary numbers for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgStats {
    pub node_count: usize,
    /// Levels on the longest reporting chain; 0 for an empty chart.
    pub depth: usize,
    /// Fewest direct reports among managers.
    pub min_span: usize,
    /// Most direct reports among managers.
    pub max_span: usize,
    pub filter_groups: Vec<FilterGroupStats>,
}

/// Compute statistics for a snapshot.
pub fn org_stats(index: &HierarchyIndex, slot_nodes: &[&OrgNode], groups: &[FilterGroup]) -> OrgStats {
    if index.is_empty() {
        return OrgStats::default();
    }

    let spans: Vec<usize> = (0..index.len())
        .map(|slot| index.children_of(slot).len())
        .filter(|&span| span > 0)
        .collect();

    OrgStats {
        node_count: index.len(),
        depth: longest_chain(index),
        min_span: spans.iter().copied().min().unwrap_or(0),
        max_span: spans.iter().copied().max().unwrap_or(0),
        filter_groups: groups.iter().map(|g| group_stats(slot_nodes, g)).collect(),
    }
}

/// Longest root-to-node chain, counted in nodes.
///
/// Longest-path relaxation in topological order. Nodes on a cycle never
/// become ready, so they do not extend any chain.
fn longest_chain(index: &HierarchyIndex) -> usize {
    let n = index.len();
    let mut in_degree = vec![0usize; n];
    for slot in 0..n {
        for &child in index.children_of(slot) {
            in_degree[child] += 1;
        }
    }

    let mut level = vec![0usize; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&s| in_degree[s] == 0).collect();
    for &root in &queue {
        level[root] = 1;
    }

    let mut deepest = 0;
    while let Some(slot) = queue.pop_front() {
        deepest = deepest.max(level[slot]);
        for &child in index.children_of(slot) {
            level[child] = level[child].max(level[slot] + 1);
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }
    deepest
}

fn group_stats(slot_nodes: &[&OrgNode], group: &FilterGroup) -> FilterGroupStats {
    let titles: Vec<String> = slot_nodes.iter().map(|n| n.job_title.to_lowercase()).collect();
    let mut matched = vec![false; titles.len()];

    let filter_counts = group
        .filters
        .iter()
        .map(|filter| {
            let keywords = split_keywords(&filter.pattern);
            let mut count = 0;
            for (i, title) in titles.iter().enumerate() {
                if keywords.iter().any(|k| title.contains(k.as_str())) {
                    count += 1;
                    matched[i] = true;
                }
            }
            FilterCount {
                id: filter.id.clone(),
                name: filter.name.clone(),
                pattern: filter.pattern.clone(),
                color: filter.color.clone(),
                count,
            }
        })
        .collect();

    FilterGroupStats {
        id: group.id.clone(),
        name: group.name.clone(),
        enabled: group.enabled,
        filter_counts,
        rest_count: matched.iter().filter(|m| !**m).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OrgEdge;
    use crate::view::NodeFilter;

    fn stats(nodes: &[OrgNode], edges: &[OrgEdge], groups: &[FilterGroup]) -> OrgStats {
        let index = HierarchyIndex::build(nodes, edges);
        org_stats(&index, &index.slot_nodes(nodes), groups)
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(stats(&[], &[], &[]), OrgStats::default());
    }

    #[test]
    fn test_depth_and_span() {
        let nodes = vec![
            OrgNode::new("ceo", "CEO"),
            OrgNode::new("cto", "CTO"),
            OrgNode::new("cfo", "CFO"),
            OrgNode::new("dev1", "Engineer"),
            OrgNode::new("dev2", "Engineer"),
            OrgNode::new("dev3", "Engineer"),
        ];
        let edges = vec![
            OrgEdge::between("ceo", "cto"),
            OrgEdge::between("ceo", "cfo"),
            OrgEdge::between("cto", "dev1"),
            OrgEdge::between("cto", "dev2"),
            OrgEdge::between("cto", "dev3"),
        ];
        let s = stats(&nodes, &edges, &[]);
        assert_eq!(s.node_count, 6);
        assert_eq!(s.depth, 3);
        assert_eq!(s.min_span, 2);
        assert_eq!(s.max_span, 3);
    }

    #[test]
    fn test_single_node() {
        let s = stats(&[OrgNode::new("a", "Founder")], &[], &[]);
        assert_eq!(s.depth, 1);
        assert_eq!((s.min_span, s.max_span), (0, 0));
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let nodes = vec![
            OrgNode::new("root", "Role"),
            OrgNode::new("a", "Role"),
            OrgNode::new("b", "Role"),
        ];
        let edges = vec![
            OrgEdge::between("a", "b"),
            OrgEdge::between("b", "a"),
        ];
        let s = stats(&nodes, &edges, &[]);
        assert_eq!(s.node_count, 3);
        assert_eq!(s.depth, 1);
    }

    #[test]
    fn test_filter_group_counts() {
        let nodes = vec![
            OrgNode::new("a", "Senior Engineer"),
            OrgNode::new("b", "Engineer"),
            OrgNode::new("c", "Designer"),
            OrgNode::new("d", "Recruiter"),
        ];
        let group = FilterGroup {
            id: "g".into(),
            name: "Disciplines".into(),
            enabled: false,
            filters: vec![
                NodeFilter::new("eng", "engineer", "#00f"),
                NodeFilter::new("senior", "senior", "#f00"),
                NodeFilter::new("design", "design", "#0f0"),
            ],
            fallback_color: String::new(),
        };
        let s = stats(&nodes, &[], &[group]);
        let g = &s.filter_groups[0];
        let counts: Vec<usize> = g.filter_counts.iter().map(|f| f.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(g.rest_count, 1);
        assert!(!g.enabled);
    }
}
