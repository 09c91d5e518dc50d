//! View configuration passed by value into every resolve cycle.
//!
//! [`ViewState`] is persisted with the plan; [`SessionOptions`] holds the
//! transient session toggles (recruiter mode, search query). Neither is ever
//! mutated by the resolvers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default depth below which nodes start collapsed.
pub const DEFAULT_MAX_DEPTH: u32 = 3;
/// Default number of columns in a leaf cluster.
pub const DEFAULT_LEAF_COLUMNS: u32 = 2;
/// Color used when no filter or fallback applies.
pub const WHITE: &str = "#ffffff";
/// Default reporting-line color.
pub const DEFAULT_CONNECTION_COLOR: &str = "#94a3b8";
/// Default canvas color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f8fafc";

/// A keyword rule placing matching job titles on a fixed vertical tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadershipLayer {
    pub id: String,
    pub name: String,
    /// Comma-separated keywords, e.g. "Engineering Manager, Principal".
    pub identifier: String,
}

impl LeadershipLayer {
    pub fn new(id: impl Into<String>, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            id: id.into(),
            name: identifier.clone(),
            identifier,
        }
    }
}

/// A keyword rule coloring matching job titles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeFilter {
    pub id: String,
    pub name: String,
    /// Comma-separated keywords.
    pub pattern: String,
    pub color: String,
}

impl NodeFilter {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>, color: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self {
            id: id.into(),
            name: pattern.clone(),
            pattern,
            color: color.into(),
        }
    }
}

/// A named, switchable set of filters with its own fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterGroup {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub filters: Vec<NodeFilter>,
    pub fallback_color: String,
}

/// Persisted per-plan view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub max_depth: u32,
    pub leaf_columns: u32,
    /// Manual collapse overrides.
    pub collapsed_nodes: BTreeSet<String>,
    /// Manual expand overrides of the depth-based auto-collapse.
    pub expanded_nodes: BTreeSet<String>,
    pub leadership_layers: Vec<LeadershipLayer>,
    /// Scratchpad filters, evaluated before any group.
    pub node_filters: Vec<NodeFilter>,
    pub filter_groups: Vec<FilterGroup>,
    pub default_fallback_color: String,
    pub connection_color: String,
    pub background_color: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            leaf_columns: DEFAULT_LEAF_COLUMNS,
            collapsed_nodes: BTreeSet::new(),
            expanded_nodes: BTreeSet::new(),
            leadership_layers: Vec::new(),
            node_filters: Vec::new(),
            filter_groups: Vec::new(),
            default_fallback_color: WHITE.to_string(),
            connection_color: DEFAULT_CONNECTION_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

impl ViewState {
    /// Depth limit, never below 1.
    #[inline]
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.max(1)
    }

    /// Leaf cluster width, never below 1.
    #[inline]
    pub fn effective_leaf_columns(&self) -> u32 {
        self.leaf_columns.max(1)
    }

    /// Flip the displayed collapse state of `id`.
    ///
    /// `currently_collapsed` is the node's resolved `is_collapsed` flag. The
    /// id ends up in exactly one of the two override sets.
    pub fn toggle_collapse(&self, id: &str, currently_collapsed: bool) -> Self {
        let mut next = self.clone();
        if currently_collapsed {
            next.collapsed_nodes.remove(id);
            next.expanded_nodes.insert(id.to_string());
        } else {
            next.expanded_nodes.remove(id);
            next.collapsed_nodes.insert(id.to_string());
        }
        next
    }

    /// Drop overrides for ids that no longer exist.
    pub fn retain_nodes<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let live: BTreeSet<&str> = ids.into_iter().collect();
        let mut next = self.clone();
        next.collapsed_nodes.retain(|id| live.contains(id.as_str()));
        next.expanded_nodes.retain(|id| live.contains(id.as_str()));
        next
    }
}

/// Transient per-session toggles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Show only vacancies and their management chains.
    pub recruiter_mode: bool,
    pub search_query: String,
}

impl SessionOptions {
    pub fn recruiter() -> Self {
        Self {
            recruiter_mode: true,
            ..Default::default()
        }
    }

    pub fn searching(query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..Default::default()
        }
    }
}

/// Split a comma-separated keyword list into trimmed, lowercased, non-empty terms.
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let view: ViewState = serde_json::from_str(r#"{"maxDepth":5}"#).unwrap();
        assert_eq!(view.max_depth, 5);
        assert_eq!(view.leaf_columns, DEFAULT_LEAF_COLUMNS);
        assert_eq!(view.default_fallback_color, "#ffffff");
        assert_eq!(view.connection_color, "#94a3b8");
        assert!(view.collapsed_nodes.is_empty());
    }

    #[test]
    fn test_effective_limits_clamp_to_one() {
        let view = ViewState {
            max_depth: 0,
            leaf_columns: 0,
            ..Default::default()
        };
        assert_eq!(view.effective_max_depth(), 1);
        assert_eq!(view.effective_leaf_columns(), 1);
    }

    #[test]
    fn test_toggle_collapse_keeps_sets_exclusive() {
        let view = ViewState::default();

        let collapsed = view.toggle_collapse("a", false);
        assert!(collapsed.collapsed_nodes.contains("a"));
        assert!(!collapsed.expanded_nodes.contains("a"));

        let expanded = collapsed.toggle_collapse("a", true);
        assert!(!expanded.collapsed_nodes.contains("a"));
        assert!(expanded.expanded_nodes.contains("a"));

        let again = expanded.toggle_collapse("a", false);
        assert!(again.collapsed_nodes.contains("a"));
        assert!(!again.expanded_nodes.contains("a"));
    }

    #[test]
    fn test_retain_nodes() {
        let view = ViewState::default()
            .toggle_collapse("a", false)
            .toggle_collapse("b", true);
        let next = view.retain_nodes(["a"]);
        assert!(next.collapsed_nodes.contains("a"));
        assert!(next.expanded_nodes.is_empty());
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(
            split_keywords(" Chapter Lead, ,PRINCIPAL ,"),
            vec!["chapter lead".to_string(), "principal".to_string()]
        );
        assert!(split_keywords("").is_empty());
    }
}
