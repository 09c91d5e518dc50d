//! Reporting edge type.
//!
//! An edge states that `source` is the direct manager of `target`.

use serde::{Deserialize, Serialize};

/// A reporting line between two positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl OrgEdge {
    /// Create an edge with an explicit id.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Create an edge with the conventional `e-<source>-<target>` id.
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
        }
    }

    /// Check if the edge touches the given node.
    #[inline]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Conventional edge id for a manager/report pair.
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{source}-{target}")
}
