//! Immutable `(nodes, edges)` snapshots and the edit intents applied to them.
//!
//! Every mutation borrows the current snapshot and returns the next one;
//! nothing is edited in place. Rejected intents return a [`MutationError`]
//! and leave the caller holding the unchanged snapshot.

use serde::{Deserialize, Serialize};

use super::edge::OrgEdge;
use super::index::HierarchyIndex;
use super::node::{NEW_POSITION_TITLE, NodeEdit, NodeStatus, OrgNode, Point};

/// Vertical offset of a freshly added report below its manager.
const NEW_REPORT_OFFSET_Y: f64 = 200.0;

/// Reasons a snapshot mutation is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("unknown edge: {0}")]
    UnknownEdge(String),
    #[error("node already exists: {0}")]
    DuplicateNode(String),
    #[error("node {0} cannot report to itself")]
    SelfReport(String),
    #[error("{report} cannot report to {manager} because {manager} is in its reporting chain")]
    WouldCreateCycle { manager: String, report: String },
}

/// One version of the chart's structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgSnapshot {
    pub nodes: Vec<OrgNode>,
    pub edges: Vec<OrgEdge>,
}

impl OrgSnapshot {
    /// Create a snapshot from nodes and edges.
    pub fn new(nodes: Vec<OrgNode>, edges: Vec<OrgEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&OrgNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&OrgEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Build the hierarchy index for this snapshot.
    pub fn index(&self) -> HierarchyIndex {
        HierarchyIndex::build(&self.nodes, &self.edges)
    }

    /// Apply an edit to one node.
    pub fn edit_node(&self, id: &str, edit: &NodeEdit) -> Result<Self, MutationError> {
        if self.node(id).is_none() {
            return Err(MutationError::UnknownNode(id.to_string()));
        }
        let nodes = self
            .nodes
            .iter()
            .map(|n| if n.id == id { edit.apply(n) } else { n.clone() })
            .collect();
        Ok(Self::new(nodes, self.edges.clone()))
    }

    /// Add a vacancy reporting to `parent_id`.
    ///
    /// The new position inherits the manager's team and is placed below it.
    pub fn add_subordinate(&self, parent_id: &str, new_id: &str) -> Result<Self, MutationError> {
        let parent = self
            .node(parent_id)
            .ok_or_else(|| MutationError::UnknownNode(parent_id.to_string()))?;
        if self.node(new_id).is_some() {
            return Err(MutationError::DuplicateNode(new_id.to_string()));
        }

        let child = OrgNode {
            id: new_id.to_string(),
            status: NodeStatus::Empty,
            job_title: NEW_POSITION_TITLE.to_string(),
            team: parent.team.clone(),
            position: parent.position.offset(0.0, NEW_REPORT_OFFSET_Y),
            ..Default::default()
        };

        let mut nodes = self.nodes.clone();
        nodes.push(child);
        let mut edges = self.edges.clone();
        edges.push(OrgEdge::between(parent_id, new_id));
        Ok(Self::new(nodes, edges))
    }

    /// Remove a node and every edge touching it.
    ///
    /// Former reports become roots; their own subtrees stay intact.
    pub fn delete_node(&self, id: &str) -> Result<Self, MutationError> {
        if self.node(id).is_none() {
            return Err(MutationError::UnknownNode(id.to_string()));
        }
        let nodes = self.nodes.iter().filter(|n| n.id != id).cloned().collect();
        let edges = self.edges.iter().filter(|e| !e.touches(id)).cloned().collect();
        Ok(Self::new(nodes, edges))
    }

    /// Point an existing edge at a new manager.
    pub fn reconnect_edge(&self, id: &str, new_source: &str) -> Result<Self, MutationError> {
        let edge = self
            .edge(id)
            .ok_or_else(|| MutationError::UnknownEdge(id.to_string()))?;
        let target = edge.target.clone();
        self.check_new_manager(new_source, &target)?;

        let edges = self
            .edges
            .iter()
            .map(|e| {
                if e.id == id {
                    OrgEdge::between(new_source, target.clone())
                } else {
                    e.clone()
                }
            })
            .collect();
        Ok(Self::new(self.nodes.clone(), edges))
    }

    /// Make `source` the only manager of `target`.
    pub fn connect(&self, source: &str, target: &str) -> Result<Self, MutationError> {
        self.check_new_manager(source, target)?;
        let mut edges: Vec<OrgEdge> = self
            .edges
            .iter()
            .filter(|e| e.target != target)
            .cloned()
            .collect();
        edges.push(OrgEdge::between(source, target));
        Ok(Self::new(self.nodes.clone(), edges))
    }

    /// Reposition a node (drag end). Unknown ids are ignored.
    pub fn move_node(&self, id: &str, position: Point) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                if n.id == id {
                    OrgNode { position, ..n.clone() }
                } else {
                    n.clone()
                }
            })
            .collect();
        Self::new(nodes, self.edges.clone())
    }

    fn check_new_manager(&self, source: &str, target: &str) -> Result<(), MutationError> {
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(MutationError::UnknownNode(id.to_string()));
            }
        }
        if source == target {
            return Err(MutationError::SelfReport(target.to_string()));
        }
        if self.index().reaches(target, source) {
            return Err(MutationError::WouldCreateCycle {
                manager: source.to_string(),
                report: target.to_string(),
            });
        }
        Ok(())
    }
}

/// Id for a position added interactively at `millis` since the epoch.
pub fn new_position_id(millis: f64) -> String {
    format!("empty-{}", millis.trunc() as i64)
}
