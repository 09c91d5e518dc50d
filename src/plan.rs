//! Persisted plan documents.
//!
//! A plan is the unit the persistence collaborator stores: the chart snapshot,
//! its view configuration and the salary job families, stamped with the time
//! of the last save. Older documents may lack `viewState` or `jobFamilies`;
//! both default on load.

use serde::{Deserialize, Serialize};

use crate::graph::{OrgEdge, OrgNode, OrgSnapshot};
use crate::salary::JobFamily;
use crate::view::ViewState;

/// Plan document (de)serialization failure.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("invalid plan document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One saved org plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDocument {
    pub name: String,
    pub nodes: Vec<OrgNode>,
    pub edges: Vec<OrgEdge>,
    /// ISO-8601 timestamp of the last save.
    pub last_updated: String,
    pub view_state: ViewState,
    pub job_families: Vec<JobFamily>,
}

impl PlanDocument {
    /// Assemble a document from the editor state.
    pub fn new(
        name: impl Into<String>,
        snapshot: &OrgSnapshot,
        view_state: &ViewState,
        job_families: &[JobFamily],
        last_updated: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            nodes: snapshot.nodes.clone(),
            edges: snapshot.edges.clone(),
            last_updated: last_updated.into(),
            view_state: view_state.clone(),
            job_families: job_families.to_vec(),
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, PlanError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The chart structure stored in this plan.
    pub fn snapshot(&self) -> OrgSnapshot {
        OrgSnapshot::new(self.nodes.clone(), self.edges.clone())
    }
}
