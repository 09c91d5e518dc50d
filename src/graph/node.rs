//! Person node type and related structures.
//!
//! A node is one position in the organization. Each node has:
//! - A stable unique identifier (work email, synthetic import key, or a
//!   time-based key for interactively added positions)
//! - A staffing status (filled or vacant)
//! - Person and position details shown on the card
//! - A stored position (x, y) in chart space

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title given to positions created through "add subordinate".
pub const NEW_POSITION_TITLE: &str = "New Position";

/// Staffing status of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeStatus {
    /// The position is held by a person.
    #[default]
    Filled,
    /// The position is a vacancy.
    Empty,
}

impl NodeStatus {
    /// Check if the position is a vacancy.
    #[inline]
    pub fn is_vacancy(self) -> bool {
        matches!(self, NodeStatus::Empty)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Filled => f.write_str("FILLED"),
            NodeStatus::Empty => f.write_str("EMPTY"),
        }
    }
}

/// A point in chart space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate the point by an offset.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One position in the organization chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgNode {
    pub id: String,
    pub status: NodeStatus,
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub team: String,
    pub work_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probation_end_date: Option<String>,
    /// Optional link into a job family's salary bands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_band_id: Option<String>,
    pub position: Point,
}

impl OrgNode {
    /// Create a filled position with the given id and title.
    pub fn new(id: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_title: job_title.into(),
            ..Default::default()
        }
    }

    /// Create a vacant position with the given id and title.
    pub fn vacancy(id: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            status: NodeStatus::Empty,
            ..Self::new(id, job_title)
        }
    }

    /// Builder-style team assignment.
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    /// Builder-style name assignment.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Check if the position is a vacancy.
    #[inline]
    pub fn is_vacancy(&self) -> bool {
        self.status.is_vacancy()
    }

    /// "LastName, FirstName", the supervisor key used by CSV import/export.
    pub fn supervisor_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Partial update applied by the edit-node intent.
///
/// `None` leaves the field unchanged. Date fields use `Some(None)` to clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeEdit {
    pub status: Option<NodeStatus>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub team: Option<String>,
    pub work_email: Option<String>,
    pub start_date: Option<Option<String>>,
    pub exit_date: Option<Option<String>>,
    pub probation_end_date: Option<Option<String>>,
    pub salary_band_id: Option<Option<String>>,
}

impl NodeEdit {
    /// Apply the edit to a copy of `node`. The id and position never change.
    pub fn apply(&self, node: &OrgNode) -> OrgNode {
        let mut next = node.clone();
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(v) = &self.first_name {
            next.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            next.last_name = v.clone();
        }
        if let Some(v) = &self.job_title {
            next.job_title = v.clone();
        }
        if let Some(v) = &self.team {
            next.team = v.clone();
        }
        if let Some(v) = &self.work_email {
            next.work_email = v.clone();
        }
        if let Some(v) = &self.start_date {
            next.start_date = v.clone();
        }
        if let Some(v) = &self.exit_date {
            next.exit_date = v.clone();
        }
        if let Some(v) = &self.probation_end_date {
            next.probation_end_date = v.clone();
        }
        if let Some(v) = &self.salary_band_id {
            next.salary_band_id = v.clone();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&NodeStatus::Empty).unwrap();
        assert_eq!(json, "\"EMPTY\"");
        let status: NodeStatus = serde_json::from_str("\"FILLED\"").unwrap();
        assert_eq!(status, NodeStatus::Filled);
        assert_eq!(format!("{}", NodeStatus::Empty), "EMPTY");
    }

    #[test]
    fn test_node_deserializes_with_missing_fields() {
        let node: OrgNode =
            serde_json::from_str(r#"{"id":"a@x.io","jobTitle":"CTO","position":{"x":1,"y":2}}"#)
                .unwrap();
        assert_eq!(node.id, "a@x.io");
        assert_eq!(node.status, NodeStatus::Filled);
        assert_eq!(node.position, Point::new(1.0, 2.0));
        assert!(node.start_date.is_none());
    }

    #[test]
    fn test_edit_keeps_identity() {
        let node = OrgNode::new("n1", "Engineer")
            .with_name("Ada", "Lovelace")
            .with_team("Core");
        let edit = NodeEdit {
            job_title: Some("Staff Engineer".into()),
            status: Some(NodeStatus::Empty),
            start_date: Some(Some("2024-01-01".into())),
            ..Default::default()
        };
        let next = edit.apply(&node);
        assert_eq!(next.id, "n1");
        assert_eq!(next.job_title, "Staff Engineer");
        assert_eq!(next.first_name, "Ada");
        assert!(next.is_vacancy());
        assert_eq!(next.start_date.as_deref(), Some("2024-01-01"));

        let clear = NodeEdit {
            start_date: Some(None),
            ..Default::default()
        };
        assert!(clear.apply(&next).start_date.is_none());
    }

    #[test]
    fn test_supervisor_name() {
        let node = OrgNode::new("n1", "CEO").with_name("Grace", "Hopper");
        assert_eq!(node.supervisor_name(), "Hopper, Grace");
    }
}
