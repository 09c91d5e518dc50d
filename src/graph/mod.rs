//! Chart structure: person nodes, reporting edges and the lookup tables over them.
//!
//! Snapshots are plain data and never change in place; every edit intent
//! produces a new [`OrgSnapshot`]. The [`HierarchyIndex`] is rebuilt from a
//! snapshot on demand and stores the topology in petgraph's StableGraph.

mod edge;
mod index;
mod node;
mod snapshot;

pub use edge::{OrgEdge, edge_id};
pub use index::{HierarchyIndex, HierarchyWarning};
pub use node::{NEW_POSITION_TITLE, NodeEdit, NodeStatus, OrgNode, Point};
pub use snapshot::{MutationError, OrgSnapshot, new_position_id};
