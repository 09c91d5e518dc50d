//! View configuration and the per-node view resolvers.
//!
//! - [`state`]: persisted `ViewState` and transient `SessionOptions`
//! - [`visibility`]: depth, collapse, hidden propagation, search
//! - [`rank`]: leadership-layer tiers

pub mod rank;
pub mod state;
pub mod visibility;

pub use rank::{RankRules, assign_ranks};
pub use state::{
    FilterGroup, LeadershipLayer, NodeFilter, SessionOptions, ViewState, split_keywords,
};
pub use visibility::{NodeVisibility, SearchQuery, Visibility, resolve_visibility};
