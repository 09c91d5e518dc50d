//! Leadership-layer ranks.
//!
//! A rank is the vertical tier a node is pushed to during layout. Roots sit
//! on tier 0; every other node takes the first leadership layer whose keyword
//! appears in its job title, or the tier below all layers when none match.

use crate::graph::{HierarchyIndex, OrgNode};

use super::state::{LeadershipLayer, split_keywords};

/// Pre-split keyword lists for a set of leadership layers.
pub struct RankRules {
    layers: Vec<Vec<String>>,
}

impl RankRules {
    pub fn new(layers: &[LeadershipLayer]) -> Self {
        Self {
            layers: layers.iter().map(|l| split_keywords(&l.identifier)).collect(),
        }
    }

    /// Rank for a non-root title. First matching layer wins, by layer order.
    pub fn rank_for_title(&self, job_title: &str) -> u32 {
        let title = job_title.to_lowercase();
        self.layers
            .iter()
            .position(|keywords| keywords.iter().any(|k| title.contains(k.as_str())))
            .map_or(self.layers.len() as u32 + 1, |i| i as u32 + 1)
    }
}

/// Ranks per slot.
pub fn assign_ranks(
    index: &HierarchyIndex,
    slot_nodes: &[&OrgNode],
    layers: &[LeadershipLayer],
) -> Vec<u32> {
    let rules = RankRules::new(layers);
    slot_nodes
        .iter()
        .enumerate()
        .map(|(slot, node)| {
            if index.parent_slot(slot).is_none() {
                0
            } else {
                rules.rank_for_title(&node.job_title)
            }
        })
        .collect()
}
