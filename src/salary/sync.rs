//! Band propagation.
//!
//! Auto-calculated bands take their midpoint and spread from a neighbor: a
//! child from its parent via [`next_midpoint`], a parent from its child via
//! [`previous_midpoint`]. Propagation is a breadth-first walk from a manual
//! band that stops at other manual bands and never revisits a band, so the
//! leading band wins every auto band it can reach.

use std::collections::{HashMap, VecDeque};

use log::warn;

use super::bands::{SalaryBand, next_midpoint, previous_midpoint};

/// Parent/child lookups over a band list, by position.
struct BandLinks {
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    slot_of: HashMap<String, usize>,
}

impl BandLinks {
    fn new(bands: &[SalaryBand]) -> Self {
        let mut slot_of = HashMap::with_capacity(bands.len());
        for (slot, band) in bands.iter().enumerate() {
            slot_of.entry(band.id.clone()).or_insert(slot);
        }

        let parent: Vec<Option<usize>> = bands
            .iter()
            .map(|b| b.parent_id.as_ref().and_then(|p| slot_of.get(p).copied()))
            .collect();

        let mut children = vec![Vec::new(); bands.len()];
        for (slot, band) in bands.iter().enumerate() {
            if let Some(p) = band.parent_id.as_ref().and_then(|p| slot_of.get(p)) {
                children[*p].push(slot);
            }
        }

        Self {
            parent,
            children,
            slot_of,
        }
    }
}

/// Re-derive every auto band reachable from a manual band.
///
/// The leader's neighborhood is synced first, then each manual band not yet
/// reached syncs its own, in band order. An unknown leader skips straight to
/// the second pass.
pub fn perform_sync(bands: &[SalaryBand], leader_id: &str) -> Vec<SalaryBand> {
    let mut next = bands.to_vec();
    let links = BandLinks::new(&next);
    let mut visited = vec![false; next.len()];

    if let Some(&leader) = links.slot_of.get(leader_id) {
        sync_from(&mut next, &links, leader, &mut visited);
    }

    for slot in 0..next.len() {
        if !next[slot].is_auto_calculated && !visited[slot] {
            sync_from(&mut next, &links, slot, &mut visited);
        }
    }

    next
}

fn sync_from(bands: &mut [SalaryBand], links: &BandLinks, start: usize, visited: &mut [bool]) {
    visited[start] = true;
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let (midpoint, spread) = (bands[current].midpoint, bands[current].spread);
        if !bands[current].has_valid_spread() {
            warn!(
                "salary band {} has spread {spread} outside (0, 0.5); derived bands will be degenerate",
                bands[current].id
            );
        }

        for &child in &links.children[current] {
            if visited[child] || !bands[child].is_auto_calculated {
                continue;
            }
            bands[child].midpoint = next_midpoint(midpoint, spread);
            bands[child].spread = spread;
            visited[child] = true;
            queue.push_back(child);
        }

        if let Some(parent) = links.parent[current] {
            if !visited[parent] && bands[parent].is_auto_calculated {
                bands[parent].midpoint = previous_midpoint(midpoint, spread);
                bands[parent].spread = spread;
                visited[parent] = true;
                queue.push_back(parent);
            }
        }
    }
}
