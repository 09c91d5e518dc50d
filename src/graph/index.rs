//! HierarchyIndex - parent/child/descendant lookup tables.
//!
//! The index stores the reporting topology in petgraph's StableGraph and
//! keeps slot-ordered adjacency tables next to it. Slots follow node input
//! order, and every table preserves edge input order, so all consumers
//! iterate deterministically regardless of hashing.
//!
//! The index never rejects input. Malformed data is reported as
//! [`HierarchyWarning`]s:
//! - edges with a missing endpoint are ignored
//! - self-loops are ignored
//! - a node with several managers keeps only the first edge targeting it
//! - cycles are detected (strongly connected components) and traversals stop
//!   at the back-edge

use std::collections::{HashMap, VecDeque};

use log::warn;
use petgraph::Directed;
use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use serde::Serialize;

use super::edge::OrgEdge;
use super::node::OrgNode;

/// A non-fatal data quality problem found while indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HierarchyWarning {
    /// A node id appears more than once; only the first is indexed.
    #[serde(rename_all = "camelCase")]
    DuplicateNode { node_id: String },
    /// An edge references a node that does not exist.
    #[serde(rename_all = "camelCase")]
    DanglingEdge { edge_id: String },
    /// An edge points from a node to itself.
    #[serde(rename_all = "camelCase")]
    SelfLoop { edge_id: String },
    /// A node is targeted by more than one edge.
    #[serde(rename_all = "camelCase")]
    MultipleParents {
        node_id: String,
        honored_parent: String,
        ignored_edges: Vec<String>,
    },
    /// The reporting lines contain a cycle through these nodes.
    #[serde(rename_all = "camelCase")]
    Cycle { members: Vec<String> },
}

/// Lookup tables over one `(nodes, edges)` snapshot.
pub struct HierarchyIndex {
    /// Topology. Node weights are slots, edge weights are edge input positions.
    graph: StableGraph<usize, usize, Directed>,

    /// Graph index per slot
    graph_index: Vec<NodeIndex>,

    /// Node ids in input order (slot → id)
    ids: Vec<String>,

    /// id → slot
    slot_of: HashMap<String, usize>,

    /// Children through any valid edge, edge order, deduplicated
    direct_children: Vec<Vec<usize>>,

    /// Children through the honored (first) parent edge only
    tree_children: Vec<Vec<usize>>,

    /// Honored parent per slot
    parent: Vec<Option<usize>>,

    /// Parents through any valid edge, deduplicated
    direct_parents: Vec<Vec<usize>>,

    /// Number of transitive descendants per slot
    descendant_counts: Vec<usize>,

    /// Slots with no honored parent, input order
    roots: Vec<usize>,

    warnings: Vec<HierarchyWarning>,
}

impl HierarchyIndex {
    /// Build the index for a snapshot.
    pub fn build(nodes: &[OrgNode], edges: &[OrgEdge]) -> Self {
        let mut graph = StableGraph::with_capacity(nodes.len(), edges.len());
        let mut graph_index = Vec::with_capacity(nodes.len());
        let mut ids = Vec::with_capacity(nodes.len());
        let mut slot_of = HashMap::with_capacity(nodes.len());
        let mut warnings = Vec::new();

        for node in nodes {
            if slot_of.contains_key(&node.id) {
                warnings.push(HierarchyWarning::DuplicateNode {
                    node_id: node.id.clone(),
                });
                continue;
            }
            let slot = ids.len();
            slot_of.insert(node.id.clone(), slot);
            ids.push(node.id.clone());
            graph_index.push(graph.add_node(slot));
        }

        let n = ids.len();
        let mut direct_children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut direct_parents: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut extra_parents: Vec<Vec<String>> = vec![Vec::new(); n];

        for (position, edge) in edges.iter().enumerate() {
            let (Some(&source), Some(&target)) =
                (slot_of.get(&edge.source), slot_of.get(&edge.target))
            else {
                warnings.push(HierarchyWarning::DanglingEdge {
                    edge_id: edge.id.clone(),
                });
                continue;
            };
            if source == target {
                warnings.push(HierarchyWarning::SelfLoop {
                    edge_id: edge.id.clone(),
                });
                continue;
            }

            graph.add_edge(graph_index[source], graph_index[target], position);

            if !direct_children[source].contains(&target) {
                direct_children[source].push(target);
                direct_parents[target].push(source);
            }
            match parent[target] {
                None => parent[target] = Some(source),
                Some(existing) if existing != source => {
                    extra_parents[target].push(edge.id.clone());
                }
                Some(_) => {}
            }
        }

        for (slot, ignored) in extra_parents.into_iter().enumerate() {
            if ignored.is_empty() {
                continue;
            }
            if let Some(honored) = parent[slot] {
                warnings.push(HierarchyWarning::MultipleParents {
                    node_id: ids[slot].clone(),
                    honored_parent: ids[honored].clone(),
                    ignored_edges: ignored,
                });
            }
        }

        let tree_children: Vec<Vec<usize>> = direct_children
            .iter()
            .enumerate()
            .map(|(slot, children)| {
                children
                    .iter()
                    .copied()
                    .filter(|&c| parent[c] == Some(slot))
                    .collect()
            })
            .collect();

        let roots: Vec<usize> = (0..n).filter(|&slot| parent[slot].is_none()).collect();

        // Cycles: any strongly connected component with more than one member.
        let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut members: Vec<usize> =
                    component.iter().filter_map(|&ix| graph.node_weight(ix).copied()).collect();
                members.sort_unstable();
                members
            })
            .collect();
        cycles.sort();
        let mut in_cycle = vec![false; n];
        for &slot in cycles.iter().flatten() {
            in_cycle[slot] = true;
        }
        for members in cycles {
            warnings.push(HierarchyWarning::Cycle {
                members: members.into_iter().map(|slot| ids[slot].clone()).collect(),
            });
        }

        let descendant_counts = count_descendants(&direct_children, &direct_parents, &in_cycle);

        for warning in &warnings {
            warn!("hierarchy: {warning:?}");
        }

        Self {
            graph,
            graph_index,
            ids,
            slot_of,
            direct_children,
            tree_children,
            parent,
            direct_parents,
            descendant_counts,
            roots,
            warnings,
        }
    }

    // =========================================================================
    // Slot Access
    // =========================================================================

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the index holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Slot of a node id.
    pub fn slot(&self, id: &str) -> Option<usize> {
        self.slot_of.get(id).copied()
    }

    /// Node id of a slot.
    pub fn id(&self, slot: usize) -> &str {
        &self.ids[slot]
    }

    /// All indexed ids in slot order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The indexed node per slot, taken from the slice the index was built from.
    ///
    /// Later duplicates of an id are skipped, matching how slots were assigned.
    pub fn slot_nodes<'a>(&self, nodes: &'a [OrgNode]) -> Vec<&'a OrgNode> {
        let mut by_slot = Vec::with_capacity(self.len());
        for node in nodes {
            if self.slot(&node.id) == Some(by_slot.len()) {
                by_slot.push(node);
            }
        }
        by_slot
    }

    /// Children of a slot through any edge.
    pub fn children_of(&self, slot: usize) -> &[usize] {
        &self.direct_children[slot]
    }

    /// Children of a slot through their honored parent edge.
    pub fn tree_children_of(&self, slot: usize) -> &[usize] {
        &self.tree_children[slot]
    }

    /// Honored parent of a slot.
    pub fn parent_slot(&self, slot: usize) -> Option<usize> {
        self.parent[slot]
    }

    /// Parents of a slot through any edge.
    pub fn parents_of(&self, slot: usize) -> &[usize] {
        &self.direct_parents[slot]
    }

    /// Transitive descendants of a slot, breadth-first, never the slot itself.
    ///
    /// Walked on demand; only the counts are kept in the index.
    pub fn descendants_of(&self, slot: usize) -> Vec<usize> {
        let mut seen = vec![false; self.len()];
        seen[slot] = true;
        let mut out = Vec::new();
        let mut queue = VecDeque::from([slot]);
        while let Some(v) = queue.pop_front() {
            for &c in &self.direct_children[v] {
                if !seen[c] {
                    seen[c] = true;
                    out.push(c);
                    queue.push_back(c);
                }
            }
        }
        out
    }

    /// Number of transitive descendants of a slot.
    #[inline]
    pub fn descendant_count(&self, slot: usize) -> usize {
        self.descendant_counts[slot]
    }

    /// Root slots in node input order.
    pub fn root_slots(&self) -> &[usize] {
        &self.roots
    }

    // =========================================================================
    // Id Access
    // =========================================================================

    /// Direct children of a node, edge order.
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.slot(id)
            .map(|slot| self.resolve(self.children_of(slot)))
            .unwrap_or_default()
    }

    /// All descendants of a node.
    pub fn descendants(&self, id: &str) -> Vec<&str> {
        self.slot(id)
            .map(|slot| self.resolve(&self.descendants_of(slot)))
            .unwrap_or_default()
    }

    /// The honored manager of a node.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.slot(id)
            .and_then(|slot| self.parent[slot])
            .map(|p| self.id(p))
    }

    /// Root node ids.
    pub fn roots(&self) -> Vec<&str> {
        self.resolve(&self.roots)
    }

    /// Check if a node is a root.
    pub fn is_root(&self, id: &str) -> bool {
        self.slot(id).is_some_and(|slot| self.parent[slot].is_none())
    }

    /// Check if `to` is reachable from `from` through reporting lines.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        match (self.slot(from), self.slot(to)) {
            (Some(a), Some(b)) => {
                has_path_connecting(&self.graph, self.graph_index[a], self.graph_index[b], None)
            }
            _ => false,
        }
    }

    /// Data quality warnings found while indexing.
    pub fn warnings(&self) -> &[HierarchyWarning] {
        &self.warnings
    }

    fn resolve(&self, slots: &[usize]) -> Vec<&str> {
        slots.iter().map(|&slot| self.id(slot)).collect()
    }
}

/// Descendant counts without materializing descendant sets.
///
/// A slot whose reachable subgraph is a tree (no cycle, every node below it
/// has exactly one parent) sums its children's counts in post-order. Any
/// other slot, one that reaches a shared report or sits on a cycle, is
/// counted with its own breadth-first walk over a reused stamp array.
fn count_descendants(
    children: &[Vec<usize>],
    parents: &[Vec<usize>],
    in_cycle: &[bool],
) -> Vec<usize> {
    const UNVISITED: u8 = 0;
    const ACTIVE: u8 = 1;
    const DONE: u8 = 2;

    let n = children.len();
    let mut state = vec![UNVISITED; n];
    let mut tree_like = vec![false; n];
    let mut counts = vec![0usize; n];
    let mut shared: Vec<usize> = Vec::new();

    for start in 0..n {
        if state[start] != UNVISITED {
            continue;
        }
        state[start] = ACTIVE;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(top) = stack.last_mut() {
            let v = top.0;
            if top.1 < children[v].len() {
                let c = children[v][top.1];
                top.1 += 1;
                if state[c] == UNVISITED {
                    state[c] = ACTIVE;
                    stack.push((c, 0));
                }
                continue;
            }

            stack.pop();
            state[v] = DONE;
            let tree = !in_cycle[v]
                && children[v]
                    .iter()
                    .all(|&c| parents[c].len() == 1 && tree_like[c]);
            if tree {
                tree_like[v] = true;
                counts[v] = children[v].iter().map(|&c| counts[c] + 1).sum();
            } else {
                shared.push(v);
            }
        }
    }

    let mut stamp = vec![usize::MAX; n];
    let mut queue = VecDeque::new();
    for v in shared {
        stamp[v] = v;
        queue.push_back(v);
        let mut count = 0;
        while let Some(u) = queue.pop_front() {
            for &c in &children[u] {
                if stamp[c] != v {
                    stamp[c] = v;
                    count += 1;
                    queue.push_back(c);
                }
            }
        }
        counts[v] = count;
    }

    counts
}
