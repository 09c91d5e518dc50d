//! Dagre layered layout.
//!
//! Wraps `dugong`, the Rust port of dagre, behind the [`Layerer`] trait. Each
//! layout unit becomes a dagre node sized like its box, each edge carries its
//! `minlen`, and dagre's node centers are read back in unit order.
//!
//! The graph is built compound so the nesting graph joins disconnected
//! components before network-simplex ranking.

use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};

use crate::graph::Point;

use super::{LayerGraph, Layerer, LayoutConfig, LayoutDirection};

/// The bundled [`Layerer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreLayout;

impl Layerer for DagreLayout {
    fn layerize(&self, graph: &LayerGraph, config: &LayoutConfig) -> Vec<Point> {
        if graph.nodes.is_empty() {
            return Vec::new();
        }

        let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
            multigraph: true,
            compound: true,
            ..Default::default()
        });
        g.set_graph(GraphLabel {
            rankdir: rank_dir(config.direction),
            nodesep: config.node_separation,
            ranksep: config.rank_separation,
            edgesep: config.edge_separation,
            ..Default::default()
        });

        for (unit, size) in graph.nodes.iter().enumerate() {
            g.set_node(
                unit.to_string(),
                NodeLabel {
                    width: size.width,
                    height: size.height,
                    ..Default::default()
                },
            );
        }

        let n = graph.nodes.len();
        for (i, edge) in graph.edges.iter().enumerate() {
            if edge.source >= n || edge.target >= n {
                continue;
            }
            g.set_edge_named(
                edge.source.to_string(),
                edge.target.to_string(),
                Some(format!("e{i}")),
                Some(EdgeLabel {
                    minlen: edge.minlen.max(1) as usize,
                    weight: 1.0,
                    ..Default::default()
                }),
            );
        }

        dugong::layout_dagreish(&mut g);

        (0..n)
            .map(|unit| {
                g.node(&unit.to_string())
                    .and_then(|label| Some(Point::new(label.x?, label.y?)))
                    .unwrap_or_default()
            })
            .collect()
    }
}

fn rank_dir(direction: LayoutDirection) -> RankDir {
    match direction {
        LayoutDirection::TopBottom => RankDir::TB,
        LayoutDirection::LeftRight => RankDir::LR,
    }
}
