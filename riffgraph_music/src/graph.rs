// Melody graph: a complete directed graph over the pitches of one scale.
//
// Every ordered pair of distinct pitches gets an edge weighted by
// `interval::transition_weight`. There are no self edges, so a scale of k
// pitches yields k * (k - 1) edges. Building is pure: the same scale always
// produces the same graph, and the generator rebuilds it on every call rather
// than caching it.
//
// Nodes keep scale order, and each node's outgoing edges are listed in scale
// order of their destination. That order is the iteration order of the
// roulette wheel in `generator::weighted_choice`.
//
// The graph serializes as a list of nodes, each carrying its frequency and
// outgoing edges, which is what a visualizer needs to draw it.

use crate::catalog::{Scale, ScaleCatalog};
use crate::error::Result;
use crate::generator::weighted_choice;
use crate::interval::transition_weight;
use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};

/// A directed, weighted edge to another pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub to: Pitch,
    pub weight: u32,
}

/// One scale pitch with its frequency and outgoing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub pitch: Pitch,
    pub frequency: f64,
    pub edges: Vec<Edge>,
}

impl GraphNode {
    /// Sum of outgoing edge weights.
    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelodyGraph {
    nodes: Vec<GraphNode>,
}

impl MelodyGraph {
    /// Build the graph for `scale`, taking frequencies from `catalog`.
    pub fn build(scale: &Scale, catalog: &ScaleCatalog) -> Result<Self> {
        let nodes = scale
            .pitches
            .iter()
            .map(|&from| {
                let edges = scale
                    .pitches
                    .iter()
                    .filter(|&&to| to != from)
                    .map(|&to| Edge {
                        to,
                        weight: transition_weight(from, to),
                    })
                    .collect();
                Ok(GraphNode {
                    pitch: from,
                    frequency: catalog.frequency(from)?,
                    edges,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::trace!(
            "built graph for '{}': {} nodes, {} edges",
            scale.name,
            nodes.len(),
            nodes.iter().map(|n| n.edges.len()).sum::<usize>()
        );
        Ok(MelodyGraph { nodes })
    }

    /// Nodes in scale order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, pitch: Pitch) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.pitch == pitch)
    }

    /// Outgoing edges of `pitch`, or `None` if it is not in the graph.
    pub fn outgoing(&self, pitch: Pitch) -> Option<&[Edge]> {
        self.node(pitch).map(|n| n.edges.as_slice())
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// Pick the successor of `current` by roulette-wheel selection over its
    /// outgoing edges. `rng_val` is a uniform value in [0, 1).
    ///
    /// Returns `None` when `current` is not in the graph or has no edges.
    pub fn next_pitch(&self, current: Pitch, rng_val: f64) -> Option<&GraphNode> {
        let edges = self.outgoing(current)?;
        let edge = weighted_choice(edges, |e| e.weight, rng_val)?;
        self.node(edge.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{FALLBACK, OCTAVE, SECOND};

    fn p(name: &str) -> Pitch {
        name.parse().unwrap()
    }

    fn major_graph() -> MelodyGraph {
        let catalog = ScaleCatalog::builtin().unwrap();
        MelodyGraph::build(catalog.scale("major").unwrap(), &catalog).unwrap()
    }

    #[test]
    fn complete_without_self_loops() {
        let graph = major_graph();
        assert_eq!(graph.nodes().len(), 8);
        assert_eq!(graph.edge_count(), 8 * 7);
        for node in graph.nodes() {
            assert_eq!(node.edges.len(), 7);
            assert!(node.edges.iter().all(|e| e.to != node.pitch));
            assert!(node.total_weight() > 0);
        }
    }

    #[test]
    fn edges_follow_scale_order_and_interval_weights() {
        let graph = major_graph();
        let from_c4 = graph.outgoing(p("C4")).unwrap();
        let targets: Vec<String> = from_c4.iter().map(|e| e.to.to_string()).collect();
        assert_eq!(targets, ["D4", "E4", "F4", "G4", "A4", "B4", "C5"]);
        let weights: Vec<u32> = from_c4.iter().map(|e| e.weight).collect();
        assert_eq!(weights, [10, 8, 6, 7, 4, 3, 5]);

        let from_c5 = graph.outgoing(p("C5")).unwrap();
        assert!(from_c5.iter().all(|e| e.weight == FALLBACK));

        let from_g4 = graph.outgoing(p("G4")).unwrap();
        assert_eq!(from_g4.iter().find(|e| e.to == p("A4")).unwrap().weight, SECOND);
        assert_eq!(
            graph.outgoing(p("C4")).unwrap().last().unwrap().weight,
            OCTAVE
        );
    }

    #[test]
    fn nodes_carry_catalog_frequencies() {
        let graph = major_graph();
        assert_eq!(graph.node(p("G4")).unwrap().frequency, 392.0);
        assert_eq!(graph.node(p("C5")).unwrap().frequency, 523.25);
        assert!(graph.node(p("C#4")).is_none());
        assert!(graph.outgoing(p("C#4")).is_none());
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(major_graph(), major_graph());
    }

    #[test]
    fn next_pitch_walks_the_wheel() {
        let graph = major_graph();
        // From C4 the wheel is D4:10, E4:8, F4:6, G4:7, A4:4, B4:3, C5:5 (total 43).
        assert_eq!(graph.next_pitch(p("C4"), 0.0).unwrap().pitch, p("D4"));
        assert_eq!(graph.next_pitch(p("C4"), 9.5 / 43.0).unwrap().pitch, p("D4"));
        assert_eq!(graph.next_pitch(p("C4"), 10.5 / 43.0).unwrap().pitch, p("E4"));
        assert_eq!(graph.next_pitch(p("C4"), 0.999).unwrap().pitch, p("C5"));
        assert!(graph.next_pitch(p("C#4"), 0.5).is_none());
    }

    #[test]
    fn serializes_for_visualizers() {
        let graph = major_graph();
        let json = serde_json::to_value(&graph).unwrap();
        let first = &json["nodes"][0];
        assert_eq!(first["pitch"], "C4");
        assert_eq!(first["edges"][0]["to"], "D4");
        assert_eq!(first["edges"][0]["weight"], 10);
    }
}
