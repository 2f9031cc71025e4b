//! Static graph metrics: density and summary statistics.
//!
//! # Statistics Provided
//!
//! - **density**: directed `E / (n(n-1))`, fuzzy (undirected)
//!   `2E / (n(n-1))`. A complete graph has density 1.0; a graph with fewer
//!   than two vertices has density 0.0.
//! - **weakly_connected_component_count**: components of the undirected
//!   projection.
//! - **isolated_node_count**: vertices with no edges at all.
//! - **max_in_degree** / **max_out_degree**: over distinct neighbors.

use serde::Serialize;

use crate::graph::{Adjacency, ConceptGraph, GraphMode};

// ---------------------------------------------------------------------------
// Density
// ---------------------------------------------------------------------------

/// Graph density. Zero for graphs with fewer than two vertices.
#[must_use]
pub fn density(cg: &ConceptGraph) -> f64 {
    compute_density(cg.node_count(), cg.edge_count(), cg.mode())
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize, mode: GraphMode) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    match mode {
        GraphMode::Directed => edge_count as f64 / max_edges,
        GraphMode::Fuzzy => 2.0 * edge_count as f64 / max_edges,
    }
}

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a concept graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub mode: GraphMode,
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    /// Number of components of the undirected projection.
    pub weakly_connected_component_count: usize,
    /// Vertices with neither incoming nor outgoing edges.
    pub isolated_node_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(cg: &ConceptGraph) -> Self {
        let adjacency = Adjacency::undirected(cg);

        let mut max_in_degree = 0;
        let mut max_out_degree = 0;
        let mut isolated_node_count = 0;
        for idx in cg.nodes() {
            let in_d = cg.predecessors(idx).len();
            let out_d = cg.successors(idx).len();
            if in_d == 0 && out_d == 0 {
                isolated_node_count += 1;
            }
            max_in_degree = max_in_degree.max(in_d);
            max_out_degree = max_out_degree.max(out_d);
        }

        Self {
            mode: cg.mode(),
            node_count: cg.node_count(),
            edge_count: cg.edge_count(),
            density: density(cg),
            weakly_connected_component_count: component_count(&adjacency),
            isolated_node_count,
            max_in_degree,
            max_out_degree,
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

fn component_count(adjacency: &Adjacency) -> usize {
    let mut seen = vec![false; adjacency.len()];
    let mut count = 0;

    for start in 0..adjacency.len() {
        if seen[start] {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        while let Some(u) = stack.pop() {
            if seen[u] {
                continue;
            }
            seen[u] = true;
            stack.extend(adjacency.neighbors[u].iter().copied().filter(|&v| !seen[v]));
        }
    }
    count
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use cxlgraph_core::Connection;

    fn build(mode: GraphMode, edges: &[(&str, &str)]) -> ConceptGraph {
        let connections: Vec<Connection> = edges
            .iter()
            .map(|(a, b)| Connection::new(*a, *b, "1"))
            .collect();
        GraphBuilder::new(mode).build(&connections).expect("build")
    }

    #[test]
    fn density_empty_graph() {
        let g = build(GraphMode::Directed, &[]);
        assert!((density(&g) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn density_no_edges_is_zero() {
        let mut g = build(GraphMode::Directed, &[]);
        for id in ["A", "B", "C"] {
            let idx = g.graph.add_node(id.to_string());
            g.node_map.insert(id.to_string(), idx);
        }
        assert!((density(&g) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn density_two_nodes_one_edge() {
        // A → B: 1 / (2 * 1) = 0.5
        let g = build(GraphMode::Directed, &[("A", "B")]);
        assert!((density(&g) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn density_complete_directed_graph() {
        let g = build(
            GraphMode::Directed,
            &[("A", "B"), ("B", "A"), ("A", "C"), ("C", "A"), ("B", "C"), ("C", "B")],
        );
        assert!((density(&g) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn density_complete_fuzzy_graph() {
        let g = build(GraphMode::Fuzzy, &[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!((density(&g) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn stats_chain() {
        let g = build(GraphMode::Directed, &[("A", "B"), ("B", "C")]);
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.weakly_connected_component_count, 1);
        assert_eq!(stats.isolated_node_count, 0);
        assert_eq!(stats.max_in_degree, 1);
        assert_eq!(stats.max_out_degree, 1);
        assert!(!stats.is_flat());
    }

    #[test]
    fn stats_disjoint_and_hub() {
        // Hub: A→C, B→C, D→C and separate E→F
        let g = build(
            GraphMode::Directed,
            &[("A", "C"), ("B", "C"), ("D", "C"), ("E", "F")],
        );
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.weakly_connected_component_count, 2);
        assert_eq!(stats.max_in_degree, 3);
        assert_eq!(stats.max_out_degree, 1);
    }
}
