//! Dense-index adjacency views of a [`ConceptGraph`].
//!
//! Metrics work on `0..n` positions instead of petgraph indices, which may
//! have holes after vertex removal. Position `i` is the `i`-th vertex in
//! insertion order; neighbor lists keep edge insertion order.

use std::collections::{HashMap, VecDeque};

use petgraph::stable_graph::NodeIndex;

use super::build::ConceptGraph;

/// Adjacency lists over dense positions.
#[derive(Debug, Clone)]
pub struct Adjacency {
    /// Concept id at each position.
    pub ids: Vec<String>,
    /// Neighbor positions per position.
    pub neighbors: Vec<Vec<usize>>,
    /// Edge weight parallel to `neighbors` (1.0 unless fuzzy).
    pub weights: Vec<Vec<f64>>,
}

impl Adjacency {
    /// Undirected projection: an edge in either direction links both ends.
    #[must_use]
    pub fn undirected(cg: &ConceptGraph) -> Self {
        Self::project(cg, ConceptGraph::undirected_neighbors, link_weight)
    }

    /// Undirected projection whose weights add both stored directions, so
    /// `A → B` plus `B → A` weighs 2.0.
    #[must_use]
    pub fn undirected_summed(cg: &ConceptGraph) -> Self {
        Self::project(cg, ConceptGraph::undirected_neighbors, summed_weight)
    }

    /// Native direction: outgoing edges when directed, undirected when fuzzy.
    #[must_use]
    pub fn native(cg: &ConceptGraph) -> Self {
        Self::project(cg, ConceptGraph::successors, link_weight)
    }

    fn project(
        cg: &ConceptGraph,
        next: fn(&ConceptGraph, NodeIndex) -> Vec<NodeIndex>,
        weight_of: fn(&ConceptGraph, NodeIndex, NodeIndex) -> f64,
    ) -> Self {
        let order: Vec<NodeIndex> = cg.nodes().collect();
        let position: HashMap<NodeIndex, usize> =
            order.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();

        let mut ids = Vec::with_capacity(order.len());
        let mut neighbors = Vec::with_capacity(order.len());
        let mut weights = Vec::with_capacity(order.len());

        for &idx in &order {
            ids.push(cg.graph[idx].clone());
            let mut nbrs = Vec::new();
            let mut ws = Vec::new();
            for other in next(cg, idx) {
                let Some(&pos) = position.get(&other) else {
                    continue;
                };
                nbrs.push(pos);
                ws.push(weight_of(cg, idx, other));
            }
            neighbors.push(nbrs);
            weights.push(ws);
        }

        Self {
            ids,
            neighbors,
            weights,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Unweighted hop distances from `source`; `None` when unreachable.
    #[must_use]
    pub fn bfs_distances(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.len()];
        if source >= self.len() {
            return dist;
        }
        dist[source] = Some(0);
        let mut queue = VecDeque::from([source]);

        while let Some(u) = queue.pop_front() {
            let next = dist[u].map_or(0, |d| d + 1);
            for &v in &self.neighbors[u] {
                if dist[v].is_none() {
                    dist[v] = Some(next);
                    queue.push_back(v);
                }
            }
        }
        dist
    }

    /// Whether every vertex is reachable from position 0.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.is_empty() && self.bfs_distances(0).iter().all(Option::is_some)
    }
}

/// Weight of the first stored edge between `a` and `b`.
fn link_weight(cg: &ConceptGraph, a: NodeIndex, b: NodeIndex) -> f64 {
    cg.find_link(a, b)
        .or_else(|| cg.find_link(b, a))
        .and_then(|e| cg.graph[e].weight)
        .unwrap_or(1.0)
}

/// Total weight of the edges `a → b` and `b → a`. A self loop counts once.
fn summed_weight(cg: &ConceptGraph, a: NodeIndex, b: NodeIndex) -> f64 {
    let back = if a == b { None } else { cg.graph.find_edge(b, a) };
    [cg.graph.find_edge(a, b), back]
        .into_iter()
        .flatten()
        .map(|e| cg.graph[e].weight.unwrap_or(1.0))
        .sum()
}
