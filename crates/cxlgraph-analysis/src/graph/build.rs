//! Graph construction from resolved connections.
//!
//! # Overview
//!
//! [`GraphBuilder`] folds a list of [`Connection`]s into a [`ConceptGraph`]:
//! a petgraph `StableDiGraph` whose nodes are concept ids and whose edges
//! carry the connection's id and label.
//!
//! ## Modes
//!
//! - [`GraphMode::Directed`] (default): edge `A → B` per connection.
//! - [`GraphMode::Fuzzy`]: undirected. `(A, B)` and `(B, A)` are the same
//!   edge, and the label is parsed as a numeric `weight`.
//!
//! The mode is fixed when the builder is created. Building again produces a
//! fresh graph; there is no merge with a previous build.
//!
//! ## Neighbor Order
//!
//! All neighbor queries return vertices in edge insertion order (ascending
//! edge index), so traversal and tie-breaking are reproducible. Stable
//! indices keep that order intact when isolated vertices are removed.
//!
//! ## Fingerprint
//!
//! [`ConceptGraph::fingerprint`] is a BLAKE3 hash of the sorted node and
//! edge sets. Derived values stamped with it can detect that the graph was
//! mutated after they were computed.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use cxlgraph_core::{Connection, Error, Result};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Construction mode, fixed for the lifetime of a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    #[default]
    Directed,
    /// Undirected, weighted by numeric labels.
    Fuzzy,
}

impl GraphMode {
    #[must_use]
    pub const fn from_fuzzy(fuzzy: bool) -> Self {
        if fuzzy { Self::Fuzzy } else { Self::Directed }
    }
}

/// Edge payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: Option<String>,
    pub label: String,
    /// Numeric weight; only set in fuzzy mode.
    pub weight: Option<f64>,
}

/// A concept graph built from resolved connections.
///
/// Nodes are concept ids. In fuzzy mode the stored edge direction is only
/// the order in which the endpoints were first seen and carries no meaning.
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    pub graph: StableDiGraph<String, Link>,
    /// Mapping from concept id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    mode: GraphMode,
}

impl ConceptGraph {
    /// An empty graph in the given mode.
    #[must_use]
    pub fn new(mode: GraphMode) -> Self {
        Self {
            graph: StableDiGraph::default(),
            node_map: HashMap::new(),
            mode,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GraphMode {
        self.mode
    }

    #[must_use]
    pub fn is_fuzzy(&self) -> bool {
        self.mode == GraphMode::Fuzzy
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a concept id.
    #[must_use]
    pub fn node_index(&self, concept_id: &str) -> Option<NodeIndex> {
        self.node_map.get(concept_id).copied()
    }

    /// Return the concept id for a node.
    #[must_use]
    pub fn concept_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Node indices in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Concept ids in insertion order.
    pub fn concept_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
            .map(String::as_str)
    }

    /// Vertices reachable over one edge from `idx`, honoring the graph's
    /// directedness. In fuzzy mode this is the undirected neighborhood.
    #[must_use]
    pub fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        if self.is_fuzzy() {
            self.undirected_neighbors(idx)
        } else {
            self.ordered(idx, &[Direction::Outgoing])
        }
    }

    /// Vertices with an edge into `idx`. In fuzzy mode this is the
    /// undirected neighborhood.
    #[must_use]
    pub fn predecessors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        if self.is_fuzzy() {
            self.undirected_neighbors(idx)
        } else {
            self.ordered(idx, &[Direction::Incoming])
        }
    }

    /// Neighbors over edges in either direction, deduplicated.
    #[must_use]
    pub fn undirected_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered(idx, &[Direction::Outgoing, Direction::Incoming])
    }

    /// Edge between `a` and `b`, in either stored direction when fuzzy.
    #[must_use]
    pub fn find_link(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b).or_else(|| {
            if self.is_fuzzy() {
                self.graph.find_edge(b, a)
            } else {
                None
            }
        })
    }

    /// Re-derive connections by walking the edges in insertion order.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = self.graph.edge_endpoints(e)?;
                let link = self.graph.edge_weight(e)?;
                Some(Connection {
                    from_id: self.graph[a].clone(),
                    to_id: self.graph[b].clone(),
                    label: link.label.clone(),
                    id: link.id.clone(),
                })
            })
            .collect()
    }

    /// BLAKE3 hash of the sorted node and edge sets.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut nodes: Vec<&str> = self.concept_ids().collect();
        nodes.sort_unstable();

        let mut edges: Vec<(String, String, String)> = self
            .connections()
            .into_iter()
            .map(|c| (c.from_id, c.to_id, c.label))
            .collect();
        edges.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        let mode_tag: &[u8] = if self.is_fuzzy() { b"fuzzy\x00" } else { b"directed\x00" };
        hasher.update(mode_tag);
        for node in nodes {
            hasher.update(node.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (from, to, label) in &edges {
            hasher.update(from.as_bytes());
            hasher.update(b"\x00");
            hasher.update(to.as_bytes());
            hasher.update(b"\x00");
            hasher.update(label.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    /// Remove a vertex and its edges.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<String> {
        let id = self.graph.remove_node(idx)?;
        self.node_map.remove(&id);
        Some(id)
    }

    fn ensure_node(&mut self, concept_id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(concept_id) {
            return idx;
        }
        let idx = self.graph.add_node(concept_id.to_string());
        self.node_map.insert(concept_id.to_string(), idx);
        idx
    }

    fn ordered(&self, idx: NodeIndex, directions: &[Direction]) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = directions
            .iter()
            .flat_map(|&dir| {
                self.graph.edges_directed(idx, dir).map(move |edge| {
                    let other = if edge.source() == idx {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    (edge.id(), other)
                })
            })
            .collect();
        edges.sort_unstable_by_key(|(e, _)| *e);

        let mut seen = HashSet::with_capacity(edges.len());
        edges
            .into_iter()
            .filter_map(|(_, other)| seen.insert(other).then_some(other))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Folds connections into a [`ConceptGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    mode: GraphMode,
}

impl GraphBuilder {
    #[must_use]
    pub const fn new(mode: GraphMode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub const fn mode(&self) -> GraphMode {
        self.mode
    }

    /// Build a fresh graph.
    ///
    /// Each connection adds the edge `(from, to)` or, when that edge already
    /// exists, overwrites its id and label. Endpoints are created on first
    /// sight.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWeight`] in fuzzy mode when a label is not a number.
    #[instrument(
        skip(self, connections),
        fields(mode = ?self.mode, connections = connections.len())
    )]
    pub fn build(&self, connections: &[Connection]) -> Result<ConceptGraph> {
        let mut cg = ConceptGraph::new(self.mode);

        for connection in connections {
            let weight = match self.mode {
                GraphMode::Directed => None,
                GraphMode::Fuzzy => Some(parse_weight(&connection.label)?),
            };
            let link = Link {
                id: connection.id.clone(),
                label: connection.label.clone(),
                weight,
            };

            let from = cg.ensure_node(&connection.from_id);
            let to = cg.ensure_node(&connection.to_id);

            if let Some(existing) = cg.find_link(from, to) {
                cg.graph[existing] = link;
            } else {
                cg.graph.add_edge(from, to, link);
            }
        }

        debug!(
            nodes = cg.node_count(),
            edges = cg.edge_count(),
            "built concept graph"
        );
        Ok(cg)
    }
}

fn parse_weight(label: &str) -> Result<f64> {
    label
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| Error::InvalidWeight {
            label: label.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
