//! Leaf and root discovery.
//!
//! A vertex with no predecessors is a root of the map (`no_incoming`); one
//! with no successors is a leaf (`no_outgoing`). A vertex with neither is an
//! isolated artifact and is **removed** from the graph. This makes
//! [`find_leaves`] destructive: run it after any analysis that should see the
//! isolated vertices.
//!
//! In fuzzy mode predecessors and successors are both the undirected
//! neighborhood, so only isolated vertices are affected.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument};

use super::build::ConceptGraph;

/// Boundary vertices found by [`find_leaves`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaves {
    /// Vertices with no incoming edges.
    pub no_incoming: BTreeSet<String>,
    /// Vertices with no outgoing edges.
    pub no_outgoing: BTreeSet<String>,
    /// Isolated vertices that were removed from the graph.
    pub removed: BTreeSet<String>,
}

/// Partition boundary vertices and drop isolated ones.
#[instrument(skip(cg), fields(nodes = cg.node_count()))]
pub fn find_leaves(cg: &mut ConceptGraph) -> Leaves {
    let mut leaves = Leaves::default();
    let nodes: Vec<_> = cg.nodes().collect();

    for idx in nodes {
        let no_pred = cg.predecessors(idx).is_empty();
        let no_succ = cg.successors(idx).is_empty();

        match (no_pred, no_succ) {
            (true, true) => {
                if let Some(id) = cg.remove_node(idx) {
                    leaves.removed.insert(id);
                }
            }
            (true, false) => {
                if let Some(id) = cg.concept_id(idx) {
                    leaves.no_incoming.insert(id.to_string());
                }
            }
            (false, true) => {
                if let Some(id) = cg.concept_id(idx) {
                    leaves.no_outgoing.insert(id.to_string());
                }
            }
            (false, false) => {}
        }
    }

    debug!(
        no_incoming = leaves.no_incoming.len(),
        no_outgoing = leaves.no_outgoing.len(),
        removed = leaves.removed.len(),
        "found leaves"
    );
    leaves
}
