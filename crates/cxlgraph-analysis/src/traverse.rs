//! Depth-first edge classification.
//!
//! # Event Convention
//!
//! [`dfs_labeled_edges`] reports every step of an iterative depth-first
//! search as a [`LabeledEdge`]:
//!
//! - `(root, root, Forward)` when a search tree is started and
//!   `(root, root, Reverse)` when it is finished.
//! - `(u, v, Forward)` when `v` is discovered from `u`.
//! - `(u, v, NonTree)` when `v` was already visited.
//! - `(u, v, Reverse)` when the search backs out of `v` to `u`.
//! - `(u, v, ReverseDepthLimit)` right after `(u, v, Forward)` when `v` sits
//!   at the depth limit. `v` counts as visited but is not expanded.
//!
//! Neighbors are visited in edge insertion order. In fuzzy (undirected)
//! graphs the edge back to a vertex's DFS parent is skipped once, since it is
//! the tree edge itself.
//!
//! The search keeps an explicit stack of frames, so recursion depth does not
//! depend on map size.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use cxlgraph_core::{Error, Result};
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::graph::ConceptGraph;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Classification of one DFS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "forward")]
    Forward,
    #[serde(rename = "nontree")]
    NonTree,
    #[serde(rename = "reverse")]
    Reverse,
    #[serde(rename = "reverse-depth_limit")]
    ReverseDepthLimit,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::NonTree => "nontree",
            Self::Reverse => "reverse",
            Self::ReverseDepthLimit => "reverse-depth_limit",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DFS event between two concept ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Link categories counted by [`link_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// `Forward` events.
    Tree,
    /// `Reverse` events.
    Reverse,
    /// `NonTree` events.
    Cross,
    /// Every event, including depth-limit markers.
    All,
}

impl LinkType {
    const fn counts(self, kind: EdgeKind) -> bool {
        matches!(
            (self, kind),
            (Self::All, _)
                | (Self::Tree, EdgeKind::Forward)
                | (Self::Reverse, EdgeKind::Reverse)
                | (Self::Cross, EdgeKind::NonTree)
        )
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

struct Frame {
    vertex: NodeIndex,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    cursor: usize,
    parent_skipped: bool,
}

impl Frame {
    fn new(cg: &ConceptGraph, vertex: NodeIndex, parent: Option<NodeIndex>) -> Self {
        Self {
            vertex,
            parent,
            children: cg.successors(vertex),
            cursor: 0,
            parent_skipped: false,
        }
    }

    fn next_child(&mut self, skip_parent: bool) -> Option<NodeIndex> {
        loop {
            let child = *self.children.get(self.cursor)?;
            self.cursor += 1;
            if skip_parent && !self.parent_skipped && Some(child) == self.parent {
                self.parent_skipped = true;
                continue;
            }
            return Some(child);
        }
    }
}

/// Run a labeled depth-first search.
///
/// With `source` set the search covers the vertices reachable from it;
/// otherwise it restarts from every unvisited vertex in insertion order.
/// `depth_limit` defaults to the vertex count: a vertex at depth `d` (the
/// root is at 0) is expanded only when `d < depth_limit`.
///
/// # Errors
///
/// [`Error::UnknownNode`] if `source` is not a vertex.
#[instrument(skip(cg), fields(nodes = cg.node_count()))]
pub fn dfs_labeled_edges(
    cg: &ConceptGraph,
    source: Option<&str>,
    depth_limit: Option<usize>,
) -> Result<Vec<LabeledEdge>> {
    let starts: Vec<NodeIndex> = match source {
        Some(id) => vec![
            cg.node_index(id)
                .ok_or_else(|| Error::UnknownNode(id.to_string()))?,
        ],
        None => cg.nodes().collect(),
    };
    let limit = depth_limit.unwrap_or_else(|| cg.node_count());
    let skip_parent = cg.is_fuzzy();

    let label = |from: NodeIndex, to: NodeIndex, kind: EdgeKind| LabeledEdge {
        from: cg.graph[from].clone(),
        to: cg.graph[to].clone(),
        kind,
    };

    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(cg.node_count());
    let mut events = Vec::new();

    for start in starts {
        if !visited.insert(start) {
            continue;
        }
        events.push(label(start, start, EdgeKind::Forward));
        let mut stack = vec![Frame::new(cg, start, None)];

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let vertex = frame.vertex;

            if let Some(child) = frame.next_child(skip_parent) {
                if !visited.insert(child) {
                    events.push(label(vertex, child, EdgeKind::NonTree));
                    continue;
                }
                events.push(label(vertex, child, EdgeKind::Forward));
                if depth < limit {
                    stack.push(Frame::new(cg, child, Some(vertex)));
                } else {
                    events.push(label(vertex, child, EdgeKind::ReverseDepthLimit));
                }
            } else {
                stack.pop();
                if let Some(up) = stack.last() {
                    events.push(label(up.vertex, vertex, EdgeKind::Reverse));
                }
            }
        }

        events.push(label(start, start, EdgeKind::Reverse));
    }

    debug!(events = events.len(), "dfs complete");
    Ok(events)
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Count events matching any of `types`. Repeated types count once.
#[must_use]
pub fn count_links(events: &[LabeledEdge], types: &[LinkType]) -> usize {
    let types: BTreeSet<LinkType> = types.iter().copied().collect();
    events
        .iter()
        .filter(|e| types.iter().any(|t| t.counts(e.kind)))
        .count()
}

/// Count DFS events of the given types, starting from `root` (or from every
/// vertex when `None`) with the default depth limit.
///
/// # Errors
///
/// [`Error::UnknownNode`] if `root` is not a vertex.
pub fn link_count(cg: &ConceptGraph, root: Option<&str>, types: &[LinkType]) -> Result<usize> {
    let events = dfs_labeled_edges(cg, root, None)?;
    Ok(count_links(&events, types))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
