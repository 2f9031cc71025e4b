//! Concept graph module.
//!
//! # Overview
//!
//! This module constructs a petgraph-based concept graph from resolved
//! connections. The graph feeds the centrality metrics, community detection
//! and the DFS edge classifier.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<Connection>
//!        ↓  build::GraphBuilder::build()
//! ConceptGraph (StableDiGraph, directed or fuzzy)
//!        ↓  leaves::find_leaves()          (destructive: drops isolated vertices)
//! Leaves { no_incoming, no_outgoing, removed }
//!        ↓  adjacency::Adjacency::undirected()/undirected_summed()/native()
//! dense adjacency lists for metrics
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use cxlgraph_analysis::graph::{GraphBuilder, GraphMode, find_leaves};
//!
//! let mut g = GraphBuilder::new(GraphMode::Directed).build(&connections)?;
//! let leaves = find_leaves(&mut g);
//! println!("roots={:?} leaves={:?}", leaves.no_incoming, leaves.no_outgoing);
//! ```

pub mod adjacency;
pub mod build;
pub mod leaves;

// Re-export primary types at module level for convenience.
pub use adjacency::Adjacency;
pub use build::{ConceptGraph, GraphBuilder, GraphMode, Link};
pub use leaves::{Leaves, find_leaves};
