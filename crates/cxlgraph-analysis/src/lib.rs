#![forbid(unsafe_code)]
//! cxlgraph-analysis library.
//!
//! Builds a petgraph concept graph from resolved connections and computes
//! structural metrics over it: density, centrality with consensus,
//! Louvain communities, nearness and depth-first edge classification.
//!
//! [`ConceptMap`] ties the pipeline together for a single document;
//! [`ScoredMap`] caches its metrics against the graph fingerprint.
//!
//! # Conventions
//!
//! - **Errors**: Library calls return [`cxlgraph_core::Result`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod graph;
pub mod map;
pub mod metrics;
pub mod render;
pub mod scored;
pub mod traverse;

pub use graph::{ConceptGraph, GraphBuilder, GraphMode, Leaves, find_leaves};
pub use map::{ConceptMap, MapOptions};
pub use metrics::{CenterRequest, Centers, CentralityResult, GraphStats, Measure, NearnessMatrix};
pub use scored::ScoredMap;
pub use traverse::{EdgeKind, LabeledEdge, LinkType, dfs_labeled_edges, link_count};
