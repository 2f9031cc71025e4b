//! Structural metrics for concept graphs.
//!
//! # Overview
//!
//! Each metric answers a different question about a concept map:
//!
//! - **Density** (`basic`): how interlinked is the map overall?
//! - **Barycenter / center** (`distance`): which concepts sit closest to
//!   everything else?
//! - **Eigenvector centrality** (`eigenvector`): which concepts are linked to
//!   other well-linked concepts?
//! - **PageRank** (`pagerank`): where does a random walk along the links end
//!   up?
//! - **Communities** (`community`): which concepts cluster together?
//! - **Nearness** (`distance`): how far apart is every pair?
//!
//! [`centers::find_centers`] runs any subset of the centrality measures and
//! collapses them into one answer when they agree.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cxlgraph_analysis::metrics::centers::{CenterRequest, find_centers};
//! use cxlgraph_analysis::metrics::community::communities;
//!
//! let centers = find_centers(&graph, CenterRequest::all(), &config.centrality)?;
//! let groups = communities(&graph, 1.0, None)?;
//! ```

pub mod basic;
pub mod centers;
pub mod community;
pub mod distance;
pub mod eigenvector;
pub mod pagerank;

pub use basic::{GraphStats, density};
pub use centers::{CenterRequest, Centers, CentralityResult, Measure, find_centers};
pub use community::communities;
pub use distance::{NearnessMatrix, barycenter, center, nearness};
pub use eigenvector::{EigenvectorResult, eigenvector_centrality};
pub use pagerank::{PageRankConfig, PageRankResult, pagerank};
