//! PageRank over the graph's native direction.
//!
//! # Algorithm
//!
//! Standard PageRank uses the iterative power method on the adjacency matrix:
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) * w(u,v) / out_weight(u)   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Directed maps follow edge
//! direction with unit weights; fuzzy maps follow every edge both ways,
//! weighted by the numeric label. Dangling vertices (no out-weight) spread
//! their rank uniformly.

use std::collections::BTreeMap;

use cxlgraph_core::config::CentralityConfig;
use tracing::{instrument, warn};

use crate::graph::{Adjacency, ConceptGraph};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 100,
        }
    }
}

impl From<&CentralityConfig> for PageRankConfig {
    fn from(config: &CentralityConfig) -> Self {
        Self {
            damping: config.pagerank_damping,
            tolerance: config.pagerank_tolerance,
            max_iter: config.pagerank_max_iter,
        }
    }
}

/// Result of a PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// PageRank scores: concept id → score. Scores sum to 1.
    pub scores: BTreeMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

/// Compute PageRank for every concept.
#[must_use]
#[instrument(skip(cg, config))]
#[allow(clippy::cast_precision_loss)]
pub fn pagerank(cg: &ConceptGraph, config: &PageRankConfig) -> PageRankResult {
    let adjacency = Adjacency::native(cg);
    let n = adjacency.len();

    if n == 0 {
        return PageRankResult {
            scores: BTreeMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let out_weight: Vec<f64> = adjacency
        .weights
        .iter()
        .map(|ws| ws.iter().filter(|w| **w > 0.0).sum::<f64>())
        .collect();

    // Initialize ranks uniformly.
    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        // Reset new_ranks to base teleportation value.
        for r in &mut new_ranks {
            *r = base;
        }

        // Distribute rank from each node to its outgoing neighbors.
        for u in 0..n {
            if out_weight[u] <= 0.0 {
                // Dangling node: distribute its rank equally to all nodes.
                let share = config.damping * ranks[u] / n_f64;
                for r in &mut new_ranks {
                    *r += share;
                }
            } else {
                let scale = config.damping * ranks[u] / out_weight[u];
                for (&v, &w) in adjacency.neighbors[u].iter().zip(&adjacency.weights[u]) {
                    if w > 0.0 {
                        new_ranks[v] += scale * w;
                    }
                }
            }
        }

        // Check convergence: L1 norm of delta.
        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, "pagerank did not converge");
    }

    PageRankResult {
        scores: adjacency.ids.into_iter().zip(ranks).collect(),
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
