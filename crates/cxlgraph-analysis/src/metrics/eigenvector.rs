//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores nodes based on the idea that connections to
//! high-scoring nodes contribute more to a node's score. It's the dominant
//! eigenvector of the adjacency matrix.
//!
//! # Algorithm
//!
//! Power iteration on `A + I` over the **undirected** projection:
//!
//! 1. Initialize scores uniformly.
//! 2. For each node `v`: `score(v) = score(v) + Σ score(u)` over neighbors.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Repeat until convergence or max iterations.
//!
//! The identity shift keeps bipartite graphs (stars, paths, most trees) from
//! oscillating between two vectors; it does not change the eigenvector.

use std::collections::BTreeMap;

use tracing::{instrument, warn};

use crate::graph::{Adjacency, ConceptGraph};

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: concept id → score.
    pub scores: BTreeMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

/// Compute eigenvector centrality for all concepts in the graph.
///
/// # Arguments
///
/// * `cg`: the concept graph; edge direction is ignored.
/// * `max_iter`: Maximum number of iterations.
/// * `tolerance`: Convergence threshold: stop when the L2 norm of the
///   change in scores is below this value.
#[must_use]
#[instrument(skip(cg))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(
    cg: &ConceptGraph,
    max_iter: usize,
    tolerance: f64,
) -> EigenvectorResult {
    let adjacency = Adjacency::undirected(cg);
    let n = adjacency.len();

    if n == 0 {
        return EigenvectorResult {
            scores: BTreeMap::new(),
            iterations: 0,
            converged: true,
        };
    }

    let init_val = 1.0 / (n as f64).sqrt();
    let mut scores: Vec<f64> = vec![init_val; n];

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        let mut new_scores = scores.clone();
        for (v, nbrs) in adjacency.neighbors.iter().enumerate() {
            for &u in nbrs {
                new_scores[v] += scores[u];
            }
        }

        // Normalize to unit L2 norm.
        let norm: f64 = new_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut new_scores {
                *x /= norm;
            }
        }

        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();

        scores = new_scores;

        if diff < tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, "eigenvector centrality did not converge");
    }

    let scores = adjacency.ids.into_iter().zip(scores).collect();

    EigenvectorResult {
        scores,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
