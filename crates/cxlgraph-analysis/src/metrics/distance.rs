//! Shortest-path metrics: barycenter, center and the nearness matrix.
//!
//! All distances are unweighted hop counts from repeated BFS, which is
//! O(V·(V+E)) overall. Concept maps are small (tens to low hundreds of
//! concepts), so there is no incremental update.
//!
//! Barycenter and center are only defined on a connected graph and are
//! computed on the undirected projection.

use cxlgraph_core::{Error, Result};
use serde::Serialize;
use tracing::instrument;

use crate::graph::{Adjacency, ConceptGraph};

/// Vertices minimizing the sum of distances to every other vertex, sorted.
///
/// # Errors
///
/// [`Error::Precondition`] when the graph is empty or its undirected
/// projection is disconnected.
#[instrument(skip(cg))]
pub fn barycenter(cg: &ConceptGraph) -> Result<Vec<String>> {
    let adjacency = connected_projection(cg, "barycenter")?;
    let totals: Vec<usize> = (0..adjacency.len())
        .map(|i| adjacency.bfs_distances(i).into_iter().flatten().sum())
        .collect();
    Ok(argmin(&adjacency, &totals))
}

/// Vertices of minimum eccentricity, sorted.
///
/// # Errors
///
/// [`Error::Precondition`] when the graph is empty or its undirected
/// projection is disconnected.
#[instrument(skip(cg))]
pub fn center(cg: &ConceptGraph) -> Result<Vec<String>> {
    let adjacency = connected_projection(cg, "center")?;
    let eccentricities: Vec<usize> = (0..adjacency.len())
        .map(|i| {
            adjacency
                .bfs_distances(i)
                .into_iter()
                .flatten()
                .max()
                .unwrap_or(0)
        })
        .collect();
    Ok(argmin(&adjacency, &eccentricities))
}

fn connected_projection(cg: &ConceptGraph, measure: &str) -> Result<Adjacency> {
    let adjacency = Adjacency::undirected(cg);
    if adjacency.is_empty() {
        return Err(Error::Precondition(format!("{measure} of an empty graph")));
    }
    if !adjacency.is_connected() {
        return Err(Error::Precondition(format!(
            "{measure} is undefined on a disconnected graph"
        )));
    }
    Ok(adjacency)
}

fn argmin(adjacency: &Adjacency, values: &[usize]) -> Vec<String> {
    let Some(&best) = values.iter().min() else {
        return Vec::new();
    };
    let mut ids: Vec<String> = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == best)
        .map(|(i, _)| adjacency.ids[i].clone())
        .collect();
    ids.sort_unstable();
    ids
}

// ---------------------------------------------------------------------------
// Nearness matrix
// ---------------------------------------------------------------------------

/// Pairwise similarity `1 / shortest_path_length`.
///
/// `values[i][j]` is the score from `ids[i]` to `ids[j]`: `None` on the
/// diagonal, `Some(0.0)` when unreachable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearnessMatrix {
    pub ids: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl NearnessMatrix {
    /// Score between two concept ids, if both are in the matrix.
    #[must_use]
    pub fn get(&self, from: &str, to: &str) -> Option<Option<f64>> {
        let i = self.ids.iter().position(|id| id == from)?;
        let j = self.ids.iter().position(|id| id == to)?;
        Some(self.values[i][j])
    }
}

/// Build the nearness matrix over the undirected projection, or over the
/// native direction when `directed` is set.
#[must_use]
#[instrument(skip(cg))]
#[allow(clippy::cast_precision_loss)]
pub fn nearness(cg: &ConceptGraph, directed: bool) -> NearnessMatrix {
    let adjacency = if directed {
        Adjacency::native(cg)
    } else {
        Adjacency::undirected(cg)
    };

    let values = (0..adjacency.len())
        .map(|i| {
            adjacency
                .bfs_distances(i)
                .into_iter()
                .map(|d| match d {
                    Some(0) => None,
                    Some(len) => Some(1.0 / len as f64),
                    None => Some(0.0),
                })
                .collect()
        })
        .collect();

    NearnessMatrix {
        ids: adjacency.ids,
        values,
    }
}
