//! Community detection by Louvain modularity optimization.
//!
//! ## The Modularity Objective
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - γ(k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! - m = total edge weight
//! - k_i = weighted degree of node i (self-loops count twice)
//! - γ = resolution: above 1 favours smaller communities, below 1 larger ones
//!
//! ## Phases
//!
//! 1. **Local moving**: each node moves to the neighboring community with the
//!    largest positive gain `w(u, C) - γ·tot(C)·k_u / 2m`, repeated until a
//!    pass makes no move.
//! 2. **Aggregation**: each community becomes one node; intra-community
//!    weight becomes a self-loop.
//!
//! Levels repeat until local moving leaves every node in place.
//!
//! Runs on the undirected projection with the weights of both directions
//! added: a directed `A → B` plus `B → A` is one edge of weight 2.0, while
//! fuzzy graphs keep their single numeric weight. Without a seed nodes are
//! visited in insertion order, so the result is deterministic.

use std::collections::{BTreeSet, HashMap};

use cxlgraph_core::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::graph::{Adjacency, ConceptGraph};

/// Gains must beat the incumbent by this much to trigger a move.
const GAIN_EPSILON: f64 = 1e-12;

/// A weighted undirected graph at one aggregation level.
#[derive(Debug, Clone)]
struct Level {
    /// Neighbor position and weight, excluding self-loops.
    adj: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl Level {
    fn from_adjacency(adjacency: &Adjacency) -> Result<Self> {
        let n = adjacency.len();
        let mut adj = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];

        for (u, (nbrs, ws)) in adjacency
            .neighbors
            .iter()
            .zip(&adjacency.weights)
            .enumerate()
        {
            for (&v, &w) in nbrs.iter().zip(ws) {
                if w < 0.0 {
                    return Err(Error::Precondition(format!(
                        "community detection needs non-negative weights, found {w} on {}",
                        adjacency.ids[u]
                    )));
                }
                if u == v {
                    self_loops[u] = w;
                } else {
                    adj[u].push((v, w));
                }
            }
        }

        Ok(Self { adj, self_loops })
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn degrees(&self) -> Vec<f64> {
        self.adj
            .iter()
            .zip(&self.self_loops)
            .map(|(nbrs, s)| nbrs.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * s)
            .collect()
    }

    /// One round of local moving. Returns the community of each node, or
    /// `None` when no node moved.
    fn local_moving(&self, resolution: f64, rng: Option<&mut StdRng>) -> Option<Vec<usize>> {
        let n = self.len();
        let degrees = self.degrees();
        let m2: f64 = degrees.iter().sum();

        let mut community: Vec<usize> = (0..n).collect();
        let mut tot = degrees.clone();

        let mut order: Vec<usize> = (0..n).collect();
        if let Some(rng) = rng {
            order.shuffle(rng);
        }

        let mut improved = false;
        loop {
            let mut moves = 0_usize;
            for &u in &order {
                let k_u = degrees[u];
                let current = community[u];

                // Weight from u into each neighboring community, first-seen order.
                let mut links: Vec<(usize, f64)> = Vec::new();
                for &(v, w) in &self.adj[u] {
                    let c = community[v];
                    match links.iter_mut().find(|(lc, _)| *lc == c) {
                        Some(entry) => entry.1 += w,
                        None => links.push((c, w)),
                    }
                }

                tot[current] -= k_u;
                let gain = |c: usize, w: f64| w - resolution * tot[c] * k_u / m2;

                let w_current = links
                    .iter()
                    .find(|(c, _)| *c == current)
                    .map_or(0.0, |(_, w)| *w);
                let mut best = current;
                let mut best_gain = gain(current, w_current);

                for &(c, w) in &links {
                    let g = gain(c, w);
                    if g > best_gain + GAIN_EPSILON {
                        best = c;
                        best_gain = g;
                    }
                }

                tot[best] += k_u;
                if best != current {
                    community[u] = best;
                    moves += 1;
                }
            }

            if moves == 0 {
                break;
            }
            improved = true;
        }

        improved.then_some(community)
    }

    /// Collapse communities (already renumbered `0..k`) into nodes.
    fn aggregate(&self, community: &[usize], k: usize) -> Self {
        let mut rows: Vec<HashMap<usize, f64>> = vec![HashMap::new(); k];
        let mut self_loops = vec![0.0; k];

        for (u, nbrs) in self.adj.iter().enumerate() {
            let cu = community[u];
            self_loops[cu] += self.self_loops[u];
            for &(v, w) in nbrs {
                let cv = community[v];
                if cu == cv {
                    // Each intra edge is visited from both ends.
                    self_loops[cu] += w / 2.0;
                } else {
                    *rows[cu].entry(cv).or_insert(0.0) += w;
                }
            }
        }

        let adj = rows
            .into_iter()
            .map(|row| {
                let mut entries: Vec<(usize, f64)> = row.into_iter().collect();
                entries.sort_unstable_by_key(|(c, _)| *c);
                entries
            })
            .collect();

        Self { adj, self_loops }
    }
}

/// Renumber community labels to `0..k` in order of first appearance.
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let renumbered = community
        .iter()
        .map(|c| {
            let next = mapping.len();
            *mapping.entry(*c).or_insert(next)
        })
        .collect();
    (renumbered, mapping.len())
}

/// Partition the concepts into communities.
///
/// Every concept appears in exactly one community. Communities are sorted,
/// which orders them by their smallest member.
///
/// # Errors
///
/// [`Error::Precondition`] if a fuzzy edge carries a negative weight.
#[instrument(skip(cg))]
pub fn communities(
    cg: &ConceptGraph,
    resolution: f64,
    seed: Option<u64>,
) -> Result<Vec<BTreeSet<String>>> {
    let adjacency = Adjacency::undirected_summed(cg);
    let mut level = Level::from_adjacency(&adjacency)?;
    let mut rng = seed.map(StdRng::seed_from_u64);

    // Community of every original node.
    let mut membership: Vec<usize> = (0..adjacency.len()).collect();

    let total_weight: f64 = level.degrees().iter().sum();
    if total_weight > 0.0 {
        let mut depth = 0_usize;
        while let Some(moved) = level.local_moving(resolution, rng.as_mut()) {
            let (community, k) = renumber(&moved);
            for slot in &mut membership {
                *slot = community[*slot];
            }
            depth += 1;
            debug!(depth, communities = k, "louvain level complete");
            level = level.aggregate(&community, k);
        }
    }

    let mut groups: HashMap<usize, BTreeSet<String>> = HashMap::new();
    for (position, community) in membership.into_iter().enumerate() {
        groups
            .entry(community)
            .or_default()
            .insert(adjacency.ids[position].clone());
    }

    let mut result: Vec<BTreeSet<String>> = groups.into_values().collect();
    result.sort();
    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, GraphMode};
    use cxlgraph_core::{Connection, ErrorCode};

    fn build(mode: GraphMode, edges: &[(&str, &str, &str)]) -> ConceptGraph {
        let connections: Vec<Connection> = edges
            .iter()
            .map(|(a, b, l)| Connection::new(*a, *b, *l))
            .collect();
        GraphBuilder::new(mode).build(&connections).expect("build")
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    const TRIANGLES: &[(&str, &str, &str)] = &[
        ("A", "B", "1"),
        ("B", "C", "1"),
        ("C", "A", "1"),
        ("D", "E", "1"),
        ("E", "F", "1"),
        ("F", "D", "1"),
    ];

    #[test]
    fn disjoint_triangles_split_in_two() {
        let g = build(GraphMode::Directed, TRIANGLES);
        let result = communities(&g, 1.0, None).expect("communities");
        assert_eq!(result, vec![set(&["A", "B", "C"]), set(&["D", "E", "F"])]);
    }

    #[test]
    fn bridged_triangles_split_in_two() {
        let mut edges = TRIANGLES.to_vec();
        edges.push(("C", "D", "1"));
        let g = build(GraphMode::Directed, &edges);
        let result = communities(&g, 1.0, None).expect("communities");
        assert_eq!(result, vec![set(&["A", "B", "C"]), set(&["D", "E", "F"])]);
    }

    #[test]
    fn high_resolution_gives_singletons() {
        let g = build(GraphMode::Directed, TRIANGLES);
        let result = communities(&g, 10.0, None).expect("communities");
        assert_eq!(result.len(), 6);
        assert!(result.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn no_edges_gives_singletons() {
        let mut g = build(GraphMode::Directed, &[]);
        for id in ["X", "Y"] {
            let idx = g.graph.add_node(id.to_string());
            g.node_map.insert(id.to_string(), idx);
        }
        let result = communities(&g, 1.0, None).expect("communities");
        assert_eq!(result, vec![set(&["X"]), set(&["Y"])]);
    }

    #[test]
    fn empty_graph_has_no_communities() {
        let g = build(GraphMode::Directed, &[]);
        assert!(communities(&g, 1.0, None).expect("communities").is_empty());
    }

    #[test]
    fn seeded_partition_covers_every_vertex_once() {
        let mut edges = TRIANGLES.to_vec();
        edges.push(("C", "D", "1"));
        let g = build(GraphMode::Directed, &edges);
        for seed in 0..8 {
            let result = communities(&g, 1.0, Some(seed)).expect("communities");
            let mut seen = BTreeSet::new();
            for community in &result {
                for id in community {
                    assert!(seen.insert(id.clone()), "{id} appears twice (seed {seed})");
                }
            }
            assert_eq!(seen.len(), 6);
        }
    }

    #[test]
    fn fuzzy_weights_drive_the_split() {
        // A path where the middle link is weak.
        let g = build(
            GraphMode::Fuzzy,
            &[("A", "B", "10"), ("B", "C", "0.1"), ("C", "D", "10")],
        );
        let result = communities(&g, 1.0, None).expect("communities");
        assert_eq!(result, vec![set(&["A", "B"]), set(&["C", "D"])]);
    }

    #[test]
    fn reciprocal_links_pull_harder() {
        // X hangs between the triangles: A → X once, X ⇄ D both ways.
        let mut edges = TRIANGLES.to_vec();
        edges.extend([("A", "X", "1"), ("X", "D", "1"), ("D", "X", "1")]);
        let g = build(GraphMode::Directed, &edges);
        let result = communities(&g, 1.0, None).expect("communities");
        assert_eq!(result, vec![set(&["A", "B", "C"]), set(&["D", "E", "F", "X"])]);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let g = build(GraphMode::Fuzzy, &[("A", "B", "-1")]);
        let err = communities(&g, 1.0, None).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Precondition);
    }
}
