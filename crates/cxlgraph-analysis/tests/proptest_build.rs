//! Property tests for graph construction and DFS classification.

use std::collections::HashSet;

use cxlgraph_analysis::traverse::{LinkType, count_links, dfs_labeled_edges};
use cxlgraph_analysis::{GraphBuilder, GraphMode, metrics::density};
use cxlgraph_core::Connection;
use proptest::prelude::*;

/// Distinct directed pairs over a small alphabet, first occurrence kept.
fn distinct_pairs(raw: Vec<(u8, u8)>) -> Vec<(u8, u8)> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|&(a, b)| a != b && seen.insert((a, b)))
        .collect()
}

fn to_connections(pairs: &[(u8, u8)]) -> Vec<Connection> {
    pairs
        .iter()
        .map(|(a, b)| Connection::new(format!("c{a}"), format!("c{b}"), format!("{a}->{b}")))
        .collect()
}

fn arb_pairs() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0_u8..8, 0_u8..8), 0..30).prop_map(distinct_pairs)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    /// Walking the edges gives back exactly the connections that went in.
    #[test]
    fn connections_round_trip(pairs in arb_pairs()) {
        let input = to_connections(&pairs);
        let g = GraphBuilder::new(GraphMode::Directed).build(&input).expect("build");

        prop_assert_eq!(g.connections(), input);
        prop_assert_eq!(g.edge_count(), pairs.len());

        let endpoints: HashSet<u8> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        prop_assert_eq!(g.node_count(), endpoints.len());
    }

    /// The fingerprint depends on the node and edge sets, not on input order.
    #[test]
    fn fingerprint_ignores_input_order(
        (pairs, shuffled) in arb_pairs().prop_flat_map(|pairs| {
            let original = pairs.clone();
            Just(pairs).prop_shuffle().prop_map(move |s| (original.clone(), s))
        })
    ) {
        let builder = GraphBuilder::new(GraphMode::Directed);
        let a = builder.build(&to_connections(&pairs)).expect("build");
        let b = builder.build(&to_connections(&shuffled)).expect("build");
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }

    /// Without self loops a directed graph never exceeds density 1.
    #[test]
    fn density_is_a_fraction(pairs in arb_pairs()) {
        let g = GraphBuilder::new(GraphMode::Directed)
            .build(&to_connections(&pairs))
            .expect("build");
        let d = density(&g);
        prop_assert!((0.0..=1.0).contains(&d), "density {}", d);
    }

    /// A whole-graph search discovers and finishes every vertex once.
    #[test]
    fn full_search_balances_tree_and_reverse(pairs in arb_pairs(), fuzzy in any::<bool>()) {
        let mode = GraphMode::from_fuzzy(fuzzy);
        let connections: Vec<Connection> = to_connections(&pairs)
            .into_iter()
            .map(|mut c| {
                c.label = "1".to_string();
                c
            })
            .collect();
        let g = GraphBuilder::new(mode).build(&connections).expect("build");
        let events = dfs_labeled_edges(&g, None, None).expect("no root");

        let n = g.node_count();
        prop_assert_eq!(count_links(&events, &[LinkType::Tree]), n);
        prop_assert_eq!(count_links(&events, &[LinkType::Reverse]), n);
        prop_assert_eq!(
            count_links(&events, &[LinkType::All]),
            2 * n + count_links(&events, &[LinkType::Cross])
        );
    }
}
