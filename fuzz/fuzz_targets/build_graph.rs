#![no_main]

use cxlgraph_analysis::traverse::{LinkType, link_count};
use cxlgraph_analysis::{GraphBuilder, GraphMode, find_leaves};
use cxlgraph_core::Connection;
use libfuzzer_sys::fuzz_target;

// Byte triples become edges over a 16-vertex alphabet; the last byte picks
// the label, which is numeric for even values so fuzzy builds mostly succeed.
fuzz_target!(|data: &[u8]| {
    let connections: Vec<Connection> = data
        .chunks_exact(3)
        .map(|c| {
            let label = if c[2] % 2 == 0 { (c[2] / 2).to_string() } else { "x".to_string() };
            Connection::new(format!("n{}", c[0] % 16), format!("n{}", c[1] % 16), label)
        })
        .collect();

    for mode in [GraphMode::Directed, GraphMode::Fuzzy] {
        let Ok(mut graph) = GraphBuilder::new(mode).build(&connections) else {
            continue;
        };
        let _ = link_count(&graph, None, &[LinkType::All]);
        let _ = find_leaves(&mut graph);
    }
});
