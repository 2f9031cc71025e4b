//! Property tests for linking-phrase resolution.

use std::fmt::Write as _;

use cxlgraph_core::{ResolveOptions, extract_records, resolve};
use proptest::prelude::*;

/// A CXL document with one phrase `P`, `n` sources and `m` targets.
fn fan_document(n: usize, m: usize) -> String {
    let mut concepts = String::new();
    let mut links = String::new();
    for i in 0..n {
        let _ = writeln!(concepts, r#"<concept id="s{i}" label="source {i}"/>"#);
        let _ = writeln!(links, r#"<connection id="in{i}" from-id="s{i}" to-id="P"/>"#);
    }
    for j in 0..m {
        let _ = writeln!(concepts, r#"<concept id="t{j}" label="target {j}"/>"#);
        let _ = writeln!(links, r#"<connection id="out{j}" from-id="P" to-id="t{j}"/>"#);
    }
    format!(
        r#"<cmap><res-meta/><map>
<concept-list>{concepts}</concept-list>
<linking-phrase-list><linking-phrase id="P" label="relates"/></linking-phrase-list>
<connection-list>{links}</connection-list>
</map></cmap>"#
    )
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn product_has_n_times_m_connections(n in 0_usize..6, m in 0_usize..6) {
        let records = extract_records(&fan_document(n, m)).expect("extract");
        let connections = resolve(&records, ResolveOptions::default()).expect("resolve");

        prop_assert_eq!(connections.len(), n * m);
        for c in &connections {
            prop_assert_eq!(c.label.as_str(), "relates");
            prop_assert_eq!(c.id.as_deref(), Some("P"));
            prop_assert_ne!(c.from_id.as_str(), "P");
            prop_assert_ne!(c.to_id.as_str(), "P");
        }
    }

    #[test]
    fn product_is_source_major(n in 1_usize..5, m in 1_usize..5) {
        let records = extract_records(&fan_document(n, m)).expect("extract");
        let connections = resolve(&records, ResolveOptions::default()).expect("resolve");

        for (k, c) in connections.iter().enumerate() {
            prop_assert_eq!(&c.from_id, &format!("s{}", k / m));
            prop_assert_eq!(&c.to_id, &format!("t{}", k % m));
        }
    }

    #[test]
    fn direct_links_option_does_not_touch_phrase_products(n in 0_usize..4, m in 0_usize..4) {
        let records = extract_records(&fan_document(n, m)).expect("extract");
        let plain = resolve(&records, ResolveOptions::default()).expect("resolve");
        let with_direct =
            resolve(&records, ResolveOptions { direct_links: true }).expect("resolve");
        prop_assert_eq!(plain, with_direct);
    }
}
