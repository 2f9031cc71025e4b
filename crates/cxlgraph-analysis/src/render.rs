//! Hand-off data for drawing a concept map.
//!
//! Nothing here draws. [`RenderPlan`] bundles what a renderer needs: node
//! labels, a shell (circle) layout, edge labels and optional node colors in
//! `[0, 1]` derived from centrality scores.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use cxlgraph_core::{Error, RecordSet, Result};
use serde::Serialize;

use crate::graph::ConceptGraph;
use crate::metrics::Centers;

/// Vertex id → display label. Concepts use their label; anything else (a
/// phrase that became a vertex) shows its id.
#[must_use]
pub fn label_map(records: &RecordSet, cg: &ConceptGraph) -> BTreeMap<String, String> {
    cg.concept_ids()
        .map(|id| (id.to_string(), records.display_label(id).to_string()))
        .collect()
}

/// Scale scores into `[0, 1]` by dividing by the maximum. All zeros when the
/// maximum is not positive.
#[must_use]
pub fn color_scale(scores: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = scores.values().copied().fold(0.0_f64, f64::max);
    scores
        .iter()
        .map(|(id, &s)| {
            let scaled = if max > 0.0 { s / max } else { 0.0 };
            (id.clone(), scaled)
        })
        .collect()
}

/// Node colors from a [`Centers`] result.
///
/// # Errors
///
/// [`Error::Precondition`] when no centers were computed.
pub fn color_from_centers(centers: Option<&Centers>) -> Result<BTreeMap<String, f64>> {
    let centers = centers.ok_or_else(|| Error::Precondition("no centers to color by".to_string()))?;
    Ok(color_scale(&centers.scores()))
}

/// Positions on one circle of radius `scale`, in the given order. A single
/// node sits at the origin.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn shell_layout(ids: &[String], scale: f64) -> BTreeMap<String, (f64, f64)> {
    if let [only] = ids {
        return BTreeMap::from([(only.clone(), (0.0, 0.0))]);
    }
    let n = ids.len() as f64;
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let theta = TAU * i as f64 / n;
            (id.clone(), (scale * theta.cos(), scale * theta.sin()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub position: (f64, f64),
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Assemble a [`RenderPlan`] in vertex and edge insertion order.
#[must_use]
pub fn render_plan(
    records: &RecordSet,
    cg: &ConceptGraph,
    colors: Option<&BTreeMap<String, f64>>,
) -> RenderPlan {
    let ids: Vec<String> = cg.concept_ids().map(str::to_string).collect();
    let labels = label_map(records, cg);
    let positions = shell_layout(&ids, 2.0);

    let nodes = ids
        .iter()
        .map(|id| RenderNode {
            id: id.clone(),
            label: labels.get(id).cloned().unwrap_or_else(|| id.clone()),
            position: positions.get(id).copied().unwrap_or((0.0, 0.0)),
            color: colors.and_then(|c| c.get(id).copied()),
        })
        .collect();

    let edges = cg
        .connections()
        .into_iter()
        .map(|c| RenderEdge {
            from: c.from_id,
            to: c.to_id,
            label: c.label,
        })
        .collect();

    RenderPlan { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, GraphMode};
    use cxlgraph_core::model::{Attributes, ConceptRecord};
    use cxlgraph_core::{Connection, ErrorCode};

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn color_scale_divides_by_max() {
        let scaled = color_scale(&scores(&[("A", 2.0), ("B", 1.0), ("C", 0.0)]));
        assert!((scaled["A"] - 1.0).abs() < f64::EPSILON);
        assert!((scaled["B"] - 0.5).abs() < f64::EPSILON);
        assert!(scaled["C"].abs() < f64::EPSILON);
    }

    #[test]
    fn color_scale_all_zero() {
        let scaled = color_scale(&scores(&[("A", 0.0), ("B", 0.0)]));
        assert!(scaled.values().all(|v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn colors_need_centers() {
        let err = color_from_centers(None).expect_err("no centers");
        assert_eq!(err.code(), ErrorCode::Precondition);

        let centers = Centers::Consensus(vec!["A".to_string()]);
        let colors = color_from_centers(Some(&centers)).expect("colors");
        assert!((colors["A"] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shell_layout_on_circle() {
        let ids: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| (*s).to_string()).collect();
        let pos = shell_layout(&ids, 2.0);
        for (x, y) in pos.values() {
            assert!(((x * x + y * y).sqrt() - 2.0).abs() < 1e-9);
        }
        assert!((pos["A"].0 - 2.0).abs() < 1e-9);

        let single = shell_layout(&ids[..1], 2.0);
        assert_eq!(single["A"], (0.0, 0.0));
    }

    #[test]
    fn plan_falls_back_to_ids_for_non_concepts() {
        let mut records = RecordSet::default();
        records.concepts.insert(ConceptRecord {
            id: "A".to_string(),
            label: "Alpha".to_string(),
            attributes: Attributes::new(),
        });
        let g = GraphBuilder::new(GraphMode::Directed)
            .build(&[Connection::new("A", "P", "is")])
            .expect("build");

        let plan = render_plan(&records, &g, None);
        let labels: Vec<&str> = plan.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["Alpha", "P"]);
        assert_eq!(plan.edges.len(), 1);
        assert_eq!(plan.edges[0].label, "is");
        assert!(plan.nodes.iter().all(|n| n.color.is_none()));
    }
}
