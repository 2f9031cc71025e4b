//! `cxg stats`: summary of one concept map.

use std::io::Write;

use clap::Args;
use cxlgraph_analysis::{GraphStats, ScoredMap};
use cxlgraph_core::Config;
use serde::Serialize;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, kv, render, section};

/// Arguments for `cxg stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub map: MapArgs,
}

/// Report payload for `cxg stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub name: String,
    pub summary: String,
    pub fingerprint: Option<String>,
    pub concepts: usize,
    pub linking_phrases: usize,
    pub raw_links: usize,
    pub connections: usize,
    pub community_count: usize,
    #[serde(flatten)]
    pub graph: GraphStats,
}

/// Execute `cxg stats`.
pub fn run_stats(args: &StatsArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;
    let mut scored = ScoredMap::new(map);
    scored.score_communities(config.community.resolution, config.community.seed)?;

    let map = scored.map();
    let records = map.records();
    let report = StatsReport {
        name: map.name().to_string(),
        summary: map.to_string(),
        fingerprint: scored.fingerprint(),
        concepts: records.concepts.len(),
        linking_phrases: records.phrases.len(),
        raw_links: records.links.len(),
        connections: map.connections()?.len(),
        community_count: scored.communities().map_or(0, <[_]>::len),
        graph: map.stats()?,
    };

    render(output, &report, render_stats_human)
}

fn render_stats_human(report: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, &report.summary)?;
    kv(w, "concepts", report.concepts.to_string())?;
    kv(w, "phrases", report.linking_phrases.to_string())?;
    kv(w, "raw links", report.raw_links.to_string())?;
    kv(w, "connections", report.connections.to_string())?;
    kv(w, "mode", format!("{:?}", report.graph.mode).to_lowercase())?;
    kv(w, "density", format!("{:.4}", report.graph.density))?;
    kv(w, "components", report.graph.weakly_connected_component_count.to_string())?;
    kv(w, "isolated", report.graph.isolated_node_count.to_string())?;
    kv(w, "max in-degree", report.graph.max_in_degree.to_string())?;
    kv(w, "max out-degree", report.graph.max_out_degree.to_string())?;
    kv(w, "communities", report.community_count.to_string())
}
