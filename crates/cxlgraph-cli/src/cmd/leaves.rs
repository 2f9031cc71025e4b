//! `cxg leaves`: root and leaf concepts; isolated concepts are dropped.

use std::collections::BTreeMap;
use std::io::Write;

use clap::Args;
use cxlgraph_analysis::Leaves;
use cxlgraph_core::Config;
use serde::Serialize;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, kv, render, section};

/// Arguments for `cxg leaves`.
#[derive(Args, Debug)]
pub struct LeavesArgs {
    #[command(flatten)]
    pub map: MapArgs,
}

#[derive(Debug, Serialize)]
pub struct LeavesReport {
    pub name: String,
    #[serde(flatten)]
    pub leaves: Leaves,
    pub labels: BTreeMap<String, String>,
}

/// Execute `cxg leaves`.
pub fn run_leaves(args: &LeavesArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let mut map = load_map(&args.map, config)?;
    let labels = map.label_map()?;
    let leaves = map.find_leaves()?.clone();

    let report = LeavesReport {
        name: map.name().to_string(),
        leaves,
        labels,
    };

    render(output, &report, render_leaves_human)
}

fn render_leaves_human(report: &LeavesReport, w: &mut dyn Write) -> std::io::Result<()> {
    let names = |ids: &std::collections::BTreeSet<String>| {
        ids.iter()
            .map(|id| report.labels.get(id).map_or(id.as_str(), String::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    };
    section(w, &format!("{}: roots and leaves", report.name))?;
    kv(w, "no incoming", names(&report.leaves.no_incoming))?;
    kv(w, "no outgoing", names(&report.leaves.no_outgoing))?;
    if !report.leaves.removed.is_empty() {
        kv(w, "removed", names(&report.leaves.removed))?;
    }
    Ok(())
}
