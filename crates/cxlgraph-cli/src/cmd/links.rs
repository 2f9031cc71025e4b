//! `cxg links`: count depth-first link classes from a root concept.

use std::io::Write;

use clap::{Args, ValueEnum};
use cxlgraph_analysis::LabeledEdge;
use cxlgraph_analysis::LinkType;
use cxlgraph_analysis::traverse::count_links;
use cxlgraph_core::Config;
use serde::Serialize;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, kv, render, section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Tree,
    Reverse,
    Cross,
    All,
}

impl From<KindArg> for LinkType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Tree => Self::Tree,
            KindArg::Reverse => Self::Reverse,
            KindArg::Cross => Self::Cross,
            KindArg::All => Self::All,
        }
    }
}

/// Arguments for `cxg links`.
#[derive(Args, Debug)]
pub struct LinksArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Concept id to start the search from.
    #[arg(long)]
    pub root: String,

    /// Link classes to count.
    #[arg(long, value_enum, value_delimiter = ',', default_value = "cross")]
    pub kind: Vec<KindArg>,

    /// Maximum search depth (default: from config, else the concept count).
    #[arg(long)]
    pub depth_limit: Option<usize>,

    /// Include every search event in the output.
    #[arg(long)]
    pub events: bool,
}

#[derive(Debug, Serialize)]
pub struct LinksReport {
    pub root: String,
    pub kinds: Vec<LinkType>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<LabeledEdge>>,
}

/// Execute `cxg links`.
pub fn run_links(args: &LinksArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;
    let kinds: Vec<LinkType> = args.kind.iter().copied().map(LinkType::from).collect();
    let depth_limit = args.depth_limit.or(config.traversal.depth_limit);

    let events = map.labeled_edges(Some(&args.root), depth_limit)?;
    let report = LinksReport {
        root: args.root.clone(),
        count: count_links(&events, &kinds),
        kinds,
        events: args.events.then_some(events),
    };

    render(output, &report, render_links_human)
}

fn render_links_human(report: &LinksReport, w: &mut dyn Write) -> std::io::Result<()> {
    let kinds: Vec<String> = report
        .kinds
        .iter()
        .map(|k| format!("{k:?}").to_lowercase())
        .collect();
    section(w, &format!("links from {}", report.root))?;
    kv(w, &kinds.join("+"), report.count.to_string())?;
    if let Some(events) = &report.events {
        for event in events {
            writeln!(w, "{} -> {} [{}]", event.from, event.to, event.kind)?;
        }
    }
    Ok(())
}
