//! `cxg communities`: Louvain communities of a concept map.

use std::io::Write;

use clap::Args;
use cxlgraph_core::Config;
use serde::Serialize;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, render, section};

/// Arguments for `cxg communities`.
#[derive(Args, Debug)]
pub struct CommunitiesArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Modularity resolution; above 1 favours smaller communities.
    #[arg(long)]
    pub resolution: Option<f64>,

    /// Seed for the node visiting order.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct Member {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct CommunitiesReport {
    pub name: String,
    pub resolution: f64,
    pub communities: Vec<Vec<Member>>,
}

/// Execute `cxg communities`.
pub fn run_communities(
    args: &CommunitiesArgs,
    config: &Config,
    output: OutputMode,
) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;
    let resolution = args.resolution.unwrap_or(config.community.resolution);
    let seed = args.seed.or(config.community.seed);

    let labels = map.label_map()?;
    let communities = map
        .communities(resolution, seed)?
        .into_iter()
        .map(|community| {
            community
                .into_iter()
                .map(|id| Member {
                    label: labels.get(&id).cloned().unwrap_or_else(|| id.clone()),
                    id,
                })
                .collect()
        })
        .collect();

    let report = CommunitiesReport {
        name: map.name().to_string(),
        resolution,
        communities,
    };

    render(output, &report, render_communities_human)
}

fn render_communities_human(report: &CommunitiesReport, w: &mut dyn Write) -> std::io::Result<()> {
    section(
        w,
        &format!(
            "{}: {} communities (resolution {})",
            report.name,
            report.communities.len(),
            report.resolution
        ),
    )?;
    for (i, community) in report.communities.iter().enumerate() {
        let names: Vec<&str> = community.iter().map(|m| m.label.as_str()).collect();
        writeln!(w, "{:>3}. {}", i + 1, names.join(", "))?;
    }
    Ok(())
}
