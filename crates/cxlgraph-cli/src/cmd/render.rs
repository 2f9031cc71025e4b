//! `cxg render`: emit the drawing hand-off for an external renderer.

use std::io::Write;

use clap::Args;
use cxlgraph_analysis::CenterRequest;
use cxlgraph_analysis::render::{RenderPlan, color_from_centers, render_plan};
use cxlgraph_core::Config;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, render, section};

/// Arguments for `cxg render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Color nodes by eigenvector centrality.
    #[arg(long)]
    pub colors: bool,
}

/// Execute `cxg render`.
pub fn run_render(args: &RenderArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;

    let colors = if args.colors {
        let request = CenterRequest {
            eigenvector: true,
            ..CenterRequest::default()
        };
        let centers = map.find_centers(request, &config.centrality)?;
        Some(color_from_centers(centers.as_ref())?)
    } else {
        None
    };

    let plan = render_plan(map.records(), map.graph()?, colors.as_ref());
    render(output, &plan, render_plan_human)
}

fn render_plan_human(plan: &RenderPlan, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, "nodes")?;
    for node in &plan.nodes {
        let (x, y) = node.position;
        match node.color {
            Some(c) => writeln!(
                w,
                "{} \"{}\" at ({x:.3}, {y:.3}) color {c:.3}",
                node.id, node.label
            )?,
            None => writeln!(w, "{} \"{}\" at ({x:.3}, {y:.3})", node.id, node.label)?,
        }
    }
    section(w, "edges")?;
    for edge in &plan.edges {
        writeln!(w, "{} -> {} \"{}\"", edge.from, edge.to, edge.label)?;
    }
    Ok(())
}
