//! `cxg nearness`: pairwise `1 / distance` matrix.

use std::io::Write;

use clap::Args;
use cxlgraph_analysis::NearnessMatrix;
use cxlgraph_core::Config;
use serde::Serialize;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, render, section};

/// Arguments for `cxg nearness`.
#[derive(Args, Debug)]
pub struct NearnessArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Follow edge direction instead of the undirected projection.
    #[arg(long)]
    pub directed: bool,
}

#[derive(Debug, Serialize)]
pub struct NearnessReport {
    pub name: String,
    pub directed: bool,
    #[serde(flatten)]
    pub matrix: NearnessMatrix,
}

/// Execute `cxg nearness`.
pub fn run_nearness(
    args: &NearnessArgs,
    config: &Config,
    output: OutputMode,
) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;
    let report = NearnessReport {
        name: map.name().to_string(),
        directed: args.directed,
        matrix: map.nearness(args.directed)?,
    };

    render(output, &report, render_nearness_human)
}

fn render_nearness_human(report: &NearnessReport, w: &mut dyn Write) -> std::io::Result<()> {
    let width = report
        .matrix
        .ids
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(5);

    section(w, &format!("{}: nearness", report.name))?;
    write!(w, "{:width$}", "")?;
    for id in &report.matrix.ids {
        write!(w, " {id:>width$}")?;
    }
    writeln!(w)?;

    for (id, row) in report.matrix.ids.iter().zip(&report.matrix.values) {
        write!(w, "{id:width$}")?;
        for value in row {
            match value {
                Some(v) => write!(w, " {v:>width$.3}")?,
                None => write!(w, " {:>width$}", "-")?,
            }
        }
        writeln!(w)?;
    }
    Ok(())
}
