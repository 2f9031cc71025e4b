//! `cxg centers`: central concepts by one or more centrality measures.

use std::collections::BTreeMap;
use std::io::Write;

use clap::{Args, ValueEnum};
use cxlgraph_analysis::{CenterRequest, Centers, CentralityResult, Measure};
use cxlgraph_core::Config;
use serde::Serialize;
use tracing::warn;

use super::{MapArgs, load_map};
use crate::output::{OutputMode, kv, render, section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeasureArg {
    Barycenter,
    Center,
    Eigenvector,
    Pagerank,
}

impl From<MeasureArg> for Measure {
    fn from(arg: MeasureArg) -> Self {
        match arg {
            MeasureArg::Barycenter => Self::Barycenter,
            MeasureArg::Center => Self::Center,
            MeasureArg::Eigenvector => Self::Eigenvector,
            MeasureArg::Pagerank => Self::PageRank,
        }
    }
}

/// Arguments for `cxg centers`.
#[derive(Args, Debug)]
pub struct CentersArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Measures to compute (default: all; eigenvector and pagerank only when
    /// the map is disconnected). Barycenter and center fail on a disconnected
    /// map.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub measures: Vec<MeasureArg>,
}

impl CentersArgs {
    /// Explicit measures as given. Otherwise every measure, minus barycenter
    /// and center when the map is not connected.
    pub fn request(&self, connected: bool) -> CenterRequest {
        if !self.measures.is_empty() {
            return self.measures.iter().copied().map(Measure::from).collect();
        }
        if connected {
            CenterRequest::all()
        } else {
            CenterRequest {
                eigenvector: true,
                pagerank: true,
                ..CenterRequest::default()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CentersReport {
    pub name: String,
    pub measures: Vec<Measure>,
    pub labels: BTreeMap<String, String>,
    pub centers: Option<Centers>,
}

/// Execute `cxg centers`.
pub fn run_centers(args: &CentersArgs, config: &Config, output: OutputMode) -> anyhow::Result<()> {
    let map = load_map(&args.map, config)?;
    let components = map.stats()?.weakly_connected_component_count;
    let connected = components == 1;
    if args.measures.is_empty() && !connected {
        warn!(components, "map is not connected; skipping barycenter and center");
    }
    let request = args.request(connected);
    let centers = map.find_centers(request, &config.centrality)?;

    let report = CentersReport {
        name: map.name().to_string(),
        measures: request.measures(),
        labels: map.label_map()?,
        centers,
    };

    render(output, &report, render_centers_human)
}

fn render_centers_human(report: &CentersReport, w: &mut dyn Write) -> std::io::Result<()> {
    section(w, &format!("{}: centers", report.name))?;
    let label = |id: &str| report.labels.get(id).map_or(id, String::as_str).to_string();

    match &report.centers {
        None => writeln!(w, "no measures requested"),
        Some(Centers::Consensus(ids)) => {
            let names: Vec<String> = ids.iter().map(|id| label(id)).collect();
            kv(w, "consensus", names.join(", "))
        }
        Some(Centers::Single(result)) => {
            let measure = report.measures.first().map_or("result", |m| m.as_str());
            write_result(w, measure, result, &label)
        }
        Some(Centers::Multi(results)) => {
            for (measure, result) in results {
                write_result(w, measure.as_str(), result, &label)?;
            }
            Ok(())
        }
    }
}

fn write_result(
    w: &mut dyn Write,
    measure: &str,
    result: &CentralityResult,
    label: &dyn Fn(&str) -> String,
) -> std::io::Result<()> {
    match result {
        CentralityResult::Set(ids) => {
            let names: Vec<String> = ids.iter().map(|id| label(id)).collect();
            kv(w, measure, names.join(", "))
        }
        CentralityResult::Scores(scores) => {
            let mut ranked: Vec<(&String, &f64)> = scores.iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let top: Vec<String> = ranked
                .iter()
                .take(5)
                .map(|(id, score)| format!("{} ({score:.4})", label(id)))
                .collect();
            kv(w, measure, top.join(", "))
        }
    }
}
