//! Subcommand handlers.
//!
//! Every command takes a [`MapArgs`] (the file and how to build it), loads
//! and parses the map with [`load_map`], then renders one result.

pub mod centers;
pub mod communities;
pub mod leaves;
pub mod links;
pub mod nearness;
pub mod render;
pub mod stats;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use cxlgraph_analysis::{ConceptMap, MapOptions};
use cxlgraph_core::Config;
use tracing::debug;

/// Input file and graph construction flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct MapArgs {
    /// CXL concept map to analyze.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Build an undirected graph weighted by numeric linking-phrase labels.
    #[arg(long)]
    pub fuzzy: bool,

    /// Also keep raw links that join two concepts directly.
    #[arg(long)]
    pub direct_links: bool,

    /// Display name (default: the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

impl MapArgs {
    /// Map options from the config, with command-line flags taking priority.
    pub fn options(&self, config: &Config) -> MapOptions {
        let name = self.name.clone().unwrap_or_else(|| {
            self.file
                .file_stem()
                .map_or_else(|| "Untitled".to_string(), |s| s.to_string_lossy().into_owned())
        });
        let mut options = MapOptions::from_config(config, name);
        options.fuzzy |= self.fuzzy;
        options.resolve.direct_links |= self.direct_links;
        options
    }
}

/// Open and parse the map named by `args`.
pub fn load_map(args: &MapArgs, config: &Config) -> anyhow::Result<ConceptMap> {
    let options = args.options(config);
    debug!(file = %args.file.display(), fuzzy = options.fuzzy, "loading concept map");

    let mut map = ConceptMap::open(&args.file, options)
        .with_context(|| format!("failed to import {}", args.file.display()))?;
    map.parse()
        .with_context(|| format!("failed to build a graph from {}", args.file.display()))?;
    Ok(map)
}
