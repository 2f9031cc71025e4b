//! [`ConceptMap`]: one imported CXL document and the graph built from it.
//!
//! # Lifecycle
//!
//! ```text
//! open / from_str / from_records   → records loaded, unparsed
//! parse()                          → connections resolved, graph built
//! find_leaves()                    → isolated vertices dropped (mutates graph)
//! reload()                         → back to unparsed, records re-imported
//! ```
//!
//! Every analytic call needs a parsed map and returns
//! [`Error::Unparsed`] otherwise.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use cxlgraph_core::config::{CentralityConfig, Config};
use cxlgraph_core::{
    Connection, Error, RecordSet, ResolveOptions, Result, extract_records, load_records, resolve,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::graph::{ConceptGraph, GraphBuilder, GraphMode, Leaves, find_leaves};
use crate::metrics::{
    CenterRequest, Centers, GraphStats, NearnessMatrix, communities, density, find_centers,
    nearness,
};
use crate::render;
use crate::traverse::{LabeledEdge, LinkType, dfs_labeled_edges, link_count};

const DEFAULT_NAME: &str = "Untitled";

/// How a map is imported and built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Build an undirected graph weighted by numeric phrase labels.
    #[serde(default)]
    pub fuzzy: bool,
    #[serde(default)]
    pub resolve: ResolveOptions,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            name: default_name(),
            fuzzy: false,
            resolve: ResolveOptions::default(),
        }
    }
}

impl MapOptions {
    /// Options taken from the `[graph]` section of a config.
    #[must_use]
    pub fn from_config(config: &Config, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fuzzy: config.graph.fuzzy,
            resolve: ResolveOptions {
                direct_links: config.graph.direct_links,
            },
        }
    }

    #[must_use]
    pub const fn mode(&self) -> GraphMode {
        GraphMode::from_fuzzy(self.fuzzy)
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Text(String),
    Records,
}

#[derive(Debug, Clone)]
struct Parsed {
    connections: Vec<Connection>,
    graph: ConceptGraph,
    leaves: Option<Leaves>,
}

/// An imported concept map.
#[derive(Debug, Clone)]
pub struct ConceptMap {
    source: Source,
    options: MapOptions,
    records: RecordSet,
    parsed: Option<Parsed>,
}

impl ConceptMap {
    /// Import a CXL file. The map starts unparsed.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file cannot be read,
    /// [`Error::MalformedDocument`] if it is not a usable CXL document.
    pub fn open(path: impl AsRef<Path>, options: MapOptions) -> Result<Self> {
        let path = path.as_ref();
        let records = load_records(path)?;
        info!(path = %path.display(), concepts = records.concepts.len(), "imported concept map");
        Ok(Self {
            source: Source::File(path.to_path_buf()),
            options,
            records,
            parsed: None,
        })
    }

    /// Import CXL text held in memory.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDocument`] if the text is not a usable CXL document.
    pub fn from_str(xml: &str, options: MapOptions) -> Result<Self> {
        let records = extract_records(xml)?;
        Ok(Self {
            source: Source::Text(xml.to_string()),
            options,
            records,
            parsed: None,
        })
    }

    /// Wrap records that were extracted elsewhere.
    #[must_use]
    pub const fn from_records(records: RecordSet, options: MapOptions) -> Self {
        Self {
            source: Source::Records,
            options,
            records,
            parsed: None,
        }
    }

    /// Re-import the source document and drop the graph.
    ///
    /// Maps built with [`ConceptMap::from_records`] keep their records.
    ///
    /// # Errors
    ///
    /// Same as [`ConceptMap::open`] / [`ConceptMap::from_str`].
    pub fn reload(&mut self) -> Result<()> {
        let records = match &self.source {
            Source::File(path) => load_records(path)?,
            Source::Text(xml) => extract_records(xml)?,
            Source::Records => std::mem::take(&mut self.records),
        };
        self.records = records;
        self.parsed = None;
        debug!(name = %self.options.name, "reloaded concept map");
        Ok(())
    }

    /// Resolve linking phrases and build the graph. Parsing again rebuilds
    /// from the records, undoing any [`ConceptMap::find_leaves`] removals.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDocument`] for a phrase linked to itself,
    /// [`Error::InvalidWeight`] for a non-numeric label in fuzzy mode.
    #[instrument(skip(self), fields(name = %self.options.name))]
    pub fn parse(&mut self) -> Result<()> {
        self.parsed = None;
        let connections = resolve(&self.records, self.options.resolve).map_err(|e| self.locate(e))?;
        let graph = GraphBuilder::new(self.options.mode()).build(&connections)?;
        self.parsed = Some(Parsed {
            connections,
            graph,
            leaves: None,
        });
        Ok(())
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.parsed.is_some()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.options.name
    }

    #[must_use]
    pub const fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Path of the imported file, if the map came from one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(path) => Some(path),
            Source::Text(_) | Source::Records => None,
        }
    }

    #[must_use]
    pub const fn records(&self) -> &RecordSet {
        &self.records
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn graph(&self) -> Result<&ConceptGraph> {
        Ok(&self.require("graph")?.graph)
    }

    /// Mutable access to the graph. Any change invalidates derived scores.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn graph_mut(&mut self) -> Result<&mut ConceptGraph> {
        Ok(&mut self.require_mut("graph_mut")?.graph)
    }

    /// Resolved connections in resolution order.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn connections(&self) -> Result<&[Connection]> {
        Ok(&self.require("connections")?.connections)
    }

    /// Find roots and leaves, removing isolated vertices from the graph.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn find_leaves(&mut self) -> Result<&Leaves> {
        let parsed = self.require_mut("find_leaves")?;
        let leaves = find_leaves(&mut parsed.graph);
        Ok(parsed.leaves.insert(leaves))
    }

    /// Result of the last [`ConceptMap::find_leaves`] since parsing.
    #[must_use]
    pub fn leaves(&self) -> Option<&Leaves> {
        self.parsed.as_ref().and_then(|p| p.leaves.as_ref())
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn density(&self) -> Result<f64> {
        Ok(density(&self.require("density")?.graph))
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn stats(&self) -> Result<GraphStats> {
        Ok(GraphStats::from_graph(&self.require("stats")?.graph))
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`]; see
    /// [`find_centers`] for the rest.
    pub fn find_centers(
        &self,
        request: CenterRequest,
        config: &CentralityConfig,
    ) -> Result<Option<Centers>> {
        find_centers(&self.require("find_centers")?.graph, request, config)
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`]; see
    /// [`communities`] for the rest.
    pub fn communities(&self, resolution: f64, seed: Option<u64>) -> Result<Vec<BTreeSet<String>>> {
        communities(&self.require("communities")?.graph, resolution, seed)
    }

    /// Count DFS events of the given types from `root`.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`],
    /// [`Error::UnknownNode`] if `root` is not a vertex.
    pub fn link_count(&self, root: Option<&str>, types: &[LinkType]) -> Result<usize> {
        link_count(&self.require("link_count")?.graph, root, types)
    }

    /// Full labeled DFS event list.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`],
    /// [`Error::UnknownNode`] if `root` is not a vertex.
    pub fn labeled_edges(
        &self,
        root: Option<&str>,
        depth_limit: Option<usize>,
    ) -> Result<Vec<LabeledEdge>> {
        dfs_labeled_edges(&self.require("labeled_edges")?.graph, root, depth_limit)
    }

    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn nearness(&self, directed: bool) -> Result<NearnessMatrix> {
        Ok(nearness(&self.require("nearness")?.graph, directed))
    }

    /// Vertex id → display label.
    ///
    /// # Errors
    ///
    /// [`Error::Unparsed`] before [`ConceptMap::parse`].
    pub fn label_map(&self) -> Result<BTreeMap<String, String>> {
        Ok(render::label_map(&self.records, &self.require("label_map")?.graph))
    }

    fn require(&self, operation: &'static str) -> Result<&Parsed> {
        self.parsed.as_ref().ok_or(Error::Unparsed { operation })
    }

    fn require_mut(&mut self, operation: &'static str) -> Result<&mut Parsed> {
        self.parsed.as_mut().ok_or(Error::Unparsed { operation })
    }

    fn locate(&self, err: Error) -> Error {
        match self.path() {
            Some(path) => err.with_path(path),
            None => err,
        }
    }
}

impl fmt::Display for ConceptMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            None => f.write_str("Unparsed map"),
            Some(parsed) => write!(
                f,
                "{}: {} nodes with {} connections between them",
                self.options.name,
                parsed.graph.node_count(),
                parsed.graph.edge_count()
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
