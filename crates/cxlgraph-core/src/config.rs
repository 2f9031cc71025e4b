use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub centrality: CentralityConfig,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Build an undirected graph weighted by numeric linking-phrase labels.
    #[serde(default)]
    pub fuzzy: bool,
    /// Also resolve raw links that connect two concepts directly.
    #[serde(default)]
    pub direct_links: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityConfig {
    #[serde(default = "default_max_iter")]
    pub eigenvector_max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub eigenvector_tolerance: f64,
    #[serde(default = "default_damping")]
    pub pagerank_damping: f64,
    #[serde(default = "default_tolerance")]
    pub pagerank_tolerance: f64,
    #[serde(default = "default_max_iter")]
    pub pagerank_max_iter: usize,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            eigenvector_max_iter: default_max_iter(),
            eigenvector_tolerance: default_tolerance(),
            pagerank_damping: default_damping(),
            pagerank_tolerance: default_tolerance(),
            pagerank_max_iter: default_max_iter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Modularity resolution; above 1 favours smaller communities.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// Seed for shuffling the node visiting order. Unset keeps insertion order.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Maximum DFS depth. Unset means the vertex count.
    #[serde(default)]
    pub depth_limit: Option<usize>,
}

/// Load configuration from an explicit file.
///
/// # Errors
///
/// [`Error::ConfigUnreadable`] if the file cannot be read, [`Error::Config`]
/// if it is not valid TOML for [`Config`].
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<Config>(&content).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// Default per-user config location: `<config dir>/cxlgraph/config.toml`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cxlgraph/config.toml"))
}

/// Resolve the effective configuration: the explicit path if given, else the
/// user config file when it exists, else defaults.
///
/// # Errors
///
/// Propagates [`load_config`] errors. A missing user config is not an error.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match user_config_path() {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "loading user config");
            load_config(&path)
        }
        _ => Ok(Config::default()),
    }
}

const fn default_max_iter() -> usize {
    100
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_resolution() -> f64 {
    1.0
}
