//! Central concepts: run the requested centrality measures and collapse
//! them into a consensus when they agree.
//!
//! # Reconciliation
//!
//! | requested                                   | result                 |
//! |---------------------------------------------|------------------------|
//! | nothing                                     | `None`                 |
//! | exactly one measure                         | [`Centers::Single`]    |
//! | barycenter, center and eigenvector agree    | [`Centers::Consensus`] |
//! | anything else                               | [`Centers::Multi`]     |
//!
//! Eigenvector centrality produces scores, not a vertex set. For the
//! agreement check it is reduced to its top-scoring vertices (within
//! [`TOP_SCORE_EPSILON`] of the maximum).

use std::collections::BTreeMap;
use std::fmt;

use cxlgraph_core::Result;
use cxlgraph_core::config::CentralityConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::distance::{barycenter, center};
use super::eigenvector::eigenvector_centrality;
use super::pagerank::{PageRankConfig, pagerank};
use crate::graph::ConceptGraph;

/// Scores within this distance of the maximum count as top-scoring.
pub const TOP_SCORE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A centrality measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Barycenter,
    Center,
    Eigenvector,
    #[serde(rename = "pagerank")]
    PageRank,
}

impl Measure {
    pub const ALL: [Self; 4] = [Self::Barycenter, Self::Center, Self::Eigenvector, Self::PageRank];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Barycenter => "barycenter",
            Self::Center => "center",
            Self::Eigenvector => "eigenvector",
            Self::PageRank => "pagerank",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which measures to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CenterRequest {
    pub barycenter: bool,
    pub center: bool,
    pub eigenvector: bool,
    pub pagerank: bool,
}

impl CenterRequest {
    /// Every measure.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            barycenter: true,
            center: true,
            eigenvector: true,
            pagerank: true,
        }
    }

    /// Requested measures in [`Measure`] order.
    #[must_use]
    pub fn measures(&self) -> Vec<Measure> {
        Measure::ALL
            .into_iter()
            .filter(|m| self.wants(*m))
            .collect()
    }

    #[must_use]
    pub const fn wants(&self, measure: Measure) -> bool {
        match measure {
            Measure::Barycenter => self.barycenter,
            Measure::Center => self.center,
            Measure::Eigenvector => self.eigenvector,
            Measure::PageRank => self.pagerank,
        }
    }
}

impl FromIterator<Measure> for CenterRequest {
    fn from_iter<I: IntoIterator<Item = Measure>>(iter: I) -> Self {
        let mut request = Self::default();
        for measure in iter {
            match measure {
                Measure::Barycenter => request.barycenter = true,
                Measure::Center => request.center = true,
                Measure::Eigenvector => request.eigenvector = true,
                Measure::PageRank => request.pagerank = true,
            }
        }
        request
    }
}

/// Output of one measure: a vertex set or a score per vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralityResult {
    Set(Vec<String>),
    Scores(BTreeMap<String, f64>),
}

impl CentralityResult {
    /// The result as a sorted vertex set; scores reduce to their top set.
    #[must_use]
    pub fn top_set(&self) -> Vec<String> {
        match self {
            Self::Set(ids) => {
                let mut ids = ids.clone();
                ids.sort_unstable();
                ids
            }
            Self::Scores(scores) => top_scoring(scores),
        }
    }
}

/// Reconciled centers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Centers {
    Single(CentralityResult),
    Consensus(Vec<String>),
    Multi(BTreeMap<Measure, CentralityResult>),
}

impl Centers {
    /// Scores usable for coloring: eigenvector or PageRank scores when
    /// available, otherwise 1.0 for each member of the center set.
    #[must_use]
    pub fn scores(&self) -> BTreeMap<String, f64> {
        match self {
            Self::Single(CentralityResult::Scores(scores)) => scores.clone(),
            Self::Single(CentralityResult::Set(ids)) | Self::Consensus(ids) => set_scores(ids),
            Self::Multi(results) => {
                for measure in [Measure::Eigenvector, Measure::PageRank] {
                    if let Some(CentralityResult::Scores(scores)) = results.get(&measure) {
                        return scores.clone();
                    }
                }
                results
                    .values()
                    .next()
                    .map(|r| set_scores(&r.top_set()))
                    .unwrap_or_default()
            }
        }
    }
}

fn set_scores(ids: &[String]) -> BTreeMap<String, f64> {
    ids.iter().map(|id| (id.clone(), 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute the requested measures and reconcile them.
///
/// # Errors
///
/// Propagates [`cxlgraph_core::Error::Precondition`] from barycenter or
/// center on an empty or disconnected graph.
#[instrument(skip(cg, config))]
pub fn find_centers(
    cg: &ConceptGraph,
    request: CenterRequest,
    config: &CentralityConfig,
) -> Result<Option<Centers>> {
    let measures = request.measures();
    if measures.is_empty() {
        return Ok(None);
    }

    let mut results = BTreeMap::new();
    for measure in &measures {
        let result = compute(cg, *measure, config)?;
        results.insert(*measure, result);
    }

    if results.len() == 1 {
        return Ok(results.into_values().next().map(Centers::Single));
    }

    if let (Some(bary), Some(cent), Some(eigen)) = (
        results.get(&Measure::Barycenter),
        results.get(&Measure::Center),
        results.get(&Measure::Eigenvector),
    ) {
        let consensus = cent.top_set();
        if bary.top_set() == consensus && eigen.top_set() == consensus {
            debug!(?consensus, "centrality measures agree");
            return Ok(Some(Centers::Consensus(consensus)));
        }
    }

    Ok(Some(Centers::Multi(results)))
}

fn compute(
    cg: &ConceptGraph,
    measure: Measure,
    config: &CentralityConfig,
) -> Result<CentralityResult> {
    Ok(match measure {
        Measure::Barycenter => CentralityResult::Set(barycenter(cg)?),
        Measure::Center => CentralityResult::Set(center(cg)?),
        Measure::Eigenvector => {
            let (max_iter, tolerance) = (config.eigenvector_max_iter, config.eigenvector_tolerance);
            CentralityResult::Scores(eigenvector_centrality(cg, max_iter, tolerance).scores)
        }
        Measure::PageRank => {
            CentralityResult::Scores(pagerank(cg, &PageRankConfig::from(config)).scores)
        }
    })
}

fn top_scoring(scores: &BTreeMap<String, f64>) -> Vec<String> {
    let max = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
    scores
        .iter()
        .filter(|&(_, &s)| (max - s).abs() <= TOP_SCORE_EPSILON)
        .map(|(id, _)| id.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
