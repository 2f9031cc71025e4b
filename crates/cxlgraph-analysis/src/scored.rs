//! [`ScoredMap`]: a [`ConceptMap`] plus cached derived values.
//!
//! Each cached value is stamped with the graph fingerprint it was computed
//! against. Getters return `None` once the graph has changed (for example
//! after [`ConceptMap::find_leaves`] removed a vertex), so a stale score is
//! never handed out.

use std::collections::BTreeSet;

use cxlgraph_core::Result;
use cxlgraph_core::config::{CentralityConfig, CommunityConfig};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::map::ConceptMap;
use crate::metrics::{CenterRequest, Centers, NearnessMatrix};

/// A value and the fingerprint of the graph it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stamped<T> {
    pub fingerprint: String,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct ScoredMap {
    map: ConceptMap,
    density: Option<Stamped<f64>>,
    centers: Option<Stamped<Centers>>,
    communities: Option<Stamped<Vec<BTreeSet<String>>>>,
    nearness: Option<Stamped<NearnessMatrix>>,
}

impl ScoredMap {
    #[must_use]
    pub const fn new(map: ConceptMap) -> Self {
        Self {
            map,
            density: None,
            centers: None,
            communities: None,
            nearness: None,
        }
    }

    #[must_use]
    pub const fn map(&self) -> &ConceptMap {
        &self.map
    }

    /// Mutable access to the wrapped map. Cached values stay in place and
    /// go stale if the graph changes.
    pub fn map_mut(&mut self) -> &mut ConceptMap {
        &mut self.map
    }

    #[must_use]
    pub fn into_inner(self) -> ConceptMap {
        self.map
    }

    /// Fingerprint of the current graph, `None` while unparsed.
    #[must_use]
    pub fn fingerprint(&self) -> Option<String> {
        self.map.graph().ok().map(|g| g.fingerprint())
    }

    /// Compute density, communities and the nearness matrix.
    ///
    /// Centers are left out: barycenter and center fail on disconnected
    /// maps. Use [`ScoredMap::score_centers`] for those.
    ///
    /// # Errors
    ///
    /// [`cxlgraph_core::Error::Unparsed`] before the map is parsed, or any
    /// error from community detection.
    #[instrument(skip(self, community), fields(name = %self.map.name()))]
    pub fn score(&mut self, community: &CommunityConfig) -> Result<()> {
        self.score_density()?;
        self.score_communities(community.resolution, community.seed)?;
        self.score_nearness(false)?;
        debug!("scored map");
        Ok(())
    }

    /// # Errors
    ///
    /// [`cxlgraph_core::Error::Unparsed`] before the map is parsed.
    pub fn score_density(&mut self) -> Result<f64> {
        let value = self.map.density()?;
        self.density = Some(self.stamp(value)?);
        Ok(value)
    }

    /// # Errors
    ///
    /// See [`ConceptMap::find_centers`].
    pub fn score_centers(
        &mut self,
        request: CenterRequest,
        config: &CentralityConfig,
    ) -> Result<Option<&Centers>> {
        self.centers = match self.map.find_centers(request, config)? {
            Some(centers) => Some(self.stamp(centers)?),
            None => None,
        };
        Ok(self.centers.as_ref().map(|s| &s.value))
    }

    /// # Errors
    ///
    /// See [`ConceptMap::communities`].
    pub fn score_communities(
        &mut self,
        resolution: f64,
        seed: Option<u64>,
    ) -> Result<&[BTreeSet<String>]> {
        let value = self.map.communities(resolution, seed)?;
        let stamped = self.stamp(value)?;
        Ok(&self.communities.insert(stamped).value)
    }

    /// # Errors
    ///
    /// [`cxlgraph_core::Error::Unparsed`] before the map is parsed.
    pub fn score_nearness(&mut self, directed: bool) -> Result<&NearnessMatrix> {
        let value = self.map.nearness(directed)?;
        let stamped = self.stamp(value)?;
        Ok(&self.nearness.insert(stamped).value)
    }

    #[must_use]
    pub fn density(&self) -> Option<f64> {
        self.fresh(self.density.as_ref()).copied()
    }

    #[must_use]
    pub fn centers(&self) -> Option<&Centers> {
        self.fresh(self.centers.as_ref())
    }

    #[must_use]
    pub fn communities(&self) -> Option<&[BTreeSet<String>]> {
        self.fresh(self.communities.as_ref()).map(Vec::as_slice)
    }

    #[must_use]
    pub fn nearness(&self) -> Option<&NearnessMatrix> {
        self.fresh(self.nearness.as_ref())
    }

    fn stamp<T>(&self, value: T) -> Result<Stamped<T>> {
        Ok(Stamped {
            fingerprint: self.map.graph()?.fingerprint(),
            value,
        })
    }

    fn fresh<'a, T>(&self, slot: Option<&'a Stamped<T>>) -> Option<&'a T> {
        let slot = slot?;
        let current = self.fingerprint()?;
        (slot.fingerprint == current).then_some(&slot.value)
    }
}
