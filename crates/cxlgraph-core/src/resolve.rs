//! Linking-phrase resolution.
//!
//! # Overview
//!
//! A linking phrase `P` is a labeled hyperedge: every raw link into `P`
//! names a source, every raw link out of `P` names a target. Resolution
//! expands it into the Cartesian product of direct connections:
//!
//! ```text
//!   S1 ─┐          ┌─▶ T1            S1 ─▶ T1   S1 ─▶ T2
//!       ├─▶  P  ───┤         ==>     S2 ─▶ T1   S2 ─▶ T2
//!   S2 ─┘          └─▶ T2            (all labeled with P's label)
//! ```
//!
//! Phrases never become vertices. The resulting connections share the
//! phrase's id, so per-edge provenance is only the originating phrase, not
//! a unique edge identifier.
//!
//! ## Limitations
//!
//! - A raw link from a phrase to itself is rejected as malformed.
//! - A link from one phrase to another is not chased through; the second
//!   phrase shows up as a vertex in the product of the first (degenerate
//!   case, logged as a warning).
//! - Direct concept-to-concept raw links are ignored unless
//!   [`ResolveOptions::direct_links`] is set.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::model::{Connection, PhraseRecord, RawLink, RecordSet};

/// Knobs for [`resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Also turn raw links between two concepts into connections, carrying
    /// the raw link's own id and label.
    #[serde(default)]
    pub direct_links: bool,
}

/// Fan-in and fan-out of one linking phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle<'a> {
    pub phrase: &'a PhraseRecord,
    pub sources: Vec<&'a str>,
    pub targets: Vec<&'a str>,
}

impl Bundle<'_> {
    /// Expand into `sources × targets` connections, source-major.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::with_capacity(self.sources.len() * self.targets.len());
        for source in &self.sources {
            for target in &self.targets {
                out.push(
                    Connection::new(*source, *target, self.phrase.label.as_str())
                        .with_id(self.phrase.id.as_str()),
                );
            }
        }
        out
    }
}

/// Collect the sources and targets of `phrase` from `links`.
///
/// # Errors
///
/// [`Error::MalformedDocument`] if any link runs from `phrase` to itself.
pub fn bundle<'a>(phrase: &'a PhraseRecord, links: &'a [RawLink]) -> Result<Bundle<'a>> {
    let mut sources = Vec::new();
    let mut targets = Vec::new();

    for link in links {
        if link.from_id == phrase.id && link.to_id == phrase.id {
            return Err(Error::malformed(format!(
                "connections between linking phrases aren't supported (phrase {} links to itself)",
                phrase.id
            )));
        }
        if link.to_id == phrase.id {
            sources.push(link.from_id.as_str());
        }
        if link.from_id == phrase.id {
            targets.push(link.to_id.as_str());
        }
    }

    Ok(Bundle {
        phrase,
        sources,
        targets,
    })
}

/// Resolve all linking phrases in `records` into direct connections.
///
/// Phrases are processed in document order; within a phrase the product is
/// source-major in raw-link order.
///
/// # Errors
///
/// [`Error::MalformedDocument`] on a phrase-to-itself link. Nothing is
/// returned for the other phrases in that case.
#[instrument(skip(records), fields(phrases = records.phrases.len(), links = records.links.len()))]
pub fn resolve(records: &RecordSet, options: ResolveOptions) -> Result<Vec<Connection>> {
    let mut connections = Vec::new();

    for phrase in &records.phrases {
        let bundle = bundle(phrase, &records.links)?;

        if bundle.sources.is_empty() || bundle.targets.is_empty() {
            debug!(
                phrase = %phrase.id,
                sources = bundle.sources.len(),
                targets = bundle.targets.len(),
                "phrase has an empty side; no connections"
            );
            continue;
        }

        for endpoint in bundle.sources.iter().chain(&bundle.targets) {
            if records.phrases.contains(endpoint) {
                warn!(
                    phrase = %phrase.id,
                    other = %endpoint,
                    "phrase linked to another phrase; it will appear as a vertex"
                );
            }
        }

        connections.extend(bundle.connections());
    }

    if options.direct_links {
        for link in &records.links {
            if records.concepts.contains(&link.from_id) && records.concepts.contains(&link.to_id) {
                let mut connection = Connection::new(
                    link.from_id.as_str(),
                    link.to_id.as_str(),
                    link.label.clone().unwrap_or_default(),
                );
                connection.id.clone_from(&link.id);
                connections.push(connection);
            }
        }
    }

    debug!(connections = connections.len(), "resolved linking phrases");
    Ok(connections)
}
