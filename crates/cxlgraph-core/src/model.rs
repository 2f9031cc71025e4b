//! Records extracted from a concept map and the resolved [`Connection`] form.
//!
//! Concepts and linking phrases are kept in document order. Lookups by id go
//! through a side index; a later record with the same id replaces the earlier
//! one in place, so iteration order stays the order of first appearance.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

/// Verbatim attribute bag of one markup element.
pub type Attributes = BTreeMap<String, String>;

/// A concept: one vertex of the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRecord {
    pub id: String,
    pub label: String,
    pub attributes: Attributes,
}

/// A linking phrase: a labeled relation that is resolved away and never
/// becomes a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseRecord {
    pub id: String,
    pub label: String,
    pub attributes: Attributes,
}

/// A raw pairwise link between two concept or phrase ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawLink {
    pub id: Option<String>,
    pub label: Option<String>,
    pub from_id: String,
    pub to_id: String,
    pub attributes: Attributes,
}

/// A resolved concept-to-concept edge.
///
/// Connections produced by phrase bundling carry the phrase id in `id`. Every
/// connection of one bundle shares that id, so it identifies the originating
/// phrase, not the individual edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Connection {
    pub from_id: String,
    pub to_id: String,
    pub label: String,
    pub id: Option<String>,
}

impl Connection {
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            label: label.into(),
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label: {} id:{} {}->{}",
            self.label,
            self.id.as_deref().unwrap_or("-"),
            self.from_id,
            self.to_id
        )
    }
}

/// Records that carry a unique identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for ConceptRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for PhraseRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Document-ordered collection with id lookup.
#[derive(Debug, Clone)]
pub struct Keyed<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Identified> Keyed<T> {
    /// Insert a record, replacing any earlier record with the same id.
    pub fn insert(&mut self, item: T) {
        if let Some(&slot) = self.index.get(item.id()) {
            self.items[slot] = item;
        } else {
            self.index.insert(item.id().to_string(), self.items.len());
            self.items.push(item);
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.items[slot])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

impl<T> Keyed<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Identified> FromIterator<T> for Keyed<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut keyed = Self::default();
        for item in iter {
            keyed.insert(item);
        }
        keyed
    }
}

impl<'a, T> IntoIterator for &'a Keyed<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The three record collections of one concept map.
///
/// Links are added through [`RecordSet::insert_link`] so that a later link
/// with the same id replaces the earlier one. Links without an id are kept
/// positionally.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub concepts: Keyed<ConceptRecord>,
    pub phrases: Keyed<PhraseRecord>,
    pub links: Vec<RawLink>,
    link_index: HashMap<String, usize>,
}

impl RecordSet {
    /// Add a raw link, replacing any earlier link with the same id in place.
    pub fn insert_link(&mut self, link: RawLink) {
        let Some(id) = link.id.clone() else {
            self.links.push(link);
            return;
        };
        if let Some(&slot) = self.link_index.get(&id) {
            self.links[slot] = link;
        } else {
            self.link_index.insert(id, self.links.len());
            self.links.push(link);
        }
    }

    /// Concepts keyed by label, only when every label is unique.
    #[must_use]
    pub fn concepts_by_label(&self) -> Option<HashMap<&str, &ConceptRecord>> {
        let mut by_label = HashMap::with_capacity(self.concepts.len());
        for concept in &self.concepts {
            if by_label.insert(concept.label.as_str(), concept).is_some() {
                return None;
            }
        }
        Some(by_label)
    }

    /// Phrases keyed by label, only when every label is unique.
    #[must_use]
    pub fn phrases_by_label(&self) -> Option<HashMap<&str, &PhraseRecord>> {
        let mut by_label = HashMap::with_capacity(self.phrases.len());
        for phrase in &self.phrases {
            if by_label.insert(phrase.label.as_str(), phrase).is_some() {
                return None;
            }
        }
        Some(by_label)
    }

    /// Display label for a vertex id: the concept label, or the id itself for
    /// anything that is not a concept.
    #[must_use]
    pub fn display_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.concepts.get(id).map_or(id, |c| c.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(id: &str, label: &str) -> ConceptRecord {
        ConceptRecord {
            id: id.to_string(),
            label: label.to_string(),
            attributes: Attributes::new(),
        }
    }

    fn link(id: Option<&str>, from: &str, to: &str) -> RawLink {
        RawLink {
            id: id.map(str::to_string),
            label: None,
            from_id: from.to_string(),
            to_id: to.to_string(),
            attributes: Attributes::new(),
        }
    }

    #[test]
    fn links_with_the_same_id_replace_in_place() {
        let mut set = RecordSet::default();
        set.insert_link(link(Some("L1"), "A", "P"));
        set.insert_link(link(Some("L2"), "P", "C"));
        set.insert_link(link(Some("L1"), "B", "P"));

        let ends: Vec<(&str, &str)> = set
            .links
            .iter()
            .map(|l| (l.from_id.as_str(), l.to_id.as_str()))
            .collect();
        assert_eq!(ends, vec![("B", "P"), ("P", "C")]);
    }

    #[test]
    fn links_without_id_stay_positional() {
        let mut set = RecordSet::default();
        set.insert_link(link(None, "A", "P"));
        set.insert_link(link(None, "A", "P"));
        assert_eq!(set.links.len(), 2);
    }

    #[test]
    fn keyed_keeps_first_position_on_replace() {
        let keyed: Keyed<ConceptRecord> = [
            concept("1", "one"),
            concept("2", "two"),
            concept("1", "uno"),
        ]
        .into_iter()
        .collect();

        assert_eq!(keyed.len(), 2);
        let labels: Vec<&str> = keyed.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["uno", "two"]);
        assert_eq!(keyed.get("1").map(|c| c.label.as_str()), Some("uno"));
    }

    #[test]
    fn concepts_by_label_requires_unique_labels() {
        let mut records = RecordSet::default();
        records.concepts.insert(concept("1", "cell"));
        records.concepts.insert(concept("2", "wall"));
        assert!(records.concepts_by_label().is_some());

        records.concepts.insert(concept("3", "cell"));
        assert!(records.concepts_by_label().is_none());
    }

    #[test]
    fn display_label_falls_back_to_id() {
        let mut records = RecordSet::default();
        records.concepts.insert(concept("c1", "Bacteria"));
        assert_eq!(records.display_label("c1"), "Bacteria");
        assert_eq!(records.display_label("p9"), "p9");
    }

    #[test]
    fn connection_display() {
        let c = Connection::new("a", "b", "has").with_id("p1");
        assert_eq!(c.to_string(), "Label: has id:p1 a->b");
    }
}
