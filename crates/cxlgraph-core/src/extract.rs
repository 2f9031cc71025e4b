//! CXL record extraction.
//!
//! # Document Layout
//!
//! ```text
//! <cmap>
//!   <res-meta> … </res-meta>
//!   <map>
//!     <concept-list>         ← section 0: concepts
//!     <linking-phrase-list>  ← section 1: linking phrases
//!     <connection-list>      ← section 2: raw links
//!     …appearance lists, ignored
//!   </map>
//! </cmap>
//! ```
//!
//! Sections are located by position, not by tag name. Every element within a
//! section (the section element included) that carries at least one
//! attribute becomes a record; attribute-less elements are structural and
//! skipped.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::model::{Attributes, ConceptRecord, PhraseRecord, RawLink, RecordSet};

const MAP_POSITION: usize = 1;
const CONCEPT_SECTION: usize = 0;
const PHRASE_SECTION: usize = 1;
const LINK_SECTION: usize = 2;

/// Read and extract records from a CXL file.
///
/// # Errors
///
/// [`Error::NotFound`] if the file cannot be read, [`Error::MalformedDocument`]
/// (carrying `path`) if it does not have the expected structure.
#[instrument]
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::NotFound {
        path: path.to_path_buf(),
        source: Some(source),
    })?;
    extract_records(&text).map_err(|err| err.with_path(path))
}

/// Extract the concept, linking-phrase and link records from CXL text.
///
/// # Errors
///
/// [`Error::MalformedDocument`] when the XML does not parse, a section is
/// missing, or a record lacks a required attribute.
pub fn extract_records(text: &str) -> Result<RecordSet> {
    let doc = Document::parse(text).map_err(|e| Error::malformed(format!("invalid XML: {e}")))?;

    let map = nth_element(doc.root_element(), MAP_POSITION)
        .ok_or_else(|| Error::malformed("document root has no map element"))?;

    let mut records = RecordSet::default();

    for attributes in section_records(map, CONCEPT_SECTION, "concept list")? {
        let id = required(&attributes, "id", "concept")?;
        let label = required(&attributes, "label", "concept")?;
        records.concepts.insert(ConceptRecord {
            id,
            label,
            attributes,
        });
    }

    for attributes in section_records(map, PHRASE_SECTION, "linking-phrase list")? {
        let id = required(&attributes, "id", "linking phrase")?;
        let label = required(&attributes, "label", "linking phrase")?;
        records.phrases.insert(PhraseRecord {
            id,
            label,
            attributes,
        });
    }

    for attributes in section_records(map, LINK_SECTION, "connection list")? {
        let from_id = required(&attributes, "from-id", "connection")?;
        let to_id = required(&attributes, "to-id", "connection")?;
        records.insert_link(RawLink {
            id: attributes.get("id").cloned(),
            label: attributes.get("label").cloned(),
            from_id,
            to_id,
            attributes,
        });
    }

    debug!(
        concepts = records.concepts.len(),
        phrases = records.phrases.len(),
        links = records.links.len(),
        "extracted records"
    );

    Ok(records)
}

fn nth_element<'a, 'input>(node: Node<'a, 'input>, n: usize) -> Option<Node<'a, 'input>> {
    node.children().filter(Node::is_element).nth(n)
}

fn section_records(map: Node<'_, '_>, position: usize, name: &str) -> Result<Vec<Attributes>> {
    let section = nth_element(map, position)
        .ok_or_else(|| Error::malformed(format!("map has no {name} (child {position})")))?;

    Ok(section
        .descendants()
        .filter(Node::is_element)
        .map(|node| {
            node.attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect::<Attributes>()
        })
        .filter(|attributes| !attributes.is_empty())
        .collect())
}

fn required(attributes: &Attributes, key: &str, kind: &str) -> Result<String> {
    attributes.get(key).cloned().ok_or_else(|| {
        let id = attributes.get("id").map_or("<no id>", String::as_str);
        Error::malformed(format!("{kind} {id} is missing required attribute {key:?}"))
    })
}
