#![forbid(unsafe_code)]
//! cxlgraph-core library.
//!
//! Record extraction from CXL concept maps and resolution of linking phrases
//! into direct concept-to-concept [`Connection`]s.
//!
//! ```text
//! CXL text ──extract_records──▶ RecordSet ──resolve──▶ Vec<Connection>
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Library calls return [`Result`] with the typed [`Error`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod resolve;

pub use config::Config;
pub use error::{Error, ErrorCode, Result};
pub use extract::{extract_records, load_records};
pub use model::{ConceptRecord, Connection, PhraseRecord, RawLink, RecordSet};
pub use resolve::{ResolveOptions, resolve};
