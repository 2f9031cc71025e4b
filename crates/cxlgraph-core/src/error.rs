use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MalformedDocument,
    Unparsed,
    NotFound,
    Precondition,
    InvalidWeight,
    UnknownNode,
    ConfigParseError,
    ConfigUnreadable,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MalformedDocument => "E1001",
            Self::NotFound => "E1002",
            Self::ConfigParseError => "E1003",
            Self::ConfigUnreadable => "E1004",
            Self::Unparsed => "E2001",
            Self::Precondition => "E2002",
            Self::InvalidWeight => "E2003",
            Self::UnknownNode => "E2004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MalformedDocument => "Malformed concept map document",
            Self::NotFound => "Concept map file not found",
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigUnreadable => "Config file not found or unreadable",
            Self::Unparsed => "Concept map has not been parsed",
            Self::Precondition => "Analysis precondition not met",
            Self::InvalidWeight => "Edge label is not a numeric weight",
            Self::UnknownNode => "Concept not found in graph",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::MalformedDocument => {
                Some("Fix the document and reload it; partial results are discarded.")
            }
            Self::NotFound => Some("Check the path and read permissions."),
            Self::ConfigParseError => Some("Fix syntax in the config TOML file and retry."),
            Self::ConfigUnreadable => Some("Check the config file path and read permissions."),
            Self::Unparsed => Some("Call parse() before running graph analytics."),
            Self::Precondition => None,
            Self::InvalidWeight => {
                Some("Fuzzy maps need numeric linking-phrase labels, e.g. \"0.75\".")
            }
            Self::UnknownNode => Some("Use a concept id from the parsed map."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading, resolving and analyzing a concept map.
///
/// Nothing here is retried automatically. A malformed document must be fixed
/// and reloaded; the unparsed-state error is always avoidable by calling
/// `parse` first.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed concept map {}: {message}", display_path(.path.as_ref()))]
    MalformedDocument {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("there must be a parsed map before you can use {operation}")]
    Unparsed { operation: &'static str },

    #[error("concept map not found or unreadable: {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("edge label {label:?} is not a numeric weight")]
    InvalidWeight { label: String },

    #[error("concept {0:?} is not a vertex of the graph")]
    UnknownNode(String),

    #[error("failed to parse config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file not found or unreadable: {}", .path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a [`Error::MalformedDocument`] without a path; the loader attaches
    /// one with [`Error::with_path`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: None,
            message: message.into(),
        }
    }

    /// Attach a source path to a malformed-document error. Other variants are
    /// returned unchanged.
    #[must_use]
    pub fn with_path(self, new_path: impl Into<PathBuf>) -> Self {
        match self {
            Self::MalformedDocument { path: None, message } => Self::MalformedDocument {
                path: Some(new_path.into()),
                message,
            },
            other => other,
        }
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedDocument { .. } => ErrorCode::MalformedDocument,
            Self::Unparsed { .. } => ErrorCode::Unparsed,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Precondition(_) => ErrorCode::Precondition,
            Self::InvalidWeight { .. } => ErrorCode::InvalidWeight,
            Self::UnknownNode(_) => ErrorCode::UnknownNode,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::ConfigUnreadable { .. } => ErrorCode::ConfigUnreadable,
        }
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
