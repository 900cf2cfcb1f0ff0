use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort a validation run.
///
/// Every variant is fatal; nothing is retried. Reconciliation errors carry
/// all unresolved IDs so they can be fixed in one pass.
#[derive(Error, Debug)]
pub enum FixCheckError {
    #[error("The following file cannot be found: {0}")]
    MissingFile(Utf8PathBuf),

    #[error("The following file is a broken symbolic link: {0}")]
    BrokenLink(Utf8PathBuf),

    #[error("The following Steam fix filename is invalid (expected a numeric app id): {0}")]
    InvalidSteamFilename(Utf8PathBuf),

    #[error("The following file does not start with 'umu-': {0}")]
    MissingUmuPrefix(Utf8PathBuf),

    #[error("The following Steam app ids are invalid: {}", join_ids(.0))]
    InvalidSteamAppIds(Vec<u64>),

    #[error("The following GOG app ids are invalid or missing: {}", join_ids(.0))]
    InvalidGogAppIds(Vec<String>),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid search pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid value for header {name}: {value}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FixCheckError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
