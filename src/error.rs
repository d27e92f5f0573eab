use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by configuration loading and case persistence.
///
/// Rendering never fails: missing data turns into placeholders instead.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The case file exists but is not a valid case snapshot.
    #[error("malformed case file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("case file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Case names become file names, so separators and empty names are refused.
    #[error("invalid case name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, CaseError>;
