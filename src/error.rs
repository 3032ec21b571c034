use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one metadata file into a feed item. The run skips the
/// episode and continues with the rest.
#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("Malformed upload date {0:?} (expected YYYYMMDD)")]
    MalformedDate(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Missing or invalid field: {0}")]
    MissingField(&'static str),

    #[error("Size lookup failed for {}: {source}", path.display())]
    SizeLookup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Failures that abort the whole run.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot read input directory {}: {source}", path.display())]
    InputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write feed to {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("XML rendering failed: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
