use std::path::PathBuf;

use thiserror::Error;

/// The metadata file could not be turned into a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no videos carry the required parameters: {params}")]
    NoGroupableVideos { params: String },
}

/// An outbound email could not be delivered. The user may retry.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("email service is not configured (service id, template id and public key are required)")]
    NotConfigured,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email service returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Invalid application settings.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("expected 1 or 2 grouping parameters, got {0}")]
    GroupingParamCount(usize),

    #[error("grouping parameter names must not be empty")]
    EmptyGroupingParam,

    #[error("experiment size must be at least 1")]
    ZeroExperimentSize,
}
