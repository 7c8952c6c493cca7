// Error types for specfuzz
// The core pipeline never fails outright; these cover document decoding and spec retrieval.

use thiserror::Error;

/// Why raw spec text could not become a usable OpenAPI document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse spec as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse spec as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("spec root is not an object")]
    NotAnObject,

    #[error("unsupported specification version: {0}")]
    UnsupportedVersion(String),

    #[error("missing 'openapi' or 'swagger' version attribute")]
    MissingVersion,
}

/// Retrieval failure for a URL or file location
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unable to read file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load any spec content at all
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Enter a URL or file path, or provide raw spec content.")]
    NoInput,

    #[error("Unable to load {location}: {source}")]
    Retrieval {
        location: String,
        #[source]
        source: FetchError,
    },

    #[error("Parse worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
