use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the element dataset.
///
/// None of these are retried. A page load that hits one renders an error page
/// instead of the table or detail view.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("fetch dataset: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("fetch dataset: {url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("read dataset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address `{value}`: {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Errors that stop the server binary.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("serve: {0}")]
    Serve(#[source] std::io::Error),
}
