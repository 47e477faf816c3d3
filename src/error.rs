use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or querying a vault session.
#[derive(Error, Debug)]
pub enum AskError {
    #[error("Vault not found or not a directory: {0}")]
    VaultNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk vault: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Collection error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Language model error: {0}")]
    Model(#[from] ModelError),
}

/// Failures talking to the upstream completion service.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("API key not set (expected environment variable {0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response contained no message")]
    EmptyResponse,

    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ModelError>,
    },
}

impl ModelError {
    /// Whether the failure is worth retrying (timeouts, rate limits, server errors).
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Http(e) => e.is_timeout() || e.is_connect(),
            ModelError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

impl AskError {
    /// Both traversal failures and unreadable files fall under the skip/abort policy.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, AskError::Io { .. } | AskError::Walk(_))
    }
}

pub type Result<T> = std::result::Result<T, AskError>;
