//! Error types for storfetch-fetch.

use storfetch_verify::Sha256Digest;
use thiserror::Error;

pub const NOT_FOUND: u16 = 404;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid path template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("download of {url} failed {status} ({reason})")]
    Status { status: u16, reason: String, url: String },

    #[error("downloaded sha ({actual}) is not equal with expected sha ({expected})")]
    DigestMismatch {
        expected: Sha256Digest,
        actual:   Sha256Digest,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fs(#[from] storfetch_fs::Error),

    #[error(transparent)]
    Digest(#[from] storfetch_verify::VerifyError),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("engine is no longer accepting work")]
    Closed,
}

impl Error {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool { self.status_code() == Some(NOT_FOUND) }
}

pub type Result<T> = std::result::Result<T, Error>;
