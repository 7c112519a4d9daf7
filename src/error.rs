// Error types: `TransferError` describes one failed upload and is what the
// failure diagnostic prints; `DeployError` covers what stops a run before
// or around the uploads.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single artifact transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    #[error("failed to send PUT {url}: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("PUT {url} rejected with {status}")]
    Rejected {
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl TransferError {
    /// HTTP status of the response, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransferError::Rejected { status, .. } => Some(*status),
            TransferError::Send { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Body returned by the server, empty when there was none.
    pub fn output(&self) -> &str {
        match self {
            TransferError::Rejected { body, .. } => body,
            _ => "",
        }
    }
}

/// Errors that end a deploy run before or outside a single transfer.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to list artifact folder {}", .folder.display())]
    Listing {
        folder: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API token is not a valid header value")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to write deploy report")]
    Console(#[from] std::io::Error),
}
