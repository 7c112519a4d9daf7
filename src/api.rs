// API client module: the transfer capability used by the deploy loop and
// a small blocking HTTP implementation that PUTs files to Artifactory.
// Synchronous on purpose: artifacts go up one at a time.

use crate::error::TransferError;
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::{Body, Client};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

/// Header carrying the Artifactory API token.
pub const ART_API_HEADER: &str = "x-jfrog-art-api";

/// Something that can push a local file to a remote URL.
///
/// The deploy loop only talks to this trait, so tests can record calls
/// and another transport can be dropped in without touching the loop.
pub trait TransferClient {
    fn upload(
        &self,
        local_path: &Path,
        remote_url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<Transfer, TransferError>;
}

/// A completed transfer: the server accepted the file.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub status: StatusCode,
    pub body: String,
}

impl Transfer {
    /// Parse the deploy receipt Artifactory sends back. Other servers
    /// (or an empty body) simply yield `None`.
    pub fn receipt(&self) -> Option<DeployReceipt> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Response body of a successful Artifactory deploy. Only the fields we
/// log are kept.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeployReceipt {
    pub repo: Option<String>,
    pub path: Option<String>,
    pub download_uri: Option<String>,
    pub checksums: Option<Checksums>,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct Checksums {
    pub sha1: Option<String>,
    pub md5: Option<String>,
    pub sha256: Option<String>,
}

/// Blocking reqwest client used for the real uploads. Timeouts are the
/// transport defaults.
#[derive(Clone)]
pub struct ArtifactoryClient {
    client: Client,
}

impl ArtifactoryClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ArtifactoryClient { client })
    }
}

impl TransferClient for ArtifactoryClient {
    /// PUT the raw bytes of `local_path` to `remote_url`. Any non-2xx
    /// answer is reported as `TransferError::Rejected` with the body the
    /// server sent.
    fn upload(
        &self,
        local_path: &Path,
        remote_url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<Transfer, TransferError> {
        let open_err = |source: std::io::Error| TransferError::Open {
            path: local_path.to_path_buf(),
            source,
        };
        let file = File::open(local_path).map_err(open_err)?;
        let metadata = file.metadata().map_err(open_err)?;
        if !metadata.is_file() {
            return Err(TransferError::NotAFile {
                path: local_path.to_path_buf(),
            });
        }
        debug!("PUT {} ({} bytes)", remote_url, metadata.len());

        let res = self
            .client
            .put(remote_url)
            .headers(headers.clone())
            .body(Body::sized(file, metadata.len()))
            .send()
            .map_err(|source| TransferError::Send {
                url: remote_url.to_string(),
                source,
            })?;

        let status = res.status();
        let body = res.text().unwrap_or_default();
        if !status.is_success() {
            return Err(TransferError::Rejected {
                url: remote_url.to_string(),
                status,
                body,
            });
        }

        let transfer = Transfer { status, body };
        if let Some(receipt) = transfer.receipt() {
            info!(
                "Deployed to {} (sha256 {})",
                receipt.download_uri.as_deref().unwrap_or(remote_url),
                receipt
                    .checksums
                    .as_ref()
                    .and_then(|c| c.sha256.as_deref())
                    .unwrap_or("unknown"),
            );
        }
        Ok(transfer)
    }
}
