// Deploy loop: lists the artifact folder once and pushes every entry, in
// listing order, to `<base>/<target>/<bin_name>/<file>`. The first failed
// transfer stops the run; artifacts after it are never attempted and
// earlier uploads are left in place.

use crate::api::{TransferClient, ART_API_HEADER};
use crate::error::DeployError;
use crate::ui::Console;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Artifactory root every artifact is pushed under.
pub const ARTIFACTORY_BASE_URL: &str = "https://common.repositories.cloud.sap/artifactory";

/// Invocation parameters, taken verbatim from the command line.
#[derive(Clone, PartialEq, Eq)]
pub struct Parameters {
    /// API token sent as `X-JFrog-Art-Api`.
    pub password: String,
    pub bin_folder: String,
    pub bin_name: String,
    /// Accepted for compatibility with existing pipelines; not part of
    /// the remote path.
    pub bin_version: String,
    pub target: String,
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameters")
            .field("password", &"<redacted>")
            .field("bin_folder", &self.bin_folder)
            .field("bin_name", &self.bin_name)
            .field("bin_version", &self.bin_version)
            .field("target", &self.target)
            .finish()
    }
}

/// Remote URL for one artifact. Plain substitution, nothing is escaped
/// or normalised.
pub fn remote_url(base_url: &str, params: &Parameters, artifact: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        base_url, params.target, params.bin_name, artifact
    )
}

/// Source of the artifact names in a folder. Names are kept as the OS
/// returned them so they can be joined back onto the folder.
pub trait ArtifactListing {
    fn list(&self, folder: &Path) -> io::Result<Vec<OsString>>;
}

/// Lists a real directory. Every entry counts, subdirectories included.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl ArtifactListing for FsListing {
    fn list(&self, folder: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(folder)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded {
        artifact: String,
        url: String,
    },
    Failed {
        artifact: String,
        url: String,
        status: Option<u16>,
        output: String,
        error: String,
    },
}

impl UploadOutcome {
    pub fn artifact(&self) -> &str {
        match self {
            UploadOutcome::Succeeded { artifact, .. } | UploadOutcome::Failed { artifact, .. } => {
                artifact
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }
}

/// Outcomes of the artifacts that were attempted, in order. Only the
/// last one can be a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub outcomes: Vec<UploadOutcome>,
}

impl DeployReport {
    pub fn succeeded(&self) -> bool {
        self.failure().is_none()
    }

    pub fn failure(&self) -> Option<&UploadOutcome> {
        self.outcomes.iter().find(|o| !o.is_success())
    }

    pub fn deployed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }
}

fn auth_headers(token: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(token)?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(ART_API_HEADER, value);
    Ok(headers)
}

/// Push every artifact in `params.bin_folder` to `base_url`.
///
/// Returns `Err` only when the run cannot start (bad token, unreadable
/// folder) or the report cannot be written. A failed transfer is a
/// normal return whose report ends with `UploadOutcome::Failed`.
pub fn deploy<C, L, W>(
    params: &Parameters,
    base_url: &str,
    listing: &L,
    client: &C,
    console: &mut Console<W>,
) -> Result<DeployReport, DeployError>
where
    C: TransferClient + ?Sized,
    L: ArtifactListing + ?Sized,
    W: Write,
{
    let headers = auth_headers(&params.password)?;
    let folder = Path::new(&params.bin_folder);
    let artifacts = listing
        .list(folder)
        .map_err(|source| DeployError::Listing {
            folder: folder.to_path_buf(),
            source,
        })?;
    let names: Vec<String> = artifacts
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    console.found(&names)?;

    let mut report = DeployReport {
        outcomes: Vec::with_capacity(artifacts.len()),
    };
    for (entry, artifact) in artifacts.iter().zip(names) {
        let url = remote_url(base_url, params, &artifact);
        console.trying(&url)?;

        let spinner = console.start_transfer(&artifact);
        let result = client.upload(&folder.join(entry), &url, &headers);
        spinner.finish_and_clear();

        match result {
            Ok(transfer) => {
                debug!("{} answered {}", url, transfer.status);
                console.succeeded(&artifact)?;
                report.outcomes.push(UploadOutcome::Succeeded { artifact, url });
            }
            Err(err) => {
                console.failed(&artifact, &err)?;
                report.outcomes.push(UploadOutcome::Failed {
                    status: err.status().map(|s| s.as_u16()),
                    output: err.output().to_string(),
                    error: err.to_string(),
                    artifact,
                    url,
                });
                return Ok(report);
            }
        }
    }

    info!("Deployed {} artifact(s) to {}", report.deployed(), base_url);
    Ok(report)
}
