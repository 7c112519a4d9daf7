// Library root
// -----------
// This crate exposes the pieces of the deploy tool as a library. The
// binary (`main.rs`) wires them together and owns the exit status.
//
// Module responsibilities:
// - `cli`: Parses command-line flags into `deploy::Parameters` and maps
//   parse failures to usage text and exit codes.
// - `api`: The `TransferClient` capability and the HTTP implementation
//   that PUTs files to Artifactory.
// - `deploy`: Lists the artifact folder and pushes each entry in order,
//   stopping at the first failure.
// - `ui`: Console reporting (per-artifact lines and a spinner).
// - `error`: Error types shared by the modules above.
//
// The upload loop never exits the process; it returns a report and the
// caller decides what the run means.
pub mod api;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod ui;

pub use api::{ArtifactoryClient, Transfer, TransferClient};
pub use deploy::{deploy, DeployReport, FsListing, Parameters, UploadOutcome};
pub use error::{DeployError, TransferError};
