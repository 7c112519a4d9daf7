// UI layer: the lines a deploy run prints, plus an `indicatif` spinner
// while a transfer is in flight. Output goes through a generic writer so
// the deploy loop can be run against a buffer in tests.

use crate::error::TransferError;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Writer for the deploy report.
pub struct Console<W: Write> {
    out: W,
    spinner: bool,
}

impl Console<Stdout> {
    /// Report to stdout, with a spinner on stderr while uploading.
    /// `indicatif` hides the spinner when stderr is not a terminal.
    pub fn stdout() -> Self {
        Console {
            out: io::stdout(),
            spinner: true,
        }
    }
}

impl<W: Write> Console<W> {
    /// Report into `out` without any spinner.
    pub fn new(out: W) -> Self {
        Console {
            out,
            spinner: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn found(&mut self, artifacts: &[String]) -> io::Result<()> {
        writeln!(self.out, "Found artifacts for deployment: {:?}", artifacts)
    }

    pub fn trying(&mut self, remote_url: &str) -> io::Result<()> {
        writeln!(self.out, "Trying to push: {}...", remote_url)
    }

    /// Start a spinner for one transfer. The caller clears it once the
    /// transfer returns.
    pub fn start_transfer(&self, artifact: &str) -> ProgressBar {
        if !self.spinner {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Uploading {}...", artifact));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn succeeded(&mut self, artifact: &str) -> io::Result<()> {
        writeln!(self.out, "Deploy {} succeeded", artifact)
    }

    /// Failure diagnostic: artifact, status, server output and error.
    pub fn failed(&mut self, artifact: &str, err: &TransferError) -> io::Result<()> {
        let status = err
            .status()
            .map(|s| s.as_u16().to_string())
            .unwrap_or_else(|| "none".into());
        writeln!(
            self.out,
            "failed to deploy artifact: {} status: {}",
            artifact, status
        )?;
        writeln!(self.out, "Output: {}", err.output())?;
        writeln!(self.out, "Error: {}", err)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn text(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn failure_lists_status_output_and_error() {
        let mut console = Console::new(Vec::new());
        let err = TransferError::Rejected {
            url: "https://host/artifactory/a/b/c".into(),
            status: StatusCode::UNAUTHORIZED,
            body: "{\"errors\":[{\"status\":401}]}".into(),
        };
        console.failed("c", &err).unwrap();
        let out = text(console);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "failed to deploy artifact: c status: 401");
        assert_eq!(lines[1], "Output: {\"errors\":[{\"status\":401}]}");
        assert!(lines[2].starts_with("Error: PUT https://host/artifactory/a/b/c rejected"));
    }

    #[test]
    fn failure_without_response_reports_no_status() {
        let mut console = Console::new(Vec::new());
        let err = TransferError::NotAFile {
            path: "bin/nested".into(),
        };
        console.failed("nested", &err).unwrap();
        let out = text(console);
        assert!(out.starts_with("failed to deploy artifact: nested status: none\n"));
        assert!(out.contains("Output: \n"));
        assert!(out.contains("Error: bin/nested is not a regular file"));
    }

    #[test]
    fn found_line_lists_names() {
        let mut console = Console::new(Vec::new());
        console.found(&["a.gz".into(), "b.zip".into()]).unwrap();
        assert_eq!(
            text(console),
            "Found artifacts for deployment: [\"a.gz\", \"b.zip\"]\n"
        );
    }
}
