// Command-line parsing: all five flags are required. Parsing never exits
// the process; a failure comes back as a `CliExit` carrying the text to
// print and the status to exit with, and `main` acts on it.

use crate::deploy::Parameters;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

/// Status for an unknown flag, a missing value or a missing flag.
pub const EXIT_USAGE: u8 = 2;

const EXAMPLE: &str = "ex. artifact-deployer -p ${COMMON_ARTIFACTORY_TOKEN} -f ${FOLDER_NAME} \
-n ${BINARY_NAME} -v ${VERSION} -t ${ARTIFACTORY_TARGET}";

#[derive(Parser)]
#[command(
    name = "artifact-deployer",
    about = "Push build artifacts to the common Artifactory",
    after_help = EXAMPLE
)]
pub struct DeployArgs {
    /// Common Artifactory API token
    #[arg(short = 'p', long = "password", allow_hyphen_values = true)]
    pub password: String,

    /// Binaries folder name
    #[arg(short = 'f', long = "bin_folder")]
    pub bin_folder: String,

    /// Binaries file names in the Artifactory
    #[arg(short = 'n', long = "bin_name")]
    pub bin_name: String,

    /// Binaries version
    #[arg(short = 'v', long = "bin_version")]
    pub bin_version: String,

    /// Binaries remote path in the Artifactory
    #[arg(short = 't', long = "target")]
    pub target: String,
}

impl From<DeployArgs> for Parameters {
    fn from(args: DeployArgs) -> Self {
        Parameters {
            password: args.password,
            bin_folder: args.bin_folder,
            bin_name: args.bin_name,
            bin_version: args.bin_version,
            target: args.target,
        }
    }
}

/// Parsing stopped the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliExit {
    /// `--help` was requested.
    Help(String),
    /// The arguments were unusable.
    Usage(String),
}

impl CliExit {
    pub fn code(&self) -> u8 {
        match self {
            CliExit::Help(_) => 0,
            CliExit::Usage(_) => EXIT_USAGE,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CliExit::Help(text) | CliExit::Usage(text) => text,
        }
    }

    pub fn print(&self) {
        match self {
            CliExit::Help(text) => print!("{}", text),
            CliExit::Usage(text) => eprint!("{}", text),
        }
    }
}

/// Parse a full argument vector (program name first).
pub fn parse_from<I, T>(args: I) -> Result<Parameters, CliExit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    match DeployArgs::try_parse_from(&args) {
        Ok(parsed) => Ok(parsed.into()),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                Err(CliExit::Help(err.render().to_string()))
            }
            _ => Err(CliExit::Usage(format!(
                "Some parameters are missing, please check your script call:\n\n{}\nActual parameters: {:?}\n\n{}\n",
                err.render(),
                redacted(args.iter().skip(1)),
                DeployArgs::command().render_help(),
            ))),
        },
    }
}

/// Echo of the arguments with the token value masked.
fn redacted<'a>(args: impl Iterator<Item = &'a OsString>) -> Vec<String> {
    let mut out = Vec::new();
    let mut mask_next = false;
    for arg in args {
        let arg = arg.to_string_lossy();
        if mask_next {
            out.push("***".to_string());
            mask_next = false;
        } else if arg == "-p" || arg == "--password" {
            out.push(arg.into_owned());
            mask_next = true;
        } else if arg.starts_with("--password=") {
            out.push("--password=***".to_string());
        } else if arg.starts_with("-p") {
            out.push("-p***".to_string());
        } else {
            out.push(arg.into_owned());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: [&str; 11] = [
        "artifact-deployer",
        "-p",
        "abc123",
        "-f",
        "dist",
        "-n",
        "Goli",
        "-v",
        "1.0.4",
        "-t",
        "portal/go/plugins/goli",
    ];

    #[test]
    fn short_flags_fill_every_field() {
        let params = parse_from(FULL).unwrap();
        assert_eq!(
            params,
            Parameters {
                password: "abc123".into(),
                bin_folder: "dist".into(),
                bin_name: "Goli".into(),
                bin_version: "1.0.4".into(),
                target: "portal/go/plugins/goli".into(),
            }
        );
    }

    #[test]
    fn long_flags_use_underscores() {
        let params = parse_from([
            "artifact-deployer",
            "--password=abc123",
            "--bin_folder",
            "dist",
            "--bin_name",
            "Goli",
            "--bin_version",
            "1.0.4",
            "--target",
            "portal/go/plugins/goli",
        ])
        .unwrap();
        assert_eq!(params.password, "abc123");
        assert_eq!(params.bin_folder, "dist");
        assert_eq!(params.bin_version, "1.0.4");
    }

    #[test]
    fn values_are_not_validated() {
        let mut args = FULL.to_vec();
        args[8] = "";
        let params = parse_from(args).unwrap();
        assert_eq!(params.bin_version, "");
    }

    #[test]
    fn token_may_start_with_a_dash() {
        let mut args = FULL.to_vec();
        args[2] = "-secret";
        assert_eq!(parse_from(args).unwrap().password, "-secret");
    }

    #[test]
    fn missing_bin_folder_is_a_usage_error() {
        let args: Vec<&str> = FULL
            .iter()
            .copied()
            .filter(|a| *a != "-f" && *a != "dist")
            .collect();
        let exit = parse_from(args).unwrap_err();
        assert_eq!(exit.code(), EXIT_USAGE);
        assert!(exit.message().contains("--bin_folder"));
        assert!(exit.message().starts_with("Some parameters are missing"));
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let mut args = FULL.to_vec();
        args.push("--retry");
        assert_eq!(parse_from(args).unwrap_err().code(), 2);
    }

    #[test]
    fn flag_without_value_is_a_usage_error() {
        let mut args = FULL.to_vec();
        args.truncate(10);
        assert_eq!(parse_from(args).unwrap_err().code(), 2);
    }

    #[test]
    fn usage_error_does_not_echo_the_token() {
        let exit = parse_from(["artifact-deployer", "-p", "abc123", "--bogus"]).unwrap_err();
        assert!(!exit.message().contains("abc123"));
        assert!(exit.message().contains("\"-p\", \"***\""));
    }

    #[test]
    fn help_exits_zero_with_usage() {
        for flag in ["-h", "--help"] {
            let exit = parse_from(["artifact-deployer", flag]).unwrap_err();
            assert_eq!(exit.code(), 0);
            assert!(matches!(exit, CliExit::Help(_)));
            assert!(exit.message().contains("--bin_version"));
            assert!(exit.message().contains("ex. artifact-deployer"));
        }
    }

    #[test]
    fn command_definition_is_consistent() {
        DeployArgs::command().debug_assert();
    }
}
