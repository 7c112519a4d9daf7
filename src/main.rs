// Entrypoint for the deploy tool.
// - Parses flags, sets up logging and runs the deploy loop.
// - Owns every exit decision: 0 when all artifacts went up (or help was
//   shown), 2 for bad arguments, 1 for anything that stopped the run.

use anyhow::{Context, Result};
use artifact_deployer::deploy::{self, ARTIFACTORY_BASE_URL};
use artifact_deployer::ui::Console;
use artifact_deployer::{cli, ArtifactoryClient, DeployReport, FsListing, Parameters};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::process::ExitCode;

const EXIT_ABORT: u8 = 1;

fn main() -> ExitCode {
    let params = match cli::parse_from(std::env::args_os()) {
        Ok(params) => params,
        Err(exit) => {
            exit.print();
            return ExitCode::from(exit.code());
        }
    };

    if let Err(e) = initialize_logging() {
        eprintln!("Error: {:#}", e);
    }

    match run(&params) {
        Ok(report) if report.succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_ABORT),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ABORT)
        }
    }
}

fn initialize_logging() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

fn run(params: &Parameters) -> Result<DeployReport> {
    let client = ArtifactoryClient::new()?;
    let mut console = Console::stdout();
    let report = deploy::deploy(params, ARTIFACTORY_BASE_URL, &FsListing, &client, &mut console)
        .with_context(|| format!("Deploy of {} aborted", params.bin_folder))?;
    Ok(report)
}
