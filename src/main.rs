//! git-request-list CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use git_request_list::cli::{self, RunSummary};
use git_request_list::{RequestListConfig, RequestListError, telemetry};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(summary) if summary.is_complete() => ExitCode::SUCCESS,
        Ok(summary) => {
            let mut stderr = io::stderr().lock();
            for failure in &summary.failures {
                if writeln!(stderr, "{} {}: {}", failure.api, failure.host, failure.error).is_err()
                {
                    break;
                }
            }
            ExitCode::FAILURE
        }
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunSummary, RequestListError> {
    let settings = load_config()?;
    telemetry::init(settings.verbose)?;
    let config = settings.load_sources()?;
    cli::run(&settings, &config).await
}

/// Loads run settings from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`RequestListError::Configuration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<RequestListConfig, RequestListError> {
    RequestListConfig::load().map_err(|error| RequestListError::configuration(error.to_string()))
}
