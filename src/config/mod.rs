//! Configuration for a listing run.
//!
//! Two layers are involved:
//!
//! - [`RequestListConfig`] holds run settings merged from command-line
//!   arguments, environment variables, and an optional dotfile using
//!   ortho-config's layered approach.
//! - [`Config`] is the YAML sources file named by
//!   [`RequestListConfig::config_path`]. It lists the sources to query and
//!   the sort, format, and timezone used for output.
//!
//! # Precedence
//!
//! Run settings are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults**: `config.yml`, no timeout, all flags off
//! 2. **Configuration file**: `.git-request-list.toml` in the current
//!    directory, home directory, or XDG config directory
//! 3. **Environment variables**: `GIT_REQUEST_LIST_CONFIG_PATH`,
//!    `GIT_REQUEST_LIST_TIMEOUT_SECONDS`
//! 4. **Command-line arguments**: `--config-path`/`-c`, `--skip-wip`/`-w`,
//!    `--verbose`/`-v`, `--keep-going`/`-k`, `--timeout-seconds`

mod sources;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::RequestListError;

pub use sources::{Config, SourceConfig};

/// Default location of the YAML sources file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Run settings supporting CLI, environment, and file sources.
///
/// Boolean flags are read from the CLI and the dotfile only, because
/// `ortho_config` does not load boolean values from the environment.
///
/// # Example
///
/// ```no_run
/// use git_request_list::RequestListConfig;
/// use ortho_config::OrthoConfig;
///
/// let settings = RequestListConfig::load().expect("failed to load settings");
/// let sources = settings.load_sources().expect("failed to read sources file");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GIT_REQUEST_LIST",
    discovery(
        dotfile_name = ".git-request-list.toml",
        config_file_name = "git-request-list.toml",
        app_name = "git-request-list"
    )
)]
pub struct RequestListConfig {
    /// Path of the YAML sources file.
    ///
    /// Can be provided via:
    /// - CLI: `--config-path <PATH>` or `-c <PATH>`
    /// - Environment: `GIT_REQUEST_LIST_CONFIG_PATH`
    /// - Config file: `config_path = "..."`
    #[ortho_config(cli_short = 'c')]
    pub config_path: String,

    /// Drops draft / work-in-progress requests.
    ///
    /// Can be provided via:
    /// - CLI: `--skip-wip` / `-w`
    /// - Config file: `skip_wip = true`
    #[ortho_config(cli_short = 'w')]
    pub skip_wip: bool,

    /// Logs every provider call at `info` level.
    ///
    /// Can be provided via:
    /// - CLI: `--verbose` / `-v`
    /// - Config file: `verbose = true`
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,

    /// Lists whatever sources succeed instead of failing on the first error.
    ///
    /// Failed sources are reported on stderr and the run still exits with
    /// a failure status.
    ///
    /// Can be provided via:
    /// - CLI: `--keep-going` / `-k`
    /// - Config file: `keep_going = true`
    #[ortho_config(cli_short = 'k')]
    pub keep_going: bool,

    /// Overall deadline for the run, in seconds. Zero disables it.
    ///
    /// The same value bounds each individual HTTP call.
    ///
    /// Can be provided via:
    /// - CLI: `--timeout-seconds <N>`
    /// - Environment: `GIT_REQUEST_LIST_TIMEOUT_SECONDS`
    /// - Config file: `timeout_seconds = 30`
    #[ortho_config()]
    pub timeout_seconds: u64,
}

impl Default for RequestListConfig {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_owned(),
            skip_wip: false,
            verbose: false,
            keep_going: false,
            timeout_seconds: 0,
        }
    }
}

impl RequestListConfig {
    /// Returns the run deadline, or `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_seconds))
        }
    }

    /// Returns the sources file path, falling back to
    /// [`DEFAULT_CONFIG_PATH`] when blank.
    #[must_use]
    pub fn sources_path(&self) -> Utf8PathBuf {
        let trimmed = self.config_path.trim();
        Utf8PathBuf::from(if trimmed.is_empty() {
            DEFAULT_CONFIG_PATH
        } else {
            trimmed
        })
    }

    /// Reads and validates the YAML sources file.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Io`] when the file cannot be read and
    /// [`RequestListError::Configuration`] when it is invalid.
    pub fn load_sources(&self) -> Result<Config, RequestListError> {
        Config::from_path(&self.sources_path())
    }
}
