//! Diagnostic logging for the request listing pipeline.
//!
//! Provider calls and aggregation progress are emitted as `tracing` events.
//! The subscriber writes them to stderr so stdout stays reserved for the
//! rendered listing.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::RequestListError;

/// Environment variable that overrides the default filter.
pub const LOG_ENV_VAR: &str = "GIT_REQUEST_LIST_LOG";

/// Returns the filter directive used when the environment sets none.
///
/// Verbose runs log every outbound provider call at `info`.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Builds the filter, preferring [`LOG_ENV_VAR`] when it is set and valid.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global stderr subscriber.
///
/// # Errors
///
/// Returns [`RequestListError::Configuration`] when a global subscriber is
/// already installed.
pub fn init(verbose: bool) -> Result<(), RequestListError> {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|error| {
            RequestListError::configuration(format!("failed to initialise logging: {error}"))
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::quiet(false, "warn")]
    #[case::verbose(true, "info")]
    fn default_directive_follows_verbosity(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbose), expected);
    }
}
