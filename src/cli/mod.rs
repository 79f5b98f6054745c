//! End-to-end listing run: aggregate, sort, render.
//!
//! [`run`] wires the default provider registry to stdout. The
//! [`run_with_registry`] variant takes the registry and writer explicitly
//! so tests can substitute fake providers and capture the output.

use std::io::{self, Write};

use tokio_util::sync::CancellationToken;

use crate::aggregate::{AggregateOptions, Aggregator};
use crate::config::{Config, RequestListConfig};
use crate::error::RequestListError;
use crate::output::{RenderOptions, render};
use crate::provider::ProviderRegistry;
use crate::request::Request;
use crate::sort::sort_requests;

/// A source that failed while `keep_going` was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Provider discriminator of the source.
    pub api: String,
    /// Host of the source.
    pub host: String,
    /// Error that aborted the source.
    pub error: RequestListError,
}

/// What a completed run listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of requests written.
    pub listed: usize,
    /// Sources skipped because they failed; always empty unless
    /// `keep_going` is set.
    pub failures: Vec<SourceFailure>,
}

impl RunSummary {
    /// Returns true when every source succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lists requests from every configured source to stdout.
///
/// # Errors
///
/// Returns the first configuration, provider, or output error. With
/// `keep_going` set, provider errors are reported in the summary instead.
pub async fn run(
    settings: &RequestListConfig,
    config: &Config,
) -> Result<RunSummary, RequestListError> {
    let registry = ProviderRegistry::with_defaults();
    let mut stdout = io::stdout().lock();
    run_with_registry(settings, config, &registry, &mut stdout).await
}

/// Lists requests using a custom provider registry and writer.
///
/// This function is exposed for testing with fake providers.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_registry<W: Write>(
    settings: &RequestListConfig,
    config: &Config,
    registry: &ProviderRegistry,
    writer: &mut W,
) -> Result<RunSummary, RequestListError> {
    let template = config.load_template()?;
    let options = AggregateOptions {
        skip_wip: settings.skip_wip,
        verbose: settings.verbose,
        timeout: settings.timeout(),
    };
    let aggregator = Aggregator::new(registry, options);

    let cancel = CancellationToken::new();
    let deadline = settings.timeout().map(|duration| {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            tracing::warn!(seconds = duration.as_secs(), "deadline reached, cancelling");
            token.cancel();
        })
    });

    let fetched = if settings.keep_going {
        collect_partial(&aggregator, config, &cancel).await
    } else {
        aggregator
            .collect(&config.sources, &cancel)
            .await
            .map(|requests| (requests, Vec::new()))
    };
    if let Some(handle) = deadline {
        handle.abort();
    }
    let (mut requests, failures) = fetched?;

    if let Some(key) = config.sort_by {
        sort_requests(&mut requests, key);
    }
    let render_options = RenderOptions {
        format: config.format,
        zone: config.timezone,
        template: template.as_deref(),
    };
    render(writer, &requests, &render_options)?;
    writer.flush().map_err(|e| crate::error::io_error(&e))?;

    Ok(RunSummary {
        listed: requests.len(),
        failures,
    })
}

async fn collect_partial(
    aggregator: &Aggregator<'_>,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<(Vec<Request>, Vec<SourceFailure>), RequestListError> {
    let outcomes = aggregator.collect_each(&config.sources, cancel).await?;

    let mut requests = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(listed) => requests.extend(listed),
            Err(error) => failures.push(SourceFailure {
                api: outcome.api,
                host: outcome.host,
                error,
            }),
        }
    }
    Ok((requests, failures))
}
