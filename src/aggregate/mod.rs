//! Cross-source aggregation.
//!
//! Every configured source is resolved to a [`Provider`] up front, so an
//! unknown API fails the run before any network call. Sources are then
//! queried one after another and their requests concatenated in declaration
//! order.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::SourceConfig;
use crate::error::RequestListError;
use crate::provider::{Provider, ProviderRegistry, ProviderSettings};
use crate::request::Request;

/// Settings shared by every provider built for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Drops draft / WIP requests.
    pub skip_wip: bool,
    /// Logs provider calls at `info`.
    pub verbose: bool,
    /// Per-call HTTP timeout.
    pub timeout: Option<Duration>,
}

/// Result of querying one source in partial-success mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    /// Host of the source.
    pub host: String,
    /// Provider discriminator of the source.
    pub api: String,
    /// Requests of the source, or the error that aborted it.
    pub result: Result<Vec<Request>, RequestListError>,
}

/// Queries every configured source through the provider registry.
#[derive(Debug)]
pub struct Aggregator<'a> {
    registry: &'a ProviderRegistry,
    options: AggregateOptions,
}

struct ResolvedSource<'s> {
    config: &'s SourceConfig,
    provider: Box<dyn Provider>,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator over `registry`.
    #[must_use]
    pub const fn new(registry: &'a ProviderRegistry, options: AggregateOptions) -> Self {
        Self { registry, options }
    }

    /// Returns the requests of every source, failing on the first error.
    ///
    /// No requests are returned when any source fails, including requests
    /// already fetched from earlier sources.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when a source's provider
    /// cannot be built, [`RequestListError::Cancelled`] when `cancel` fires,
    /// or the first provider error.
    pub async fn collect(
        &self,
        sources: &[SourceConfig],
        cancel: &CancellationToken,
    ) -> Result<Vec<Request>, RequestListError> {
        let resolved = self.resolve(sources)?;

        let mut requests = Vec::new();
        for source in &resolved {
            requests.extend(query(source, cancel).await?);
        }
        tracing::debug!(count = requests.len(), "aggregated requests");
        Ok(requests)
    }

    /// Queries every source and reports each outcome separately.
    ///
    /// A failing source does not stop later sources from being queried.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when a source's provider
    /// cannot be built; no source is queried in that case.
    pub async fn collect_each(
        &self,
        sources: &[SourceConfig],
        cancel: &CancellationToken,
    ) -> Result<Vec<SourceOutcome>, RequestListError> {
        let resolved = self.resolve(sources)?;

        let mut outcomes = Vec::with_capacity(resolved.len());
        for source in &resolved {
            let result = query(source, cancel).await;
            if let Err(error) = &result {
                tracing::warn!(api = %source.config.api, host = %source.config.host, %error, "source failed");
            }
            outcomes.push(SourceOutcome {
                host: source.config.host.clone(),
                api: source.config.api.clone(),
                result,
            });
        }
        Ok(outcomes)
    }

    fn resolve<'s>(
        &self,
        sources: &'s [SourceConfig],
    ) -> Result<Vec<ResolvedSource<'s>>, RequestListError> {
        sources
            .iter()
            .map(|config| {
                let settings = ProviderSettings {
                    host: config.host.clone(),
                    token: config.token.clone(),
                    skip_wip: self.options.skip_wip,
                    verbose: self.options.verbose,
                    timeout: self.options.timeout,
                };
                let provider = self.registry.build(&config.api, &settings)?;
                Ok(ResolvedSource { config, provider })
            })
            .collect()
    }
}

async fn query(
    source: &ResolvedSource<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<Request>, RequestListError> {
    if cancel.is_cancelled() {
        return Err(RequestListError::Cancelled);
    }
    tracing::debug!(api = %source.config.api, host = %source.config.host, "querying source");
    source
        .provider
        .get_requests(&source.config.repositories, cancel)
        .await
}
