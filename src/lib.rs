//! Lists open merge and pull requests across GitLab and GitHub instances.
//!
//! Each configured source names a provider API, a host, a token, and the
//! repositories in scope. Providers discover repositories page by page,
//! skip those outside the repository filter, fetch every page of open
//! requests for the rest, and normalise them into [`Request`] values. The
//! [`aggregate::Aggregator`] concatenates sources in declaration order, the
//! result is optionally sorted by a [`SortKey`], and [`output::render`]
//! writes it as a table, JSON, or a user template.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod provider;
pub mod request;
pub mod sort;
pub mod telemetry;

pub use aggregate::{AggregateOptions, Aggregator, SourceOutcome};
pub use config::{Config, RequestListConfig, SourceConfig};
pub use error::RequestListError;
pub use filter::RepositoryFilter;
pub use output::{DisplayZone, OutputFormat};
pub use provider::{
    AccessToken, GitHubProvider, GitLabProvider, Provider, ProviderKind, ProviderRegistry,
    ProviderSettings,
};
pub use request::{Request, RequestRecord};
pub use sort::{SortKey, sort_requests};
