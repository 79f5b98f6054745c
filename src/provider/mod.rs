//! Hosting provider abstraction and discriminator-based registry.
//!
//! Each configured source names an API discriminator (`gitlab`, `github`).
//! The [`ProviderRegistry`] maps that discriminator to a constructor that
//! builds a [`Provider`] from the source's [`ProviderSettings`]. Providers
//! share the same fetch algorithm: paginated repository discovery, the
//! repository filter, a paginated fetch of each repository's open requests,
//! the WIP filter, and repository stamping.

mod client;
mod fetch;
pub mod github;
pub mod gitlab;
pub mod pagination;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RequestListError;
use crate::filter::RepositoryFilter;
use crate::request::Request;

pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;

/// Capability implemented once per hosting API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the open requests of every repository accepted by `filter`.
    ///
    /// Repositories rejected by the filter are never fetched. The first
    /// failure aborts the whole call and no partial list is returned.
    async fn get_requests(
        &self,
        filter: &RepositoryFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Request>, RequestListError>;
}

/// Built-in provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// GitLab REST API v4.
    GitLab,
    /// GitHub REST API v3.
    GitHub,
}

impl ProviderKind {
    /// Returns the configuration discriminator for this provider.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GitLab => "gitlab",
            Self::GitHub => "github",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = RequestListError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "gitlab" => Ok(Self::GitLab),
            "github" => Ok(Self::GitHub),
            _ => Err(RequestListError::configuration(format!(
                "unsupported api `{value}` (expected gitlab or github)"
            ))),
        }
    }
}

/// Static access token; blank values mean anonymous access.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AccessToken(Option<String>);

impl AccessToken {
    /// Wraps an optional token, trimming whitespace and discarding blanks.
    #[must_use]
    pub fn new(token: Option<&str>) -> Self {
        Self(
            token
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
        )
    }

    /// Borrows the token value when present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.0.is_some() { "<redacted>" } else { "<none>" };
        f.debug_tuple("AccessToken").field(&shown).finish()
    }
}

/// Everything a provider constructor needs for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base URL of the hosting instance.
    pub host: String,
    /// Credential sent with every call.
    pub token: AccessToken,
    /// Drops draft / WIP requests after decoding.
    pub skip_wip: bool,
    /// Logs each outbound call at `info` instead of `debug`.
    pub verbose: bool,
    /// Per-call HTTP timeout.
    pub timeout: Option<Duration>,
}

/// Builds a provider from its settings.
pub type ProviderConstructor =
    Box<dyn Fn(&ProviderSettings) -> Result<Box<dyn Provider>, RequestListError> + Send + Sync>;

/// Maps API discriminators to provider constructors.
pub struct ProviderRegistry {
    constructors: HashMap<String, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Creates a registry populated with every built-in [`ProviderKind`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(ProviderKind::GitLab.as_str(), |settings| {
            Ok(Box::new(GitLabProvider::new(settings)?))
        });
        registry.register(ProviderKind::GitHub.as_str(), |settings| {
            Ok(Box::new(GitHubProvider::new(settings)?))
        });
        registry
    }

    /// Registers (or replaces) the constructor for a discriminator.
    ///
    /// Discriminators are matched case-insensitively.
    pub fn register<F>(&mut self, api: &str, constructor: F)
    where
        F: Fn(&ProviderSettings) -> Result<Box<dyn Provider>, RequestListError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors
            .insert(api.to_lowercase(), Box::new(constructor));
    }

    /// Returns true when a constructor exists for the discriminator.
    #[must_use]
    pub fn supports(&self, api: &str) -> bool {
        self.constructors.contains_key(&api.to_lowercase())
    }

    /// Builds the provider registered for `api`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when no provider is
    /// registered for the discriminator, or whatever the constructor reports.
    pub fn build(
        &self,
        api: &str,
        settings: &ProviderSettings,
    ) -> Result<Box<dyn Provider>, RequestListError> {
        let constructor = self.constructors.get(&api.to_lowercase()).ok_or_else(|| {
            RequestListError::configuration(format!("no provider registered for api `{api}`"))
        })?;
        constructor(settings)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut apis: Vec<&String> = self.constructors.keys().collect();
        apis.sort();
        f.debug_struct("ProviderRegistry")
            .field("apis", &apis)
            .finish()
    }
}
