//! GitHub pull request provider (REST API v3).
//!
//! Repositories visible to the token are discovered through `/user/repos`,
//! then each accepted repository's open pull requests are listed through
//! `/repos/:owner/:repo/pulls`. GitHub advertises pagination through the
//! `Link` header; the `rel="last"` entry of a `HEAD` probe carries the page
//! count. A response without a `Link` header fits on one page.
//!
//! The configured host is the API root, e.g. `https://api.github.com` or
//! `https://github.example.com/api/v3` for GitHub Enterprise.

mod types;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, LINK};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::RequestListError;
use crate::filter::RepositoryFilter;
use crate::request::{Request, RequestRecord};

use super::client::{ApiClient, header_str};
use super::fetch::fetch_requests;
use super::pagination::PageSource;
use super::{Provider, ProviderSettings};

use types::{ApiPullRequest, ApiRepository};

const REPOSITORIES_PATH: &str = "/user/repos";

/// GitHub-backed [`Provider`].
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: ApiClient,
    skip_wip: bool,
}

impl GitHubProvider {
    /// Creates a provider for the GitHub API rooted at `settings.host`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when the host or token is
    /// unusable.
    pub fn new(settings: &ProviderSettings) -> Result<Self, RequestListError> {
        let auth = settings
            .token
            .value()
            .map(|token| (AUTHORIZATION, format!("Bearer {token}")));
        let client = ApiClient::new(
            &settings.host,
            "",
            auth,
            settings.verbose,
            settings.timeout,
        )?;

        Ok(Self {
            client,
            skip_wip: settings.skip_wip,
        })
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    async fn get_requests(
        &self,
        filter: &RepositoryFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Request>, RequestListError> {
        let repositories = RepositoryPages {
            client: &self.client,
        };
        fetch_requests(
            &repositories,
            |repository: &ApiRepository| PullRequestPages {
                client: &self.client,
                full_name: repository.full_name.clone(),
            },
            filter,
            self.skip_wip,
            cancel,
        )
        .await
    }
}

struct RepositoryPages<'a> {
    client: &'a ApiClient,
}

#[async_trait]
impl PageSource for RepositoryPages<'_> {
    type Item = ApiRepository;

    async fn page_count(&self, cancel: &CancellationToken) -> Result<u32, RequestListError> {
        probe_last_page(self.client, REPOSITORIES_PATH, cancel).await
    }

    async fn fetch_page(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<ApiRepository>, RequestListError> {
        self.client
            .get_json(&format!("{REPOSITORIES_PATH}?page={page}"), cancel)
            .await
    }
}

struct PullRequestPages<'a> {
    client: &'a ApiClient,
    full_name: String,
}

impl PullRequestPages<'_> {
    fn path(&self) -> String {
        format!("/repos/{name}/pulls?state=open", name = self.full_name)
    }
}

#[async_trait]
impl PageSource for PullRequestPages<'_> {
    type Item = RequestRecord;

    async fn page_count(&self, cancel: &CancellationToken) -> Result<u32, RequestListError> {
        probe_last_page(self.client, &self.path(), cancel).await
    }

    async fn fetch_page(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RequestRecord>, RequestListError> {
        let pulls: Vec<ApiPullRequest> = self
            .client
            .get_json(&format!("{path}&page={page}", path = self.path()), cancel)
            .await?;
        Ok(pulls.into_iter().map(RequestRecord::from).collect())
    }
}

async fn probe_last_page(
    client: &ApiClient,
    path: &str,
    cancel: &CancellationToken,
) -> Result<u32, RequestListError> {
    let headers = client.head(path, cancel).await?;
    header_str(&headers, LINK.as_str()).map_or(Ok(1), |link| {
        last_page_from_link(link).map_err(|detail| {
            RequestListError::decode(format!("HEAD {path} returned unusable Link header: {detail}"))
        })
    })
}

/// Extracts the `page` query parameter of the `rel="last"` link.
///
/// GitHub omits `rel="last"` when the probed page is already the last one,
/// so a `Link` header without it also means a single page.
fn last_page_from_link(link: &str) -> Result<u32, String> {
    let Some(target) = link.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        params
            .split(';')
            .any(|param| param.trim() == r#"rel="last""#)
            .then_some(target.trim())
    }) else {
        return Ok(1);
    };

    let raw_url = target
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| format!("`{target}` is not enclosed in angle brackets"))?;
    let url = Url::parse(raw_url).map_err(|error| format!("`{raw_url}`: {error}"))?;
    let page = url
        .query_pairs()
        .find_map(|(key, value)| (key == "page").then(|| value.into_owned()))
        .ok_or_else(|| format!("`{raw_url}` has no page parameter"))?;
    page.parse::<u32>()
        .map_err(|error| format!("page `{page}` in `{raw_url}`: {error}"))
}

#[cfg(test)]
mod tests;
