//! GitLab merge request provider (REST API v4).
//!
//! Projects are discovered through `/projects`, then each accepted project's
//! open merge requests are listed through `/projects/:id/merge_requests`.
//! Both endpoints report their page count in the `X-Total-Pages` header,
//! which is read from a `HEAD` probe before the pages are fetched.

mod types;

use async_trait::async_trait;
use http::header::HeaderName;
use tokio_util::sync::CancellationToken;

use crate::error::RequestListError;
use crate::filter::RepositoryFilter;
use crate::request::{Request, RequestRecord};

use super::client::{ApiClient, header_str};
use super::fetch::fetch_requests;
use super::pagination::PageSource;
use super::{Provider, ProviderSettings};

use types::{ApiMergeRequest, ApiProject};

const API_PATH: &str = "/api/v4";
const TOTAL_PAGES_HEADER: &str = "X-Total-Pages";
const TOKEN_HEADER: &str = "private-token";
const PROJECTS_PATH: &str = "/projects?simple=1&with_merge_requests_enabled=1";

/// GitLab-backed [`Provider`].
#[derive(Debug, Clone)]
pub struct GitLabProvider {
    client: ApiClient,
    skip_wip: bool,
}

impl GitLabProvider {
    /// Creates a provider for the GitLab instance at `settings.host`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when the host or token is
    /// unusable.
    pub fn new(settings: &ProviderSettings) -> Result<Self, RequestListError> {
        let auth = settings
            .token
            .value()
            .map(|token| (HeaderName::from_static(TOKEN_HEADER), token.to_owned()));
        let client = ApiClient::new(
            &settings.host,
            API_PATH,
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
impl Provider for GitLabProvider {
    async fn get_requests(
        &self,
        filter: &RepositoryFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Request>, RequestListError> {
        let projects = ProjectPages {
            client: &self.client,
        };
        fetch_requests(
            &projects,
            |project: &ApiProject| MergeRequestPages {
                client: &self.client,
                project_id: project.id,
            },
            filter,
            self.skip_wip,
            cancel,
        )
        .await
    }
}

struct ProjectPages<'a> {
    client: &'a ApiClient,
}

#[async_trait]
impl PageSource for ProjectPages<'_> {
    type Item = ApiProject;

    async fn page_count(&self, cancel: &CancellationToken) -> Result<u32, RequestListError> {
        probe_total_pages(self.client, PROJECTS_PATH, cancel).await
    }

    async fn fetch_page(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<ApiProject>, RequestListError> {
        self.client
            .get_json(&format!("{PROJECTS_PATH}&page={page}"), cancel)
            .await
    }
}

struct MergeRequestPages<'a> {
    client: &'a ApiClient,
    project_id: u64,
}

impl MergeRequestPages<'_> {
    fn path(&self) -> String {
        format!(
            "/projects/{id}/merge_requests?state=opened",
            id = self.project_id
        )
    }
}

#[async_trait]
impl PageSource for MergeRequestPages<'_> {
    type Item = RequestRecord;

    async fn page_count(&self, cancel: &CancellationToken) -> Result<u32, RequestListError> {
        probe_total_pages(self.client, &self.path(), cancel).await
    }

    async fn fetch_page(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<RequestRecord>, RequestListError> {
        let merge_requests: Vec<ApiMergeRequest> = self
            .client
            .get_json(&format!("{path}&page={page}", path = self.path()), cancel)
            .await?;
        Ok(merge_requests.into_iter().map(RequestRecord::from).collect())
    }
}

async fn probe_total_pages(
    client: &ApiClient,
    path: &str,
    cancel: &CancellationToken,
) -> Result<u32, RequestListError> {
    let headers = client.head(path, cancel).await?;
    let raw = header_str(&headers, TOTAL_PAGES_HEADER).ok_or_else(|| {
        RequestListError::decode(format!("HEAD {path} response has no {TOTAL_PAGES_HEADER} header"))
    })?;
    raw.parse::<u32>().map_err(|error| {
        RequestListError::decode(format!(
            "HEAD {path} returned non-numeric {TOTAL_PAGES_HEADER} `{raw}`: {error}"
        ))
    })
}
