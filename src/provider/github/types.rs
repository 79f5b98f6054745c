//! GitHub REST v3 deserialisation targets.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::provider::fetch::DiscoveredRepository;
use crate::request::RequestRecord;

/// Repository entry from `GET /user/repos`.
///
/// Pull requests are addressed by `owner/name`, so the numeric id is not
/// decoded.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) full_name: String,
}

impl DiscoveredRepository for ApiRepository {
    fn display_name(&self) -> &str {
        &self.full_name
    }
}

/// Pull request entry from `GET /repos/:owner/:repo/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) title: String,
    pub(crate) state: String,
    pub(crate) html_url: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) draft: bool,
}

impl From<ApiPullRequest> for RequestRecord {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            name: value.title,
            state: value.state,
            url: value.html_url,
            created: value.created_at,
            updated: value.updated_at,
            wip: value.draft,
        }
    }
}
