//! GitLab API v4 deserialisation targets.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::provider::fetch::DiscoveredRepository;
use crate::request::RequestRecord;

/// Project entry from `GET /projects?simple=1`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiProject {
    pub(crate) id: u64,
    pub(crate) path_with_namespace: String,
}

impl DiscoveredRepository for ApiProject {
    fn display_name(&self) -> &str {
        &self.path_with_namespace
    }
}

/// Merge request entry from `GET /projects/:id/merge_requests`.
///
/// Older GitLab releases report drafts through `work_in_progress`, newer
/// ones through `draft`; either flag marks the request as WIP.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMergeRequest {
    pub(crate) title: String,
    pub(crate) state: String,
    pub(crate) web_url: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) work_in_progress: bool,
    #[serde(default)]
    pub(crate) draft: bool,
}

impl From<ApiMergeRequest> for RequestRecord {
    fn from(value: ApiMergeRequest) -> Self {
        Self {
            name: value.title,
            state: value.state,
            url: value.web_url,
            created: value.created_at,
            updated: value.updated_at,
            wip: value.work_in_progress || value.draft,
        }
    }
}
