//! Provider-agnostic representation of an open change request.
//!
//! Providers decode their own wire types and convert them into [`Request`]
//! through [`RequestRecord::into_request`], which is the only place where the
//! owning repository name is attached. A request therefore never leaves the
//! fetch stage without a repository.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A normalized open merge or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Title of the request.
    pub name: String,
    /// Display name of the owning repository (e.g. `group/project`).
    pub repository: String,
    /// State as reported by the provider (e.g. `opened`, `open`).
    pub state: String,
    /// Canonical link for displaying to a user.
    pub url: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last update timestamp.
    pub updated: DateTime<Utc>,
    /// Draft / work-in-progress indicator.
    #[serde(skip)]
    pub wip: bool,
}

/// Decoded request fields that are still missing their repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// Title of the request.
    pub name: String,
    /// Provider-reported state.
    pub state: String,
    /// Canonical link.
    pub url: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last update timestamp.
    pub updated: DateTime<Utc>,
    /// Draft / work-in-progress indicator.
    pub wip: bool,
}

impl RequestRecord {
    /// Stamps the owning repository onto the record.
    #[must_use]
    pub fn into_request(self, repository: &str) -> Request {
        Request {
            name: self.name,
            repository: repository.to_owned(),
            state: self.state,
            url: self.url,
            created: self.created,
            updated: self.updated,
            wip: self.wip,
        }
    }
}
