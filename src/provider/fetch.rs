//! Fetch algorithm shared by every provider.

use tokio_util::sync::CancellationToken;

use crate::error::RequestListError;
use crate::filter::{RepositoryFilter, keep_request};
use crate::request::{Request, RequestRecord};

use super::pagination::{PageSequence, PageSource};

/// A repository discovered through a provider's list endpoint.
pub(crate) trait DiscoveredRepository: Send + Sync {
    /// Name used for filtering and stamped onto every request.
    fn display_name(&self) -> &str;
}

/// Discovers repositories, filters them, then fetches each accepted
/// repository's requests in discovery order.
///
/// A discovered repository with a blank name fails the whole fetch before
/// any request page is requested.
///
/// `request_pages` builds the page source for one repository; it is only
/// called for repositories accepted by `filter`.
pub(crate) async fn fetch_requests<R, D, Q, F>(
    repositories: &D,
    request_pages: F,
    filter: &RepositoryFilter,
    skip_wip: bool,
    cancel: &CancellationToken,
) -> Result<Vec<Request>, RequestListError>
where
    R: DiscoveredRepository,
    D: PageSource<Item = R>,
    Q: PageSource<Item = RequestRecord>,
    F: Fn(&R) -> Q + Send + Sync,
{
    let discovered = PageSequence::new(repositories, cancel).collect_all().await?;
    tracing::debug!(count = discovered.len(), "discovered repositories");
    if let Some(position) = discovered
        .iter()
        .position(|repository| repository.display_name().trim().is_empty())
    {
        return Err(RequestListError::decode(format!(
            "discovered repository {} has a blank name",
            position + 1
        )));
    }

    let mut requests = Vec::new();
    for repository in &discovered {
        let name = repository.display_name();
        if !filter.accepts(name) {
            tracing::trace!(repository = name, "repository filtered out");
            continue;
        }
        if cancel.is_cancelled() {
            return Err(RequestListError::Cancelled);
        }

        let pages = request_pages(repository);
        let records = PageSequence::new(&pages, cancel).collect_all().await?;
        requests.extend(
            records
                .into_iter()
                .filter(|record| keep_request(record, skip_wip))
                .map(|record| record.into_request(name)),
        );
    }

    Ok(requests)
}
