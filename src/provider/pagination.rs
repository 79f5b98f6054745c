//! Lazy, cancellable page sequences for provider list endpoints.
//!
//! Every provider list endpoint follows the same shape: a lightweight probe
//! reports the total number of pages, then each page is fetched in order.
//! [`PageSource`] captures those two calls and [`PageSequence`] drives them
//! one page at a time, checking the cancellation token before each fetch.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RequestListError;

/// Position of a [`PageSequence`] within its result set.
///
/// # Example
///
/// ```
/// use git_request_list::provider::pagination::PageInfo;
///
/// let info = PageInfo::new(2, 5);
/// assert!(!info.is_first_page());
/// assert!(!info.is_last_page());
/// assert!(info.has_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Most recently fetched page (1-based, 0 before the first fetch).
    current_page: u32,
    /// Total number of pages reported by the probe.
    total_pages: u32,
}

impl PageInfo {
    /// Creates a new page info instance.
    #[must_use]
    pub const fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// Returns the most recently fetched page number.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns true if more pages exist after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next()
    }
}

/// A paginated list endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item decoded from each page.
    type Item: Send;

    /// Probes the endpoint for its total page count.
    async fn page_count(&self, cancel: &CancellationToken) -> Result<u32, RequestListError>;

    /// Fetches one page (1-based).
    async fn fetch_page(
        &self,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<Self::Item>, RequestListError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceState {
    Unprobed,
    Paging(PageInfo),
    Finished,
}

/// Produces the pages of a [`PageSource`] on demand.
///
/// The sequence is finite and cannot be restarted: once it has yielded its
/// last page, or any error, it only returns `None`.
pub struct PageSequence<'a, S: PageSource> {
    source: &'a S,
    cancel: &'a CancellationToken,
    state: SequenceState,
}

impl<'a, S: PageSource> PageSequence<'a, S> {
    /// Creates a sequence that has not probed its source yet.
    #[must_use]
    pub const fn new(source: &'a S, cancel: &'a CancellationToken) -> Self {
        Self {
            source,
            cancel,
            state: SequenceState::Unprobed,
        }
    }

    /// Returns the pagination position once the source has been probed.
    #[must_use]
    pub const fn page_info(&self) -> Option<PageInfo> {
        match self.state {
            SequenceState::Paging(info) => Some(info),
            SequenceState::Unprobed | SequenceState::Finished => None,
        }
    }

    /// Fetches the next page, probing the source first if needed.
    ///
    /// Returns `None` once all pages have been produced.
    pub async fn next_page(&mut self) -> Option<Result<Vec<S::Item>, RequestListError>> {
        let result = self.advance().await;
        if !matches!(result, Some(Ok(_))) {
            self.state = SequenceState::Finished;
        }
        result
    }

    /// Drains the sequence into one ordered list.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the probe or any page fetch; no
    /// partial list is returned.
    pub async fn collect_all(mut self) -> Result<Vec<S::Item>, RequestListError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await {
            items.extend(page?);
        }
        Ok(items)
    }

    async fn advance(&mut self) -> Option<Result<Vec<S::Item>, RequestListError>> {
        let info = match self.state {
            SequenceState::Finished => return None,
            SequenceState::Paging(info) => info,
            SequenceState::Unprobed => {
                if self.cancel.is_cancelled() {
                    return Some(Err(RequestListError::Cancelled));
                }
                match self.source.page_count(self.cancel).await {
                    Ok(total_pages) => PageInfo::new(0, total_pages),
                    Err(error) => return Some(Err(error)),
                }
            }
        };

        if !info.has_next() {
            return None;
        }
        if self.cancel.is_cancelled() {
            return Some(Err(RequestListError::Cancelled));
        }

        let page = info.current_page() + 1;
        let result = self.source.fetch_page(page, self.cancel).await;
        self.state = SequenceState::Paging(PageInfo::new(page, info.total_pages()));
        Some(result)
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
