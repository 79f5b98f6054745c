//! Repository and work-in-progress filters applied during fetching.
//!
//! The repository filter is consulted before a repository's requests are
//! fetched so that excluded repositories never cost an API call. The WIP
//! filter is applied per decoded request.

use regex::Regex;

use crate::error::RequestListError;
use crate::request::RequestRecord;

/// Selects which discovered repositories are in scope for a source.
///
/// Patterns are combined into one alternation that must match the whole
/// repository name. A filter built from no patterns accepts every
/// repository.
///
/// # Example
///
/// ```
/// use git_request_list::RepositoryFilter;
///
/// let filter = RepositoryFilter::from_patterns(&["group/ap.*".to_owned()])
///     .expect("pattern should compile");
/// assert!(filter.accepts("group/app"));
/// assert!(!filter.accepts("other/group/app"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryFilter {
    pattern: Option<Regex>,
}

impl RepositoryFilter {
    /// Returns a filter that accepts every repository.
    #[must_use]
    pub const fn accept_all() -> Self {
        Self { pattern: None }
    }

    /// Compiles configured repository patterns into a full-string match.
    ///
    /// Blank entries are ignored. Each remaining entry must be a valid
    /// regular expression on its own, so no entry can escape the anchors.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when any entry is not a
    /// valid regular expression.
    pub fn from_patterns(patterns: &[String]) -> Result<Self, RequestListError> {
        let alternatives: Vec<&str> = patterns
            .iter()
            .map(String::as_str)
            .filter(|pattern| !pattern.is_empty())
            .collect();
        for alternative in &alternatives {
            Regex::new(alternative).map_err(|error| {
                RequestListError::configuration(format!(
                    "invalid repository pattern `{alternative}`: {error}"
                ))
            })?;
        }
        Self::anchored(&alternatives)
    }

    /// Builds a filter that accepts exactly the given repository names.
    ///
    /// Blank names are kept, so a list holding only `""` accepts no real
    /// repository. An empty list accepts every repository.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] if the escaped names do
    /// not compile, which only happens past the regex size limit.
    pub fn exact<S: AsRef<str>>(names: &[S]) -> Result<Self, RequestListError> {
        let escaped: Vec<String> = names
            .iter()
            .map(|name| regex::escape(name.as_ref()))
            .collect();
        let alternatives: Vec<&str> = escaped.iter().map(String::as_str).collect();
        Self::anchored(&alternatives)
    }

    fn anchored(alternatives: &[&str]) -> Result<Self, RequestListError> {
        if alternatives.is_empty() {
            return Ok(Self::accept_all());
        }

        let combined = format!("^(?:{})$", alternatives.join("|"));
        let pattern = Regex::new(&combined).map_err(|error| {
            RequestListError::configuration(format!(
                "invalid repository pattern `{combined}`: {error}"
            ))
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns true when every repository is accepted.
    #[must_use]
    pub const fn is_accept_all(&self) -> bool {
        self.pattern.is_none()
    }

    /// Returns true when the repository is in scope.
    #[must_use]
    pub fn accepts(&self, repository: &str) -> bool {
        self.pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(repository))
    }
}

/// Returns true when a decoded request survives the WIP filter.
#[must_use]
pub const fn keep_request(record: &RequestRecord, skip_wip: bool) -> bool {
    !(skip_wip && record.wip)
}
