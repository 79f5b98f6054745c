//! Ordering of the aggregated request listing.
//!
//! The sort key is selected once from configuration and applied after all
//! sources have been merged. Sorting is stable: requests with equal keys keep
//! their merge order (source order, then provider order).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::RequestListError;
use crate::request::Request;

/// Field used to order the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Repository display name, lexicographic.
    Repository,
    /// Request title, lexicographic.
    Name,
    /// Provider-reported state, lexicographic.
    State,
    /// Canonical link, lexicographic.
    Url,
    /// Creation time, oldest first.
    Created,
    /// Last update time, oldest first.
    Updated,
}

impl SortKey {
    /// All supported keys, in documentation order.
    pub const ALL: [Self; 6] = [
        Self::Repository,
        Self::Name,
        Self::State,
        Self::Url,
        Self::Created,
        Self::Updated,
    ];

    /// Returns the configuration value for this key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Name => "name",
            Self::State => "state",
            Self::Url => "url",
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }

    /// Compares two requests by this key.
    #[must_use]
    pub fn compare(&self, a: &Request, b: &Request) -> Ordering {
        match self {
            Self::Repository => a.repository.cmp(&b.repository),
            Self::Name => a.name.cmp(&b.name),
            Self::State => a.state.cmp(&b.state),
            Self::Url => a.url.cmp(&b.url),
            Self::Created => a.created.cmp(&b.created),
            Self::Updated => a.updated.cmp(&b.updated),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = RequestListError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalised)
            .ok_or_else(|| {
                RequestListError::configuration(format!(
                    "unsupported sort key `{value}` (expected one of: repository, name, state, url, created, updated)"
                ))
            })
    }
}

/// Sorts requests in place by the given key, preserving the relative order
/// of requests with equal keys.
pub fn sort_requests(requests: &mut [Request], key: SortKey) {
    requests.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "test assertions use known indices")]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn make_request(id: u32, repository: &str, name: &str, state: &str, day: u32) -> Request {
        Request {
            name: name.to_owned(),
            repository: repository.to_owned(),
            state: state.to_owned(),
            url: format!("https://example.com/{name}"),
            created: at(day),
            updated: at(28 - day),
            wip: id % 2 == 0,
        }
    }

    fn sample() -> Vec<Request> {
        vec![
            make_request(1, "b/repo", "delta", "opened", 3),
            make_request(2, "a/repo", "alpha", "opened", 1),
            make_request(3, "b/repo", "charlie", "merged", 3),
            make_request(4, "a/repo", "bravo", "closed", 2),
            make_request(5, "c/repo", "alpha", "opened", 1),
        ]
    }

    fn is_non_decreasing(requests: &[Request], key: SortKey) -> bool {
        requests
            .windows(2)
            .all(|pair| key.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }

    #[rstest]
    #[case(SortKey::Repository)]
    #[case(SortKey::Name)]
    #[case(SortKey::State)]
    #[case(SortKey::Url)]
    #[case(SortKey::Created)]
    #[case(SortKey::Updated)]
    fn output_is_non_decreasing_and_stable(#[case] key: SortKey) {
        let original = sample();
        let mut sorted = original.clone();

        sort_requests(&mut sorted, key);

        assert!(is_non_decreasing(&sorted, key), "{key} order violated");
        assert_eq!(sorted.len(), original.len());

        // Equal keys keep their merge order.
        for (i, a) in sorted.iter().enumerate() {
            for b in sorted.iter().skip(i + 1) {
                if key.compare(a, b) == Ordering::Equal {
                    let pos_a = original.iter().position(|r| r == a);
                    let pos_b = original.iter().position(|r| r == b);
                    assert!(pos_a < pos_b, "{key} sort is not stable");
                }
            }
        }
    }

    #[test]
    fn repository_sort_keeps_merge_order_within_repository() {
        let mut requests = sample();
        sort_requests(&mut requests, SortKey::Repository);

        let names: Vec<&str> = requests.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["alpha", "bravo", "delta", "charlie", "alpha"]);
        assert_eq!(requests[4].repository, "c/repo");
    }

    #[test]
    fn created_sort_is_chronological() {
        let mut requests = sample();
        sort_requests(&mut requests, SortKey::Created);

        assert_eq!(requests[0].created, at(1));
        assert_eq!(requests[0].repository, "a/repo");
        assert_eq!(requests[1].repository, "c/repo");
        assert_eq!(requests[4].created, at(3));
    }

    #[rstest]
    #[case("repository", SortKey::Repository)]
    #[case("Name", SortKey::Name)]
    #[case("STATE", SortKey::State)]
    #[case(" url ", SortKey::Url)]
    #[case("created", SortKey::Created)]
    #[case("Updated", SortKey::Updated)]
    fn parses_keys_case_insensitively(#[case] input: &str, #[case] expected: SortKey) {
        assert_eq!(input.parse::<SortKey>(), Ok(expected));
    }

    #[test]
    fn unknown_key_is_a_configuration_error() {
        let error = "author"
            .parse::<SortKey>()
            .expect_err("author is not a sort key");

        assert!(
            matches!(error, RequestListError::Configuration { ref message } if message.contains("author")),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn empty_slice_is_no_op() {
        let mut requests: Vec<Request> = vec![];
        sort_requests(&mut requests, SortKey::Name);
        assert!(requests.is_empty());
    }
}
