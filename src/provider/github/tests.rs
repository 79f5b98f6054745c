//! Tests for the GitHub provider against a mock GitHub API.

use rstest::rstest;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{GitHubProvider, last_page_from_link};
use crate::error::RequestListError;
use crate::filter::RepositoryFilter;
use crate::provider::{AccessToken, Provider, ProviderSettings};

fn repository(id: u64, full_name: &str) -> Value {
    json!({ "id": id, "full_name": full_name, "private": false })
}

fn pull_request(title: &str, draft: bool) -> Value {
    json!({
        "number": 1,
        "title": title,
        "state": "open",
        "html_url": format!("https://github.com/octo/repo/pull/{title}"),
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-02T10:00:00Z",
        "draft": draft
    })
}

fn settings(server: &MockServer, skip_wip: bool) -> ProviderSettings {
    ProviderSettings {
        host: server.uri(),
        token: AccessToken::new(Some("ghp-token")),
        skip_wip,
        verbose: false,
        timeout: None,
    }
}

/// Mounts a `HEAD` probe advertising the last page through `Link`, plus one
/// `GET` per page. A single page is advertised without a `Link` header.
async fn mount_paginated(server: &MockServer, endpoint: &str, pages: Vec<Vec<Value>>) {
    let mut probe = ResponseTemplate::new(200);
    if pages.len() > 1 {
        let last = pages.len();
        probe = probe.insert_header(
            "Link",
            format!(
                "<{uri}{endpoint}?page=2>; rel=\"next\", <{uri}{endpoint}?page={last}>; rel=\"last\"",
                uri = server.uri()
            ),
        );
    }
    Mock::given(method("HEAD"))
        .and(path(endpoint))
        .respond_with(probe)
        .expect(1)
        .mount(server)
        .await;

    for (index, items) in pages.into_iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(items))
            .expect(1)
            .mount(server)
            .await;
    }
}

async fn list(
    server: &MockServer,
    skip_wip: bool,
    filter: &RepositoryFilter,
) -> Result<Vec<crate::Request>, RequestListError> {
    let provider = GitHubProvider::new(&settings(server, skip_wip)).expect("provider should build");
    provider.get_requests(filter, &CancellationToken::new()).await
}

#[rstest]
#[case::last_entry_second(r#"<https://api.github.com/user/repos?page=2>; rel="next", <https://api.github.com/user/repos?page=7>; rel="last""#, 7)]
#[case::last_entry_first(r#"<https://api.github.com/user/repos?per_page=30&page=12>; rel="last", <https://api.github.com/user/repos?page=2>; rel="next""#, 12)]
#[case::no_last_entry(r#"<https://api.github.com/user/repos?page=1>; rel="prev""#, 1)]
fn reads_last_page_from_link(#[case] link: &str, #[case] expected: u32) {
    assert_eq!(last_page_from_link(link), Ok(expected));
}

#[rstest]
#[case::missing_brackets(r#"https://api.github.com/user/repos?page=3; rel="last""#)]
#[case::missing_page(r#"<https://api.github.com/user/repos>; rel="last""#)]
#[case::non_numeric_page(r#"<https://api.github.com/user/repos?page=last>; rel="last""#)]
fn rejects_unusable_last_links(#[case] link: &str) {
    assert!(last_page_from_link(link).is_err(), "`{link}` should be rejected");
}

#[tokio::test]
async fn lists_pull_requests_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/user/repos"))
        .and(header("Authorization", "Bearer ghp-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header("Authorization", "Bearer ghp-token"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![repository(1, "octo/repo")]))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/repos/octo/repo/pulls"))
        .and(query_param("state", "open"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/pulls"))
        .and(query_param("state", "open"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![pull_request("fix", false)]))
        .expect(1)
        .mount(&server)
        .await;

    let requests = list(&server, false, &RepositoryFilter::accept_all())
        .await
        .expect("listing should succeed");

    assert_eq!(requests.len(), 1);
    let request = requests.first().expect("one request");
    assert_eq!(request.repository, "octo/repo");
    assert_eq!(request.name, "fix");
    assert_eq!(request.state, "open");
    assert_eq!(request.url, "https://github.com/octo/repo/pull/fix");
}

#[rstest]
#[case::one_page(1)]
#[case::five_pages(5)]
#[case::hundred_pages(100)]
#[tokio::test]
async fn follows_link_header_to_the_last_page(#[case] page_count: usize) {
    let server = MockServer::start().await;
    mount_paginated(&server, "/user/repos", vec![vec![repository(1, "octo/repo")]]).await;
    let pages: Vec<Vec<Value>> = (1..=page_count)
        .map(|page| vec![pull_request(&format!("pr-{page}"), false)])
        .collect();
    mount_paginated(&server, "/repos/octo/repo/pulls", pages).await;

    let requests = list(&server, false, &RepositoryFilter::accept_all())
        .await
        .expect("listing should succeed");

    let names: Vec<String> = requests.into_iter().map(|request| request.name).collect();
    let expected: Vec<String> = (1..=page_count).map(|page| format!("pr-{page}")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn filtered_out_repositories_and_drafts_are_dropped() {
    let server = MockServer::start().await;
    mount_paginated(
        &server,
        "/user/repos",
        vec![
            vec![repository(1, "octo/keep")],
            vec![repository(2, "octo/skip")],
        ],
    )
    .await;
    mount_paginated(
        &server,
        "/repos/octo/keep/pulls",
        vec![vec![pull_request("ready", false), pull_request("draft", true)]],
    )
    .await;
    Mock::given(path("/repos/octo/skip/pulls"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let filter = RepositoryFilter::from_patterns(&["octo/ke.*".to_owned()])
        .expect("pattern should compile");

    let requests = list(&server, true, &filter)
        .await
        .expect("listing should succeed");

    let names: Vec<&str> = requests.iter().map(|request| request.name.as_str()).collect();
    assert_eq!(names, ["ready"]);
}

#[tokio::test]
async fn unparsable_last_link_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/user/repos"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Link", r#"<not a url?page=2>; rel="last""#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Value>::new()))
        .expect(0)
        .mount(&server)
        .await;

    let error = list(&server, false, &RepositoryFilter::accept_all())
        .await
        .expect_err("bad Link header should fail");

    assert!(
        matches!(error, RequestListError::Decode { ref message } if message.contains("Link")),
        "expected Decode error, got {error:?}"
    );
}

#[tokio::test]
async fn unauthorised_token_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let error = list(&server, false, &RepositoryFilter::accept_all())
        .await
        .expect_err("401 should fail");

    assert!(
        matches!(error, RequestListError::Api { status: 401, .. }),
        "expected Api error, got {error:?}"
    );
}
