//! Shared mock-server helpers for integration tests.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use git_request_list::{AccessToken, RepositoryFilter, SourceConfig};

/// GitLab project payload.
pub fn project(id: u64, name: &str) -> Value {
    json!({ "id": id, "path_with_namespace": name })
}

/// GitLab merge request payload.
pub fn merge_request(title: &str, updated_day: u32) -> Value {
    json!({
        "title": title,
        "state": "opened",
        "web_url": format!("https://gitlab.example.com/-/merge_requests/{title}"),
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": format!("2024-01-{updated_day:02}T00:00:00Z"),
        "work_in_progress": false
    })
}

/// Mounts a GitLab list endpoint: a `HEAD` probe reporting the page count
/// and one `GET` per page, each expected exactly once.
pub async fn mount_gitlab_pages(server: &MockServer, endpoint: &str, pages: Vec<Vec<Value>>) {
    Mock::given(method("HEAD"))
        .and(path(endpoint))
        .respond_with(
            ResponseTemplate::new(200).insert_header("X-Total-Pages", pages.len().to_string()),
        )
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

/// Fails the test if any call reaches `endpoint`.
pub async fn forbid_calls(server: &MockServer, endpoint: &str) {
    Mock::given(path(endpoint))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// GitLab source pointing at `server` restricted to `repositories`.
///
/// # Panics
///
/// Panics if the repository patterns do not compile.
pub fn gitlab_source(server: &MockServer, repositories: &[&str]) -> SourceConfig {
    let patterns: Vec<String> = repositories.iter().map(|name| (*name).to_owned()).collect();
    SourceConfig {
        api: "gitlab".to_owned(),
        host: server.uri(),
        token: AccessToken::new(Some("secret")),
        repositories: RepositoryFilter::from_patterns(&patterns)
            .unwrap_or_else(|error| panic!("invalid patterns: {error}")),
    }
}
