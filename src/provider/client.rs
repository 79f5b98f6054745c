//! Shared HTTP plumbing for provider implementations.
//!
//! [`ApiClient`] owns one `reqwest::Client` per provider, prefixes every path
//! with the provider's API base, attaches the authentication header, logs
//! each outbound call and races it against the cancellation token.

use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::RequestListError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Authenticated HTTP client bound to one provider API base.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    auth: Option<(HeaderName, HeaderValue)>,
    verbose: bool,
}

impl ApiClient {
    /// Builds a client for `host` + `api_path`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestListError::Configuration`] when the host is not an
    /// absolute URL, the token is not a valid header value, or the HTTP
    /// client cannot be configured.
    pub(crate) fn new(
        host: &str,
        api_path: &str,
        auth: Option<(HeaderName, String)>,
        verbose: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, RequestListError> {
        let parsed = Url::parse(host).map_err(|error| {
            RequestListError::configuration(format!("invalid host `{host}`: {error}"))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RequestListError::configuration(format!(
                "host `{host}` cannot be used as an API base"
            )));
        }

        let auth_header = auth
            .map(|(name, token)| {
                let mut value = HeaderValue::from_str(&token).map_err(|error| {
                    RequestListError::configuration(format!("invalid token: {error}"))
                })?;
                value.set_sensitive(true);
                Ok::<_, RequestListError>((name, value))
            })
            .transpose()?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(duration) = timeout {
            builder = builder.timeout(duration);
        }
        let http = builder.build().map_err(|error| {
            RequestListError::configuration(format!("failed to configure HTTP client: {error}"))
        })?;

        Ok(Self {
            http,
            api_base: format!("{}{api_path}", host.trim_end_matches('/')),
            auth: auth_header,
            verbose,
        })
    }

    /// Issues a `HEAD` request and returns the response headers.
    pub(crate) async fn head(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<HeaderMap, RequestListError> {
        let response = self.send(Method::HEAD, path, cancel).await?;
        Ok(response.headers().clone())
    }

    /// Issues a `GET` request and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, RequestListError> {
        let response = self.send(Method::GET, path, cancel).await?;
        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RequestListError::Cancelled),
            body = response.bytes() => body.map_err(|error| transport_error(path, &error))?,
        };

        serde_json::from_slice(&body).map_err(|error| {
            RequestListError::decode(format!("GET {path} returned malformed JSON: {error}"))
        })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, RequestListError> {
        let url = format!("{}{path}", self.api_base);
        if self.verbose {
            tracing::info!(%method, %url, "provider request");
        } else {
            tracing::debug!(%method, %url, "provider request");
        }

        let mut request = self.http.request(method.clone(), &url);
        if let Some((name, value)) = &self.auth {
            request = request.header(name.clone(), value.clone());
        }

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RequestListError::Cancelled),
            response = request.send() => response.map_err(|error| transport_error(path, &error))?,
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = if method == Method::HEAD {
            String::new()
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(RequestListError::Cancelled),
                body = response.text() => body.unwrap_or_default(),
            }
        };
        Err(api_error(&method, path, status, &body))
    }
}

/// Reads a header as a trimmed string.
pub(crate) fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
}

fn transport_error(path: &str, error: &reqwest::Error) -> RequestListError {
    RequestListError::Transport {
        message: format!("{path}: {error}"),
    }
}

fn api_error(method: &Method, path: &str, status: StatusCode, body: &str) -> RequestListError {
    let excerpt: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    let message = if excerpt.is_empty() {
        format!("{method} {path} failed")
    } else {
        format!("{method} {path} failed: {excerpt}")
    };
    RequestListError::Api {
        status: status.as_u16(),
        message,
    }
}
