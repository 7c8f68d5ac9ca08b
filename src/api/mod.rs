//! HTTP plumbing and the per-area backend operations.

use log::{error, info, warn};
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

pub mod auth;
pub mod candidates;
pub mod committee;
pub mod voting;

/// A blocking client for the election backend. Holds no session state;
/// authenticated operations take the bearer token explicitly.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base(config.api_base(), config.request_timeout())
    }

    /// Build a client against an explicit base URL, e.g. a `--api-base`
    /// override.
    pub fn with_base(base: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Send a request, logging it and its response the same way on every
    /// path.
    pub(crate) fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        info!("->req {} {}", request.method(), request.url());

        let response = self.http.execute(request)?;
        let status = response.status();
        let log_msg = format!("<-rsp {} {}", status, response.url());
        if status.is_server_error() {
            error!("{log_msg}");
        } else if status.is_client_error() {
            warn!("{log_msg}");
        } else {
            info!("{log_msg}");
        }
        Ok(response)
    }

    /// Send a request and map any non-success response into the error
    /// taxonomy.
    pub(crate) fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.execute(request)?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(response_error(status, &body))
        }
    }
}

/// Classify a non-success response. A 401 is the sole trigger for forced
/// client-side logout, so it gets its own variant.
pub(crate) fn response_error(status: StatusCode, body: &str) -> Error {
    let message = error_message(body)
        .unwrap_or_else(|| format!("request failed with status {status}"));
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthenticated(message),
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        _ => Error::Rejected(message),
    }
}

/// Pull the human-readable message out of an error body, from whichever
/// field this backend revision used.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "message"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_both_fields() {
        assert_eq!(
            Some("You have already voted".to_string()),
            error_message(r#"{"msg": "You have already voted"}"#)
        );
        assert_eq!(
            Some("No such candidate".to_string()),
            error_message(r#"{"message": "No such candidate"}"#)
        );
        assert_eq!(None, error_message("not json"));
        assert_eq!(None, error_message(r#"{"error": "other key"}"#));
    }

    #[test]
    fn status_classification() {
        let err = response_error(StatusCode::UNAUTHORIZED, r#"{"msg": "expired"}"#);
        assert!(matches!(err, Error::Unauthenticated(msg) if msg == "expired"));

        let err = response_error(StatusCode::FORBIDDEN, "");
        assert!(matches!(err, Error::Forbidden(_)));

        let err = response_error(StatusCode::CONFLICT, r#"{"msg": "already voted"}"#);
        assert!(err.is_duplicate_vote());

        let err = response_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(err, Error::Rejected(msg) if msg.contains("500")));
    }

    #[test]
    fn base_url_joining_tolerates_slashes() {
        let client =
            ApiClient::with_base("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!("http://localhost:5000/api/votes", client.url("/votes"));
        assert_eq!("http://localhost:5000/api/votes", client.url("votes"));
    }
}
