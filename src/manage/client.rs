//! HTTP client for the Management API
//!
//! Thin wrapper over reqwest against a single base origin (normally a local
//! reverse proxy in front of the cluster). All requests are bodyless GETs;
//! responses are JSON except for log content, which is plain text.

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failure of a single Management API request.
///
/// `Display` is the user-facing message: a non-2xx response renders exactly
/// `HTTP <status>: <reason>`, a transport failure renders the underlying
/// client message unmodified. Response bodies are never read on error paths.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}: {status_text}")]
    Status { status: u16, status_text: String },
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl FetchError {
    fn from_status(status: reqwest::StatusCode) -> Self {
        FetchError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }
}

/// HTTP client bound to one Management API origin.
#[derive(Clone)]
pub struct ManageClient {
    http: Client,
    base: Url,
}

impl ManageClient {
    /// Create a client for the given origin, e.g. `http://localhost:8080`.
    pub fn new(base: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let base = Url::parse(base)
            .with_context(|| format!("Invalid Management API origin: {base}"))?;
        let http = Client::builder()
            .user_agent(concat!("mladmin/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, path_and_query: &str) -> Result<Url, FetchError> {
        self.base
            .join(path_and_query)
            .map_err(|e| FetchError::Transport(e.to_string()))
    }

    /// GET a JSON endpoint (`Accept: application/json`).
    pub async fn get_json(&self, path_and_query: &str) -> Result<Value, FetchError> {
        let url = self.resolve(path_and_query)?;
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("GET {} failed: {}", url, status);
            return Err(FetchError::from_status(status));
        }

        Ok(response.json().await?)
    }

    /// GET a plain-text endpoint (`Accept: text/plain`).
    pub async fn get_text(&self, path_and_query: &str) -> Result<String, FetchError> {
        let url = self.resolve(path_and_query)?;
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "text/plain")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("GET {} failed: {}", url, status);
            return Err(FetchError::from_status(status));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_matches_browser_wording() {
        let err = FetchError::from_status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let err = FetchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn transport_error_message_is_unmodified() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn resolve_keeps_query_string() {
        let client = ManageClient::new("http://localhost:8080").unwrap();
        let url = client
            .resolve("/manage/v2/logs?filename=ErrorLog.txt&format=text")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/manage/v2/logs?filename=ErrorLog.txt&format=text"
        );
    }
}
