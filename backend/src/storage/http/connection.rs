//! # Astros API Connection
//!
//! Shared HTTP plumbing for the remote repositories: one `reqwest::Client`
//! (connection pool and timeout), the API base URL, bearer authentication and
//! the translation of HTTP outcomes into [`GatewayError`]s.
//!
//! | Remote outcome                 | Result                          |
//! |--------------------------------|---------------------------------|
//! | 2xx with a JSON body           | decoded value                   |
//! | 2xx with an empty body         | decoded from `{}`               |
//! | 401                            | `GatewayError::Unauthorized`    |
//! | other non-2xx                  | `GatewayError::Rejected`        |
//! | network failure or timeout     | `GatewayError::Transport`       |
//! | body that does not decode      | `GatewayError::Decode`          |

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::ApiMessage;
use std::time::Duration;

use crate::domain::models::AuthToken;
use crate::storage::{GatewayError, GatewayResult};

#[derive(Debug, Clone)]
pub struct AstrosConnection {
    client: Client,
    base_url: Url,
}

impl AstrosConnection {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("Invalid Astros API URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Astros API URL '{}' cannot be used as a base URL", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended with percent-encoded path segments
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        token: Option<&AuthToken>,
    ) -> GatewayResult<T> {
        let mut url = self.url(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send::<(), T>(Method::GET, url, None, token).await
    }

    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        token: Option<&AuthToken>,
    ) -> GatewayResult<T> {
        self.send(Method::POST, self.url(segments), body, token).await
    }

    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        token: &AuthToken,
    ) -> GatewayResult<T> {
        self.send(Method::PUT, self.url(segments), Some(body), Some(token)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str], token: &AuthToken) -> GatewayResult<T> {
        self.send::<(), T>(Method::DELETE, self.url(segments), None, Some(token)).await
    }

    async fn send<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        token: Option<&AuthToken>,
    ) -> GatewayResult<T> {
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.bearer_header());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            GatewayError::Transport(e)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} answered 401", method, url);
            return Err(GatewayError::Unauthorized);
        }

        let text = response.text().await.map_err(GatewayError::Transport)?;
        if !status.is_success() {
            let message = rejection_message(&text, status);
            warn!("{} {} answered {}: {}", method, url, status, message);
            return Err(GatewayError::Rejected { status, message });
        }

        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            warn!("{} {} returned an unexpected body: {}", method, url, e);
            GatewayError::Decode(e.to_string())
        })
    }
}

/// The API's `{ "message": ... }` when present, else the raw body
fn rejection_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<ApiMessage>(body)
        .ok()
        .map(|m| m.message)
        .filter(|m| !m.trim().is_empty());

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
