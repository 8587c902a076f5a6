use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    DashboardError,
    model::{ErrorBody, Suggestion, SuggestionsBody, WeatherPayload},
};

use super::WeatherBackend;

/// Talks to the dashboard's JSON backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<(StatusCode, String), DashboardError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Sending backend request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| DashboardError::Transport(format!("Failed to send request to {url}: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| DashboardError::Transport(format!("Failed to read response body: {e}")))?;

        Ok((status, body))
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn weather(&self, city: &str) -> Result<WeatherPayload, DashboardError> {
        let (status, body) = self.get("/weather", &[("city", city)]).await?;

        if !status.is_success() {
            return Err(error_from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            DashboardError::Transport(format!("Failed to parse weather JSON: {e}"))
        })
    }

    #[instrument(skip(self))]
    async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, DashboardError> {
        let (status, body) = self.get("/suggestions", &[("q", query)]).await?;

        if !status.is_success() {
            return Err(error_from_status(status, &body));
        }

        let parsed: SuggestionsBody = serde_json::from_str(&body).map_err(|e| {
            DashboardError::Transport(format!("Failed to parse suggestions JSON: {e}"))
        })?;

        Ok(parsed.suggestions.unwrap_or_default())
    }
}

/// A JSON error body means the backend answered "no such city"; anything else is transport.
fn error_from_status(status: StatusCode, body: &str) -> DashboardError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => DashboardError::NotFound(parsed.error),
        Err(_) => DashboardError::Transport(format!(
            "Request failed with status {}: {}",
            status,
            truncate_body(body),
        )),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
