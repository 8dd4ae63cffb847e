//! HTTP client for the mg-daemon expedition API.

use anyhow::{anyhow, Context, Result};
use mg_expedition::DateWindow;
use mg_schemas::{ExpeditionItem, ExpeditionSummary};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DaemonClient {
    http: reqwest::Client,
    base_url: String,
}

impl DaemonClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn expedition(&self, window: &DateWindow) -> Result<Vec<ExpeditionItem>> {
        self.get_window("/v1/expedition", window).await
    }

    pub async fn summary(&self, window: &DateWindow) -> Result<ExpeditionSummary> {
        self.get_window("/v1/expedition/summary", window).await
    }

    async fn get_window<T: DeserializeOwned>(&self, path: &str, window: &DateWindow) -> Result<T> {
        let start = window.start().format("%Y-%m-%d").to_string();
        let end = window.end().format("%Y-%m-%d").to_string();

        debug!(base_url = %self.base_url, path, %start, %end, "daemon request");
        let resp = self
            .http
            .get(self.url(path))
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()
            .await
            .with_context(|| format!("daemon request failed: {}", self.base_url))?;

        let status = resp.status();
        if !status.is_success() {
            let body: DaemonErrorBody = resp.json().await.unwrap_or_default();
            return Err(anyhow!(
                "daemon http error status={} code={} {}",
                status.as_u16(),
                body.code.as_deref().unwrap_or("UNKNOWN"),
                body.error.as_deref().unwrap_or("")
            ));
        }

        resp.json()
            .await
            .context("daemon response json decode failed")
    }
}

#[derive(Debug, Default, Deserialize)]
struct DaemonErrorBody {
    error: Option<String>,
    code: Option<String>,
}
