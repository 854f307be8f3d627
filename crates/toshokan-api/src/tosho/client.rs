use reqwest::Client;

use super::error::ToshoError;
use super::types::{FeedEntry, FeedQuery};
use crate::traits::FeedService;

const BASE_URL: &str = "https://feed.animetosho.org";

/// AnimeTosho JSON feed client.
#[derive(Debug, Clone)]
pub struct ToshoClient {
    base_url: String,
    http: Client,
}

impl ToshoClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub async fn search(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>, ToshoError> {
        tracing::debug!(feed_target = ?query.target, search = %query.search, "feed request");

        let resp = self
            .http
            .get(format!("{}/json", self.base_url))
            .query(&query.params())
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status_code, "feed API error");
            return Err(ToshoError::Api {
                status: status_code,
                message: body,
            });
        }

        let entries = resp
            .json::<Vec<FeedEntry>>()
            .await
            .map_err(|e| ToshoError::Parse(e.to_string()))?;
        tracing::debug!(count = entries.len(), "feed response received");
        Ok(entries)
    }
}

impl Default for ToshoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedService for ToshoClient {
    type Error = ToshoError;

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>, ToshoError> {
        self.search(query).await
    }
}
