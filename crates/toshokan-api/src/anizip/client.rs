use reqwest::{Client, StatusCode};

use super::error::AniZipError;
use super::types::Mappings;
use crate::traits::MappingService;

const BASE_URL: &str = "https://api.ani.zip";

/// ani.zip mappings client.
#[derive(Debug, Clone)]
pub struct AniZipClient {
    base_url: String,
    http: Client,
}

impl AniZipClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetch the mappings for an AniList id.
    ///
    /// Media the service does not know about come back as an empty
    /// `Mappings` rather than an error.
    pub async fn get_mappings(&self, anilist_id: u64) -> Result<Mappings, AniZipError> {
        tracing::debug!(anilist_id, "ani.zip mappings request");

        let resp = self
            .http
            .get(format!("{}/mappings", self.base_url))
            .query(&[("anilist_id", anilist_id)])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(anilist_id, "ani.zip has no mappings for media");
            return Ok(Mappings::default());
        }
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(anilist_id, status = status_code, "ani.zip API error");
            return Err(AniZipError::Api {
                status: status_code,
                message: body,
            });
        }

        resp.json::<Mappings>()
            .await
            .map_err(|e| AniZipError::Parse(e.to_string()))
    }
}

impl Default for AniZipClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingService for AniZipClient {
    type Error = AniZipError;

    async fn mappings(&self, anilist_id: u64) -> Result<Mappings, AniZipError> {
        self.get_mappings(anilist_id).await
    }
}
