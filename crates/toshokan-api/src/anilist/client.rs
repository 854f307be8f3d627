use chrono::{DateTime, Utc};
use reqwest::Client;

use super::error::AniListError;
use super::types::{AiringScheduleResponse, GraphQLResponse, Media, MediaResponse};
use crate::traits::AiringService;

const API_URL: &str = "https://graphql.anilist.co";

const MEDIA_QUERY: &str = r#"
query ($id: Int) {
    Media(id: $id, type: ANIME) {
        id
        title { romaji english native }
        synonyms
        episodes
        duration
        status
        format
        type
        season
        seasonYear
        startDate { year month day }
        relations {
            edges {
                relationType(version: 2)
                node {
                    id
                    title { romaji english native }
                    synonyms
                    episodes
                    duration
                    status
                    format
                    type
                    season
                    seasonYear
                    startDate { year month day }
                }
            }
        }
    }
}
"#;

const EPISODE_DATE_QUERY: &str = r#"
query ($id: Int, $ep: Int) {
    AiringSchedule(mediaId: $id, episode: $ep) {
        airingAt
    }
}
"#;

/// AniList GraphQL API client. Both queries used here are public and
/// sent without authentication.
#[derive(Debug, Clone)]
pub struct AniListClient {
    api_url: String,
    http: Client,
}

impl AniListClient {
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    pub fn with_base_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            http: Client::new(),
        }
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        tracing::debug!(operation, status = %status, "AniList response received");
        resp.json::<T>()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))
    }

    /// Fetch a media record together with its relations.
    pub async fn get_media(&self, id: u64) -> Result<Media, AniListError> {
        let resp: GraphQLResponse<MediaResponse> = self
            .graphql_request("Media", MEDIA_QUERY, serde_json::json!({ "id": id }))
            .await?;

        resp.data
            .and_then(|d| d.media)
            .ok_or_else(|| AniListError::Parse(format!("no media with id {id}")))
    }

    /// Airing time of an episode. A missing schedule entry or a zero
    /// timestamp yields `None`.
    pub async fn episode_date(
        &self,
        media_id: u64,
        episode: u32,
    ) -> Result<Option<DateTime<Utc>>, AniListError> {
        let result: Result<GraphQLResponse<AiringScheduleResponse>, _> = self
            .graphql_request(
                "EpisodeDate",
                EPISODE_DATE_QUERY,
                serde_json::json!({ "id": media_id, "ep": episode }),
            )
            .await;

        let resp = match result {
            Ok(resp) => resp,
            // AniList answers 404 when the schedule has no such episode.
            Err(AniListError::Api { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(resp
            .data
            .and_then(|d| d.airing_schedule)
            .and_then(|s| s.airing_at)
            .filter(|&secs| secs != 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }
}

impl Default for AniListClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AiringService for AniListClient {
    type Error = AniListError;

    async fn airing_at(
        &self,
        media_id: u64,
        episode: u32,
    ) -> Result<Option<DateTime<Utc>>, AniListError> {
        self.episode_date(media_id, episode).await
    }
}
