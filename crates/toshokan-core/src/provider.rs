//! Release providers and their registry.
//!
//! A provider turns a media and an episode number into a ranked list of
//! releases. [`ToshoProvider`] does so through AniDB mappings and the
//! AnimeTosho feed; the [`ProviderRegistry`] fans a request out to every
//! registered provider.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use toshokan_api::anilist::AniListClient;
use toshokan_api::anizip::AniZipClient;
use toshokan_api::tosho::ToshoClient;
use toshokan_api::traits::{AiringService, FeedService, MappingService};

use crate::config::AppConfig;
use crate::dedup::dedupe;
use crate::episode::match_episode;
use crate::error::ToshokanError;
use crate::models::{EpisodeRecord, FeedEntry, Mappings, Media, Release};
use crate::query::{build_queries, fetch_plan};
use crate::rank::{ReleaseRanker, SeederRanker};
use crate::resolver::resolve;

/// What the caller wants releases for.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub media: Media,
    /// 1-based episode number; `None` asks for batches only.
    pub episode: Option<u32>,
}

pub trait ReleaseProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Releases for `request`, best first. `quality` narrows the search
    /// when the provider supports it.
    fn find_releases<'a>(
        &'a self,
        request: &'a ReleaseRequest,
        quality: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<Release>, ToshokanError>>;
}

/// Release provider backed by AniDB mappings and the AnimeTosho feed.
pub struct ToshoProvider<M, A, F, R = SeederRanker> {
    mappings: M,
    airing: A,
    feed: F,
    ranker: R,
    exclusions: Vec<String>,
}

impl<M, A, F> ToshoProvider<M, A, F> {
    pub fn new(mappings: M, airing: A, feed: F, exclusions: Vec<String>) -> Self {
        Self {
            mappings,
            airing,
            feed,
            ranker: SeederRanker,
            exclusions,
        }
    }
}

impl ToshoProvider<AniZipClient, AniListClient, ToshoClient> {
    /// Provider talking to the endpoints named in `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AniZipClient::with_base_url(&config.endpoints.anizip),
            AniListClient::with_base_url(&config.endpoints.anilist),
            ToshoClient::with_base_url(&config.endpoints.tosho),
            config.feed.exclusions.clone(),
        )
    }
}

impl<M, A, F, R> ToshoProvider<M, A, F, R>
where
    M: MappingService,
    A: AiringService,
    F: FeedService,
    R: ReleaseRanker,
{
    pub fn with_ranker<R2: ReleaseRanker>(self, ranker: R2) -> ToshoProvider<M, A, F, R2> {
        ToshoProvider {
            mappings: self.mappings,
            airing: self.airing,
            feed: self.feed,
            ranker,
            exclusions: self.exclusions,
        }
    }

    /// Resolve, match, fetch, merge and rank the releases for one episode.
    ///
    /// The feed is searched with `quality` first; when that finds nothing
    /// the search is repeated without it.
    pub async fn releases(
        &self,
        media: &Media,
        episode: Option<u32>,
        quality: Option<&str>,
    ) -> Result<Vec<Release>, ToshokanError> {
        let Some(mappings) = resolve(&self.mappings, media).await? else {
            tracing::info!(media_id = media.id, "no AniDB mapping, no releases");
            return Ok(Vec::new());
        };

        let record = match_episode(&self.airing, media, episode, &mappings).await;
        tracing::debug!(
            media_id = media.id,
            episode = ?episode,
            anidb_eid = ?record.as_ref().and_then(|r| r.anidb_eid),
            "matched episode"
        );

        let quality = quality.map(str::trim).filter(|q| !q.is_empty());
        let mut entries = self
            .fetch_pass(media, record.as_ref(), &mappings, quality)
            .await;
        if entries.is_empty() && quality.is_some() {
            tracing::debug!(media_id = media.id, "nothing at preferred quality, retrying");
            entries = self.fetch_pass(media, record.as_ref(), &mappings, None).await;
        }

        let releases = dedupe(entries);
        tracing::info!(media_id = media.id, count = releases.len(), "releases found");
        Ok(self.ranker.rank(releases))
    }

    async fn fetch_pass(
        &self,
        media: &Media,
        record: Option<&EpisodeRecord>,
        mappings: &Mappings,
        quality: Option<&str>,
    ) -> Vec<FeedEntry> {
        let plan = build_queries(media, record, mappings, &self.exclusions, quality);
        if plan.is_empty() {
            tracing::debug!(media_id = media.id, "no feed queries to run");
            return Vec::new();
        }
        fetch_plan(&plan, &self.mappings, &self.feed).await
    }
}

impl<M, A, F, R> ReleaseProvider for ToshoProvider<M, A, F, R>
where
    M: MappingService,
    A: AiringService,
    F: FeedService,
    R: ReleaseRanker,
{
    fn name(&self) -> &'static str {
        "tosho"
    }

    fn find_releases<'a>(
        &'a self,
        request: &'a ReleaseRequest,
        quality: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Vec<Release>, ToshokanError>> {
        Box::pin(self.releases(&request.media, request.episode, quality))
    }
}

/// The set of providers a request is sent to, in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ReleaseProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn ReleaseProvider>) {
        self.providers.push(provider);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ReleaseProvider> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Ask every provider concurrently and concatenate the results in
    /// registration order. A failing provider is logged and skipped.
    pub async fn find_releases(
        &self,
        request: &ReleaseRequest,
        quality: Option<&str>,
    ) -> Result<Vec<Release>, ToshokanError> {
        if self.providers.is_empty() {
            return Err(ToshokanError::Provider("no providers registered".into()));
        }

        let results = join_all(
            self.providers
                .iter()
                .map(|p| p.find_releases(request, quality)),
        )
        .await;

        let mut releases = Vec::new();
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(found) => releases.extend(found),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "provider failed");
                }
            }
        }
        Ok(releases)
    }
}
