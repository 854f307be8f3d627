//! Feed query planning and execution.
//!
//! A plan holds up to three independent branches: the single episode, the
//! series batch, and the batch of a companion cour. The companion branch
//! first needs its own AniDB id, so it runs as a two-step chain. All
//! branches run concurrently and a failing branch contributes nothing.

use toshokan_api::traits::{FeedService, MappingService};

use crate::cour;
use crate::models::{
    EpisodeRecord, FeedEntry, FeedQuery, FeedTarget, Mappings, Media, MediaFormat, MediaStatus,
};

/// Episode length (minutes) above which a single-episode media counts as a movie.
const MOVIE_MIN_DURATION: u32 = 80;

/// A series query whose results must carry at least `min_files` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    pub query: FeedQuery,
    pub min_files: u32,
}

/// A batch query for a companion cour whose AniDB id is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionBatch {
    pub media_id: u64,
    /// Episodes of both cours combined.
    pub min_files: u32,
    pub search: String,
}

/// The feed fetches for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub episode: Option<FeedQuery>,
    pub batch: Option<BatchQuery>,
    pub companion: Option<CompanionBatch>,
}

impl QueryPlan {
    pub fn is_empty(&self) -> bool {
        self.episode.is_none() && self.batch.is_none() && self.companion.is_none()
    }
}

pub fn is_movie(media: &Media) -> bool {
    if media.format == Some(MediaFormat::Movie) {
        return true;
    }
    if media
        .titles()
        .iter()
        .any(|title| title.to_lowercase().contains("movie"))
    {
        return true;
    }
    media.duration.is_some_and(|d| d > MOVIE_MIN_DURATION) && media.episodes == Some(1)
}

/// Freeform feed search: a negated group of excluded keywords, followed
/// by the quality text when one is given.
pub fn search_string(exclusions: &[String], quality: Option<&str>) -> String {
    let mut parts = Vec::new();
    if !exclusions.is_empty() {
        parts.push(format!(r#"!("{}")"#, exclusions.join(r#""|""#)));
    }
    if let Some(quality) = quality.map(str::trim).filter(|q| !q.is_empty()) {
        parts.push(format!(r#""'{quality}""#));
    }
    parts.join(" ")
}

/// Plan the feed queries for a media.
///
/// The episode query runs whenever an AniDB episode was matched. Batches
/// are only looked for once a series has finished, and only for movies or
/// series that are not a lone episode.
pub fn build_queries(
    media: &Media,
    episode: Option<&EpisodeRecord>,
    mappings: &Mappings,
    exclusions: &[String],
    quality: Option<&str>,
) -> QueryPlan {
    let search = search_string(exclusions, quality);
    let mut plan = QueryPlan::default();

    if let Some(episode) = episode {
        match episode.anidb_eid {
            Some(eid) => {
                plan.episode = Some(FeedQuery {
                    target: FeedTarget::Episode(eid),
                    search: search.clone(),
                });
            }
            None => tracing::debug!(media_id = media.id, "matched episode has no AniDB id"),
        }
    }

    let Some(aid) = mappings.anidb_id() else {
        return plan;
    };
    let movie = is_movie(media);
    if media.status != Some(MediaStatus::Finished) || !(movie || media.episodes != Some(1)) {
        return plan;
    }

    let episode_count = media.episodes.unwrap_or(0);
    plan.batch = Some(BatchQuery {
        query: FeedQuery {
            target: FeedTarget::Series(aid),
            search: search.clone(),
        },
        min_files: episode_count,
    });

    if !movie {
        if let Some(companion) = cour::find_companion_cour(media) {
            tracing::info!(
                media_id = media.id,
                companion_id = companion.id,
                "found split cour"
            );
            plan.companion = Some(CompanionBatch {
                media_id: companion.id,
                min_files: episode_count + companion.episodes.unwrap_or(0),
                search,
            });
        }
    }

    plan
}

/// Keep only entries with at least `min_files` files.
///
/// The count comes from AniList, which may or may not include an episode 0
/// that AniDB lists separately, so a batch with exactly that many files is
/// accepted.
pub fn filter_batches(entries: Vec<FeedEntry>, min_files: u32) -> Vec<FeedEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.num_files.unwrap_or(0) >= min_files)
        .collect()
}

/// Run every branch of `plan` concurrently and concatenate the results in
/// episode, batch, companion order.
pub async fn fetch_plan<M: MappingService, F: FeedService>(
    plan: &QueryPlan,
    mappings: &M,
    feed: &F,
) -> Vec<FeedEntry> {
    let episode = async {
        match &plan.episode {
            Some(query) => fetch_branch(feed, query, "episode").await,
            None => Vec::new(),
        }
    };
    let batch = async {
        match &plan.batch {
            Some(batch) => fetch_batch(feed, batch, "batch").await,
            None => Vec::new(),
        }
    };
    let companion = async {
        match &plan.companion {
            Some(companion) => fetch_companion(mappings, feed, companion).await,
            None => Vec::new(),
        }
    };

    let (episode, batch, companion) = futures::join!(episode, batch, companion);
    episode.into_iter().chain(batch).chain(companion).collect()
}

async fn fetch_branch<F: FeedService>(feed: &F, query: &FeedQuery, branch: &str) -> Vec<FeedEntry> {
    match feed.fetch(query).await {
        Ok(entries) => {
            tracing::info!(branch, count = entries.len(), "feed branch fetched");
            entries
        }
        Err(e) => {
            tracing::warn!(branch, feed_target = ?query.target, error = %e, "feed branch failed");
            Vec::new()
        }
    }
}

async fn fetch_batch<F: FeedService>(feed: &F, batch: &BatchQuery, branch: &str) -> Vec<FeedEntry> {
    let entries = fetch_branch(feed, &batch.query, branch).await;
    filter_batches(entries, batch.min_files)
}

async fn fetch_companion<M: MappingService, F: FeedService>(
    mappings: &M,
    feed: &F,
    companion: &CompanionBatch,
) -> Vec<FeedEntry> {
    let aid = match mappings.mappings(companion.media_id).await {
        Ok(found) => found.anidb_id(),
        Err(e) => {
            tracing::warn!(
                media_id = companion.media_id,
                error = %e,
                "split cour mapping lookup failed"
            );
            None
        }
    };
    tracing::debug!(
        media_id = companion.media_id,
        found = aid.is_some(),
        "split cour mapping"
    );

    let Some(aid) = aid else {
        return Vec::new();
    };
    let batch = BatchQuery {
        query: FeedQuery {
            target: FeedTarget::Series(aid),
            search: companion.search.clone(),
        },
        min_files: companion.min_files,
    };
    fetch_batch(feed, &batch, "companion").await
}
