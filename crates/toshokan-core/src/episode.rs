//! Maps an AniList episode number onto an AniDB episode.
//!
//! When both sides agree on the episode count the number is used as-is.
//! Otherwise the AniList air date of the episode is looked up and the AniDB
//! episode that aired closest to it wins.

use chrono::{DateTime, Utc};
use toshokan_api::traits::AiringService;

use crate::models::{EpisodeRecord, EpisodeTable, Mappings, Media};

/// Find the AniDB episode for `episode` of `media`.
pub async fn match_episode<A: AiringService>(
    airing: &A,
    media: &Media,
    episode: Option<u32>,
    mappings: &Mappings,
) -> Option<EpisodeRecord> {
    let episode = episode.filter(|&n| n > 0)?;
    let table = &mappings.episodes;
    if table.is_empty() {
        return None;
    }

    let counts_agree = media
        .episodes
        .is_some_and(|count| count > 0 && Some(count) == mappings.episode_count);
    if counts_agree {
        if let Some(record) = table.get(episode) {
            return Some(record.clone());
        }
    }

    tracing::debug!(
        media_id = media.id,
        episode,
        anilist_count = ?media.episodes,
        anidb_count = ?mappings.episode_count,
        "episode counts differ, matching by air date"
    );

    let aired = match airing.airing_at(media.id, episode).await {
        Ok(aired) => aired,
        Err(e) => {
            tracing::warn!(media_id = media.id, episode, error = %e, "air date lookup failed");
            None
        }
    };

    match aired {
        Some(aired) => closest_by_air_date(table, aired).cloned(),
        None => index_fallback(table, episode).cloned(),
    }
}

/// Guess used when AniList has no air date for an episode: the entry at
/// the same index, else episode 1, else the first entry.
///
/// The requested number comes from AniList's own episode count, so a
/// missing schedule entry is a gap in upstream data rather than a bad
/// request.
pub fn index_fallback(table: &EpisodeTable, episode: u32) -> Option<&EpisodeRecord> {
    table
        .get(episode)
        .or_else(|| table.get(1))
        .or_else(|| table.first())
}

/// The entry whose air date is nearest `aired`. Ties go to the earlier
/// entry in table order; entries without a parseable date only win when
/// no entry has one.
pub fn closest_by_air_date(table: &EpisodeTable, aired: DateTime<Utc>) -> Option<&EpisodeRecord> {
    let distance = |record: &EpisodeRecord| {
        record
            .air_date()
            .map(|date| (date - aired).num_milliseconds().abs())
    };

    let mut entries = table.iter().map(|(_, record)| record);
    let first = entries.next()?;
    let mut best = (first, distance(first));

    for record in entries {
        let Some(d) = distance(record) else {
            continue;
        };
        if best.1.map_or(true, |best_d| d < best_d) {
            best = (record, Some(d));
        }
    }

    Some(best.0)
}
