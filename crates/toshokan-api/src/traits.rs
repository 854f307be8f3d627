//! Trait definitions for the services behind the release provider.
//!
//! The HTTP clients in this crate implement these traits, which lets the
//! resolution pipeline in `toshokan-core` stay service-agnostic and be
//! exercised against in-memory fakes.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::anizip::types::Mappings;
use crate::tosho::types::{FeedEntry, FeedQuery};

/// Looks up external database ids and the AniDB episode table for a media.
pub trait MappingService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch mappings by AniList media id.
    fn mappings(
        &self,
        anilist_id: u64,
    ) -> impl Future<Output = Result<Mappings, Self::Error>> + Send;
}

/// Looks up when an episode aired on the media-tracking site.
pub trait AiringService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Airing time of `episode`, or `None` when the schedule has no usable entry.
    fn airing_at(
        &self,
        media_id: u64,
        episode: u32,
    ) -> impl Future<Output = Result<Option<DateTime<Utc>>, Self::Error>> + Send;
}

/// Queries the torrent feed.
pub trait FeedService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(
        &self,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<Vec<FeedEntry>, Self::Error>> + Send;
}
