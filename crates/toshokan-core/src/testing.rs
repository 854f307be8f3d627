//! In-memory service fakes and fixture builders for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use toshokan_api::traits::{AiringService, FeedService, MappingService};

use crate::models::{
    EpisodeRecord, EpisodeTable, FeedEntry, FeedQuery, FeedTarget, FuzzyDate, Mappings, Media,
    MediaEdge, MediaFormat, MediaStatus, MediaTitle, MediaType, RelationType,
};

#[derive(Debug, thiserror::Error)]
#[error("fake service failure")]
pub struct FakeError;

#[derive(Default)]
pub struct FakeMappings {
    pub by_id: HashMap<u64, Mappings>,
    pub failing: Vec<u64>,
    pub calls: Mutex<Vec<u64>>,
}

impl FakeMappings {
    pub fn with(mut self, anilist_id: u64, mappings: Mappings) -> Self {
        self.by_id.insert(anilist_id, mappings);
        self
    }

    pub fn calls(&self) -> Vec<u64> {
        self.calls.lock().unwrap().clone()
    }
}

impl MappingService for FakeMappings {
    type Error = FakeError;

    async fn mappings(&self, anilist_id: u64) -> Result<Mappings, FakeError> {
        self.calls.lock().unwrap().push(anilist_id);
        if self.failing.contains(&anilist_id) {
            return Err(FakeError);
        }
        Ok(self.by_id.get(&anilist_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeAiring {
    pub date: Option<DateTime<Utc>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeAiring {
    pub fn at(date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AiringService for FakeAiring {
    type Error = FakeError;

    async fn airing_at(
        &self,
        _media_id: u64,
        _episode: u32,
    ) -> Result<Option<DateTime<Utc>>, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FakeError);
        }
        Ok(self.date)
    }
}

/// Feed fake answering by target. Queries whose search string contains
/// `rejected_search` (when set) come back empty.
#[derive(Default)]
pub struct FakeFeed {
    pub by_target: HashMap<FeedTarget, Vec<FeedEntry>>,
    pub failing: Vec<FeedTarget>,
    pub rejected_search: Option<String>,
    pub queries: Mutex<Vec<FeedQuery>>,
}

impl FakeFeed {
    pub fn with(mut self, target: FeedTarget, entries: Vec<FeedEntry>) -> Self {
        self.by_target.insert(target, entries);
        self
    }

    pub fn queries(&self) -> Vec<FeedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl FeedService for FakeFeed {
    type Error = FakeError;

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<FeedEntry>, FakeError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.failing.contains(&query.target) {
            return Err(FakeError);
        }
        if let Some(rejected) = &self.rejected_search {
            if query.search.contains(rejected.as_str()) {
                return Ok(Vec::new());
            }
        }
        Ok(self.by_target.get(&query.target).cloned().unwrap_or_default())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub fn anime(id: u64, romaji: &str) -> Media {
    Media {
        id,
        title: MediaTitle {
            romaji: Some(romaji.to_string()),
            english: None,
            native: None,
        },
        media_type: Some(MediaType::Anime),
        status: Some(MediaStatus::Finished),
        format: Some(MediaFormat::Tv),
        ..Default::default()
    }
}

pub fn started(mut media: Media, year: i32, month: u32, day: u32) -> Media {
    media.start_date = Some(FuzzyDate {
        year: Some(year),
        month: Some(month),
        day: Some(day),
    });
    media
}

pub fn relate(mut media: Media, relation: RelationType, node: Media) -> Media {
    media.relations.edges.push(MediaEdge {
        relation_type: Some(relation),
        node,
    });
    media
}

pub fn record(eid: u64, airdate: &str) -> EpisodeRecord {
    EpisodeRecord {
        anidb_eid: Some(eid),
        airdate: Some(airdate.to_string()),
        ..Default::default()
    }
}

pub fn mappings(
    anidb_id: Option<u64>,
    episode_count: Option<u32>,
    episodes: Vec<(u32, EpisodeRecord)>,
) -> Mappings {
    let mut m = Mappings {
        episodes: EpisodeTable::from_entries(episodes.into_iter().map(|(n, r)| (n.to_string(), r))),
        episode_count,
        ..Default::default()
    };
    m.mappings.anidb_id = anidb_id;
    m
}

pub fn entry(hash: &str, title: &str) -> FeedEntry {
    FeedEntry {
        info_hash: Some(hash.to_string()),
        title: Some(title.to_string()),
        magnet_uri: Some(format!("magnet:?xt=urn:btih:{hash}")),
        ..Default::default()
    }
}

pub fn batch(hash: &str, num_files: u32) -> FeedEntry {
    FeedEntry {
        num_files: Some(num_files),
        ..entry(hash, &format!("batch {hash}"))
    }
}
