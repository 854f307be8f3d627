use chrono::{DateTime, Utc};
use serde::Serialize;

/// One downloadable release, merged from every feed entry that shares
/// its content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Release {
    /// Content hash; unique within a result list.
    pub hash: String,
    pub title: Option<String>,
    /// Magnet URI.
    pub link: Option<String>,
    /// Nyaa id.
    pub id: Option<u64>,
    pub seeders: u64,
    pub leechers: u64,
    pub downloads: u64,
    /// Human-readable total size.
    pub size: Option<String>,
    pub date: Option<DateTime<Utc>>,
}
