//! Merges feed entries that share a content hash into single releases.

use std::collections::HashMap;

use chrono::DateTime;

use crate::format::pretty_bytes;
use crate::models::{FeedEntry, Release};

/// Seeder counts at or above this are treated as feed noise.
pub const IMPLAUSIBLE_SEEDERS: u64 = 100_000;

/// Seeder count to report for an entry.
///
/// The feed occasionally reports absurd seeder figures; those are replaced
/// by a guess of three seeders per leecher.
pub fn corrected_seeders(entry: &FeedEntry) -> u64 {
    let seeders = entry.seeders.unwrap_or(0);
    if seeders >= IMPLAUSIBLE_SEEDERS {
        entry.leechers.unwrap_or(0).saturating_mul(3)
    } else {
        seeders
    }
}

/// Collapse entries into one release per content hash, in first-seen
/// order. For each field the first non-empty value across the duplicates
/// wins.
///
/// Entries without an info hash fall back to their magnet link as the
/// key; entries with neither are dropped.
pub fn dedupe(entries: Vec<FeedEntry>) -> Vec<Release> {
    let mut releases: Vec<Release> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(hash) = content_key(&entry) else {
            tracing::debug!(title = ?entry.title, "dropping feed entry without a hash");
            continue;
        };

        match index.get(&hash) {
            Some(&i) => merge(&mut releases[i], &entry),
            None => {
                index.insert(hash.clone(), releases.len());
                let mut release = Release {
                    hash,
                    ..Default::default()
                };
                merge(&mut release, &entry);
                releases.push(release);
            }
        }
    }

    releases
}

fn content_key(entry: &FeedEntry) -> Option<String> {
    entry
        .info_hash
        .as_deref()
        .filter(|hash| !hash.is_empty())
        .or_else(|| entry.magnet_uri.as_deref().filter(|uri| !uri.is_empty()))
        .map(str::to_string)
}

/// Fill every empty field of `release` from `entry`.
fn merge(release: &mut Release, entry: &FeedEntry) {
    if release.title.is_none() {
        release.title = non_empty(&entry.title).or_else(|| non_empty(&entry.torrent_name));
    }
    if release.link.is_none() {
        release.link = non_empty(&entry.magnet_uri);
    }
    if release.id.is_none() {
        release.id = entry.nyaa_id.filter(|&id| id > 0);
    }
    if release.seeders == 0 {
        release.seeders = corrected_seeders(entry);
    }
    if release.leechers == 0 {
        release.leechers = entry.leechers.unwrap_or(0);
    }
    if release.downloads == 0 {
        release.downloads = entry.torrent_downloaded_count.unwrap_or(0);
    }
    if release.size.is_none() {
        release.size = entry.total_size.filter(|&n| n > 0).map(pretty_bytes);
    }
    if release.date.is_none() {
        release.date = entry
            .timestamp
            .filter(|&ts| ts != 0)
            .and_then(|ts| DateTime::from_timestamp(ts, 0));
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}
