use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Mappings response for a single AniList media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mappings {
    #[serde(default)]
    pub episodes: EpisodeTable,
    #[serde(rename = "episodeCount", default)]
    pub episode_count: Option<u32>,
    #[serde(default)]
    pub mappings: ExternalIds,
}

impl Mappings {
    pub fn anidb_id(&self) -> Option<u64> {
        self.mappings.anidb_id
    }
}

/// Ids of the same media on other databases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    pub anidb_id: Option<u64>,
}

/// One AniDB episode as reported by the mapping service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EpisodeRecord {
    #[serde(rename = "anidbEid")]
    pub anidb_eid: Option<u64>,
    pub airdate: Option<String>,
    #[serde(rename = "airDateUtc")]
    pub air_date_utc: Option<String>,
}

impl EpisodeRecord {
    /// Parsed air date. Accepts `YYYY-MM-DD` (midnight UTC) or RFC 3339.
    pub fn air_date(&self) -> Option<DateTime<Utc>> {
        self.airdate
            .as_deref()
            .and_then(parse_air_date)
            .or_else(|| self.air_date_utc.as_deref().and_then(parse_air_date))
    }
}

fn parse_air_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// The episode table of a mapping, keyed by episode string (`"1"`, `"S1"`).
///
/// Iteration order is numeric keys ascending, then the remaining keys
/// in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeTable {
    entries: Vec<(String, EpisodeRecord)>,
}

impl EpisodeTable {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, EpisodeRecord)>) -> Self {
        let mut entries: Vec<(String, EpisodeRecord)> = entries.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| match (a.parse::<u32>(), b.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        });
        Self { entries }
    }

    /// Entry for a regular episode number.
    pub fn get(&self, episode: u32) -> Option<&EpisodeRecord> {
        let key = episode.to_string();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, record)| record)
    }

    pub fn first(&self) -> Option<&EpisodeRecord> {
        self.entries.first().map(|(_, record)| record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EpisodeRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for EpisodeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<HashMap<String, EpisodeRecord>> = Option::deserialize(deserializer)?;
        Ok(Self::from_entries(raw.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mappings() {
        let json = r#"{
            "titles": { "x-jat": "Sousou no Frieren" },
            "episodes": {
                "10": { "episode": "10", "anidbEid": 280010, "airdate": "2023-12-01" },
                "2": { "episode": "2", "anidbEid": 280002, "airdate": "2023-09-29" },
                "S1": { "episode": "S1", "anidbEid": 289001 },
                "1": { "episode": "1", "anidbEid": 280001, "airdate": "2023-09-29" }
            },
            "episodeCount": 28,
            "specialCount": 1,
            "mappings": { "anidb_id": 17617, "anilist_id": 154587, "mal_id": 52991 }
        }"#;

        let mappings: Mappings = serde_json::from_str(json).unwrap();
        assert_eq!(mappings.anidb_id(), Some(17617));
        assert_eq!(mappings.episode_count, Some(28));
        assert_eq!(mappings.episodes.len(), 4);

        let keys: Vec<&str> = mappings.episodes.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["1", "2", "10", "S1"]);

        assert_eq!(mappings.episodes.get(2).unwrap().anidb_eid, Some(280002));
        assert!(mappings.episodes.get(3).is_none());
    }

    #[test]
    fn test_deserialize_without_anidb() {
        let json = r#"{ "episodes": null, "mappings": { "anilist_id": 1 } }"#;
        let mappings: Mappings = serde_json::from_str(json).unwrap();
        assert!(mappings.anidb_id().is_none());
        assert!(mappings.episodes.is_empty());
        assert!(mappings.episode_count.is_none());
    }

    #[test]
    fn test_unread_ids_do_not_break_parsing() {
        let json = r#"{
            "episodes": { "1": { "episode": 1, "anidbEid": 280001 } },
            "mappings": { "anidb_id": 17617, "mal_id": "52991", "kitsu_id": null }
        }"#;
        let mappings: Mappings = serde_json::from_str(json).unwrap();
        assert_eq!(mappings.anidb_id(), Some(17617));
        assert_eq!(mappings.episodes.get(1).unwrap().anidb_eid, Some(280001));
    }

    #[test]
    fn test_air_date_formats() {
        let plain = EpisodeRecord {
            airdate: Some("2023-09-29".into()),
            ..Default::default()
        };
        assert_eq!(
            plain.air_date().unwrap().to_rfc3339(),
            "2023-09-29T00:00:00+00:00"
        );

        let utc = EpisodeRecord {
            airdate: Some("not a date".into()),
            air_date_utc: Some("2023-09-29T14:00:00Z".into()),
            ..Default::default()
        };
        assert_eq!(utc.air_date().unwrap().to_rfc3339(), "2023-09-29T14:00:00+00:00");

        assert!(EpisodeRecord::default().air_date().is_none());
    }
}
