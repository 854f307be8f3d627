use serde::Deserialize;

/// A torrent record from the AnimeTosho JSON feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub torrent_name: Option<String>,
    pub info_hash: Option<String>,
    pub magnet_uri: Option<String>,
    pub nyaa_id: Option<u64>,
    pub seeders: Option<u64>,
    pub leechers: Option<u64>,
    pub torrent_downloaded_count: Option<u64>,
    pub total_size: Option<u64>,
    pub num_files: Option<u32>,
    /// Unix seconds.
    pub timestamp: Option<i64>,
}

/// Which AniDB id a feed query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedTarget {
    /// A single episode (`eid`).
    Episode(u64),
    /// A whole series (`aid`), ordered by size descending.
    Series(u64),
}

/// A single feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub target: FeedTarget,
    /// Freeform search string (exclusions and quality), may be empty.
    pub search: String,
}

impl FeedQuery {
    /// Query-string pairs for this request.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = match self.target {
            FeedTarget::Episode(eid) => vec![("eid", eid.to_string())],
            FeedTarget::Series(aid) => {
                vec![("order", "size-d".to_string()), ("aid", aid.to_string())]
            }
        };
        if !self.search.is_empty() {
            params.push(("qx", "1".to_string()));
            params.push(("q", self.search.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_entry() {
        let json = r#"{
            "id": 601234,
            "title": "[SubsPlease] Sousou no Frieren - 01 (1080p) [F02D8D5E].mkv",
            "link": "https://animetosho.org/view/subsplease-sousou-no-frieren-01.n1234",
            "timestamp": 1695963000,
            "status": "complete",
            "nyaa_id": 1719000,
            "info_hash": "0f5a4d0c9d7e2b1a3c4b5a6d7e8f9a0b1c2d3e4f",
            "magnet_uri": "magnet:?xt=urn:btih:0f5a4d0c9d7e2b1a3c4b5a6d7e8f9a0b1c2d3e4f",
            "seeders": 812,
            "leechers": 14,
            "torrent_downloaded_count": 25000,
            "total_size": 1450000000,
            "num_files": 1,
            "anidb_aid": 17617,
            "anidb_eid": 280001,
            "anidb_fid": null
        }"#;

        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.nyaa_id, Some(1719000));
        assert_eq!(entry.seeders, Some(812));
        assert_eq!(entry.num_files, Some(1));
        assert!(entry.torrent_name.is_none());
    }

    #[test]
    fn test_unread_fields_do_not_break_parsing() {
        let json = r#"{
            "id": "601234",
            "info_hash": "abc",
            "anidb_aid": "17617",
            "anidb_eid": [280001]
        }"#;

        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.info_hash.as_deref(), Some("abc"));
    }

    #[test]
    fn test_episode_params() {
        let query = FeedQuery {
            target: FeedTarget::Episode(280001),
            search: String::new(),
        };
        assert_eq!(query.params(), vec![("eid", "280001".to_string())]);
    }

    #[test]
    fn test_series_params_with_search() {
        let query = FeedQuery {
            target: FeedTarget::Series(17617),
            search: r#"!("DTS") "'1080""#.into(),
        };
        let params = query.params();
        assert_eq!(params[0], ("order", "size-d".to_string()));
        assert_eq!(params[1], ("aid", "17617".to_string()));
        assert_eq!(params[2], ("qx", "1".to_string()));
        assert_eq!(params[3].1, r#"!("DTS") "'1080""#);
    }
}
