use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<Media>,
}

#[derive(Debug, Deserialize)]
pub struct AiringScheduleResponse {
    #[serde(rename = "AiringSchedule")]
    pub airing_schedule: Option<AiringSchedule>,
}

#[derive(Debug, Deserialize)]
pub struct AiringSchedule {
    #[serde(rename = "airingAt")]
    pub airing_at: Option<i64>,
}

// ── Media ────────────────────────────────────────────────────────

/// An AniList media record, including its typed relations.
///
/// Relation nodes are `Media` values too; their own `relations` are
/// normally not requested and stay empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: u64,
    #[serde(default)]
    pub title: MediaTitle,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub episodes: Option<u32>,
    /// Episode length in minutes.
    pub duration: Option<u32>,
    pub status: Option<MediaStatus>,
    pub format: Option<MediaFormat>,
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub season: Option<MediaSeason>,
    pub season_year: Option<i32>,
    pub start_date: Option<FuzzyDate>,
    #[serde(default)]
    pub relations: MediaConnection,
}

impl Media {
    /// Every title variant followed by the synonyms.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles = Vec::new();
        if let Some(r) = &self.title.romaji {
            titles.push(r.as_str());
        }
        if let Some(e) = &self.title.english {
            titles.push(e.as_str());
        }
        if let Some(n) = &self.title.native {
            titles.push(n.as_str());
        }
        for s in &self.synonyms {
            titles.push(s.as_str());
        }
        titles
    }

    /// Best display title.
    pub fn preferred_title(&self) -> &str {
        self.title
            .english
            .as_deref()
            .or(self.title.romaji.as_deref())
            .or(self.title.native.as_deref())
            .unwrap_or("")
    }

    pub fn is_anime(&self) -> bool {
        self.media_type == Some(MediaType::Anime)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaConnection {
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEdge {
    pub relation_type: Option<RelationType>,
    pub node: Media,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    /// Calendar date, with a missing month or day defaulting to 1.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = self.year?;
        NaiveDate::from_ymd_opt(year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    Manga,
    Novel,
    OneShot,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Anime,
    Manga,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaSeason {
    Winter,
    Spring,
    Summer,
    Fall,
    #[serde(other)]
    Other,
}

impl MediaSeason {
    /// Month a season is taken to start in when a media has no explicit
    /// start date.
    pub fn start_month(self) -> Option<u32> {
        match self {
            Self::Winter => Some(1),
            Self::Spring => Some(4),
            Self::Summer => Some(8),
            Self::Fall => Some(12),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Adaptation,
    Prequel,
    Sequel,
    Parent,
    SideStory,
    Character,
    Summary,
    Alternative,
    SpinOff,
    Source,
    Compilation,
    Contains,
    #[serde(other)]
    Other,
}
