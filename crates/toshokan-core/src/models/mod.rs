mod release;

pub use release::Release;
pub use toshokan_api::anilist::types::{
    FuzzyDate, Media, MediaConnection, MediaEdge, MediaFormat, MediaSeason, MediaStatus,
    MediaTitle, MediaType, RelationType,
};
pub use toshokan_api::anizip::types::{EpisodeRecord, EpisodeTable, Mappings};
pub use toshokan_api::tosho::types::{FeedEntry, FeedQuery, FeedTarget};
