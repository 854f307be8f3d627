pub mod client;
pub mod error;
pub mod types;

pub use client::AniZipClient;
pub use error::AniZipError;
pub use types::{EpisodeRecord, EpisodeTable, ExternalIds, Mappings};
