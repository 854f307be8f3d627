//! Clients for the external services the release provider talks to:
//! AniList (media metadata and airing schedule), ani.zip (AniDB episode
//! mappings) and the AnimeTosho JSON feed.

pub mod anilist;
pub mod anizip;
pub mod tosho;
pub mod traits;
