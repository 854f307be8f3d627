pub mod client;
pub mod error;
pub mod types;

pub use client::ToshoClient;
pub use error::ToshoError;
pub use types::{FeedEntry, FeedQuery, FeedTarget};
