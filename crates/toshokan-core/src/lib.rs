pub mod config;
pub mod cour;
pub mod dedup;
pub mod episode;
pub mod error;
pub mod format;
pub mod models;
pub mod provider;
pub mod query;
pub mod rank;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;
