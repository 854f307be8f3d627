//! Ordering of merged releases before they reach the caller.

use crate::models::Release;

/// Orders a provider's releases. Implementations must keep every release.
pub trait ReleaseRanker: Send + Sync {
    fn rank(&self, releases: Vec<Release>) -> Vec<Release>;
}

/// Best-seeded first; releases with equal seeders keep their feed order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeederRanker;

impl ReleaseRanker for SeederRanker {
    fn rank(&self, mut releases: Vec<Release>) -> Vec<Release> {
        releases.sort_by(|a, b| b.seeders.cmp(&a.seeders));
        releases
    }
}
