//! Split-cour detection.
//!
//! Some series air in two blocks that AniList tracks as separate media
//! ("Part 2", "2nd Cour") while AniDB keeps them under one id. Batches for
//! such a series cover the episodes of both blocks, so the companion media
//! has to be found to know how many files a complete batch carries.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{Media, MediaFormat, MediaStatus, RelationType};

static RE_LATER_COUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[2-9](?:nd|rd|th) Cour|Cour [2-9]|Part [2-9]").unwrap());

/// Whether a title labels itself as a later cour ("2nd Cour", "Part 3").
pub fn is_split_cour_title(title: &str) -> bool {
    RE_LATER_COUR.is_match(title)
}

/// Whether any title or synonym of `media` labels it as a later cour.
pub fn has_split_cour_title(media: &Media) -> bool {
    media.titles().into_iter().any(is_split_cour_title)
}

/// Start date of a media: the explicit start date, else the first day of
/// its season's start month.
pub fn start_date(media: &Media) -> Option<NaiveDate> {
    if let Some(date) = media.start_date.as_ref().and_then(|d| d.to_date()) {
        return Some(date);
    }
    let year = media.season_year?;
    let month = media.season?.start_month()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Find the other cour of a split-cour series.
///
/// A media titled as a later cour looks for its closest finished prequel.
/// Any other media looks for the closest finished sequel that is itself
/// titled as a later cour. Returns `None` when there is no companion.
pub fn find_companion_cour(media: &Media) -> Option<&Media> {
    if has_split_cour_title(media) {
        let prequel = cour_prequel(media);
        if prequel.is_none() {
            tracing::error!(
                media_id = media.id,
                title = media.preferred_title(),
                "split cour title but no prequel cour found"
            );
        }
        prequel
    } else {
        cour_sequel(media)
    }
}

fn cour_prequel(media: &Media) -> Option<&Media> {
    let media_date = start_date(media);
    let candidates = cour_candidates(media, RelationType::Prequel)
        .filter(|node| !is_after(start_date(node), media_date));

    closest(candidates, |node| days_between(start_date(node), media_date))
}

fn cour_sequel(media: &Media) -> Option<&Media> {
    let media_date = start_date(media);
    let candidates = cour_candidates(media, RelationType::Sequel)
        .filter(|node| !is_after(media_date, start_date(node)))
        .filter(|node| has_split_cour_title(node));

    closest(candidates, |node| days_between(media_date, start_date(node)))
}

/// Finished TV or OVA anime related to `media` by `relation`.
fn cour_candidates(media: &Media, relation: RelationType) -> impl Iterator<Item = &Media> {
    media
        .relations
        .edges
        .iter()
        .filter(move |edge| edge.relation_type == Some(relation))
        .map(|edge| &edge.node)
        .filter(|node| node.is_anime())
        .filter(|node| node.status == Some(MediaStatus::Finished))
        .filter(|node| matches!(node.format, Some(MediaFormat::Tv | MediaFormat::Ova)))
}

/// `a` is strictly later than `b`. Unknown dates never compare as later.
fn is_after(a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn days_between(earlier: Option<NaiveDate>, later: Option<NaiveDate>) -> Option<i64> {
    Some((later? - earlier?).num_days())
}

/// The candidate with the smallest known distance; the first candidate
/// wins ties and is kept when no distance is known.
fn closest<'a>(
    candidates: impl Iterator<Item = &'a Media>,
    distance: impl Fn(&Media) -> Option<i64>,
) -> Option<&'a Media> {
    let mut best: Option<(&Media, Option<i64>)> = None;
    for node in candidates {
        let d = distance(node);
        best = match best {
            None => Some((node, d)),
            Some((_, best_d)) if d.is_some() && best_d.map_or(true, |b| d < Some(b)) => {
                Some((node, d))
            }
            keep => keep,
        };
    }
    best.map(|(node, _)| node)
}
