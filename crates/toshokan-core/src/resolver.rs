//! AniDB mapping resolution for a media, with a fallback through related
//! anime for specials that have no mapping of their own.

use toshokan_api::traits::MappingService;

use crate::error::ToshokanError;
use crate::models::{Mappings, Media, MediaFormat, RelationType};

/// Relation kinds tried, in order, when a special has no AniDB id.
const FALLBACK_RELATIONS: [RelationType; 3] = [
    RelationType::Parent,
    RelationType::Prequel,
    RelationType::Sequel,
];

/// Fetch the mappings for `media`.
///
/// Returns `Ok(None)` when no AniDB id can be found, even through the
/// related-anime fallback. That is a normal "no data" outcome.
pub async fn resolve<M: MappingService>(
    service: &M,
    media: &Media,
) -> Result<Option<Mappings>, ToshokanError> {
    tracing::debug!(media_id = media.id, "resolving AniDB mapping");
    let mappings = fetch(service, media.id).await?;
    if mappings.anidb_id().is_some() {
        return Ok(Some(mappings));
    }

    tracing::debug!(media_id = media.id, "no AniDB id, checking related anime");
    let Some(related_id) = special_parent(media) else {
        return Ok(None);
    };

    let related = fetch(service, related_id).await?;
    if related.anidb_id().is_some() {
        tracing::debug!(media_id = media.id, related_id, "resolved via related anime");
        Ok(Some(related))
    } else {
        Ok(None)
    }
}

async fn fetch<M: MappingService>(
    service: &M,
    anilist_id: u64,
) -> Result<Mappings, ToshokanError> {
    service
        .mappings(anilist_id)
        .await
        .map_err(|e| ToshokanError::Mapping(format!("anilist id {anilist_id}: {e}")))
}

/// The anime a special, OVA or ONA hangs off: the first parent, else the
/// first prequel, else the first sequel.
pub fn special_parent(media: &Media) -> Option<u64> {
    if !matches!(
        media.format,
        Some(MediaFormat::Special | MediaFormat::Ova | MediaFormat::Ona)
    ) {
        return None;
    }

    FALLBACK_RELATIONS.iter().find_map(|relation| {
        media
            .relations
            .edges
            .iter()
            .filter(|edge| edge.node.is_anime())
            .find(|edge| edge.relation_type == Some(*relation))
            .map(|edge| edge.node.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use crate::testing::{anime, mappings, relate, FakeMappings};

    fn special(id: u64) -> Media {
        let mut media = anime(id, "Special");
        media.format = Some(MediaFormat::Special);
        media
    }

    #[tokio::test]
    async fn test_direct_mapping() {
        let service = FakeMappings::default().with(1, mappings(Some(100), None, vec![]));
        let resolved = resolve(&service, &anime(1, "Show")).await.unwrap().unwrap();
        assert_eq!(resolved.anidb_id(), Some(100));
        assert_eq!(service.calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_special_falls_back_to_parent() {
        let media = relate(
            relate(special(2), RelationType::Sequel, anime(30, "Sequel")),
            RelationType::Parent,
            anime(10, "Parent"),
        );
        let service = FakeMappings::default()
            .with(10, mappings(Some(1000), None, vec![]))
            .with(30, mappings(Some(3000), None, vec![]));

        let resolved = resolve(&service, &media).await.unwrap().unwrap();
        assert_eq!(resolved.anidb_id(), Some(1000));
        assert_eq!(service.calls(), vec![2, 10]);
    }

    #[tokio::test]
    async fn test_tv_does_not_fall_back() {
        let media = relate(anime(2, "Show"), RelationType::Parent, anime(10, "Parent"));
        let service = FakeMappings::default().with(10, mappings(Some(1000), None, vec![]));

        assert!(resolve(&service, &media).await.unwrap().is_none());
        assert_eq!(service.calls(), vec![2]);
    }

    #[tokio::test]
    async fn test_related_without_anidb_is_none() {
        let media = relate(special(2), RelationType::Prequel, anime(10, "Prequel"));
        let service = FakeMappings::default();
        assert!(resolve(&service, &media).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let service = FakeMappings {
            failing: vec![1],
            ..Default::default()
        };
        let result = resolve(&service, &anime(1, "Show")).await;
        assert!(matches!(result, Err(ToshokanError::Mapping(_))));
    }

    #[test]
    fn test_special_parent_priority() {
        let media = relate(
            relate(special(2), RelationType::Sequel, anime(30, "Sequel")),
            RelationType::Prequel,
            anime(20, "Prequel"),
        );
        assert_eq!(special_parent(&media), Some(20));
    }

    #[test]
    fn test_special_parent_skips_manga() {
        let mut manga = anime(40, "Source");
        manga.media_type = Some(MediaType::Manga);
        let media = relate(
            relate(special(2), RelationType::Parent, manga),
            RelationType::Sequel,
            anime(30, "Sequel"),
        );
        assert_eq!(special_parent(&media), Some(30));
    }

    #[test]
    fn test_special_parent_ova_and_ona() {
        let mut ova = relate(anime(2, "OVA"), RelationType::Parent, anime(10, "Parent"));
        ova.format = Some(MediaFormat::Ova);
        assert_eq!(special_parent(&ova), Some(10));

        ova.format = Some(MediaFormat::Ona);
        assert_eq!(special_parent(&ova), Some(10));

        ova.format = Some(MediaFormat::Movie);
        assert_eq!(special_parent(&ova), None);
    }
}
