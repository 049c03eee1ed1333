use crate::content::client::{fetch, ContentStore};
use crate::content::queries::SEARCH_SNAPSHOT_QUERY;
use crate::error::AppError;
use crate::search::fuzzy::{FuzzyIndex, WeightedKey};
use crate::search::models::{RankedResult, SearchableEntity};
use crate::search::normalize::{build_search_items, SearchSnapshot};

/// Queries shorter than this (in characters, after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
/// Longer queries are cut to this many characters before ranking.
pub const MAX_QUERY_CHARS: usize = 64;
pub const MAX_RESULTS: usize = 10;
/// Highest relative edit distance still counted as a match.
pub const MATCH_THRESHOLD: f64 = 0.3;

fn display_name(entity: &SearchableEntity) -> Option<&str> {
    Some(entity.display_name.as_str())
}

fn search_text(entity: &SearchableEntity) -> Option<&str> {
    Some(entity.search_text.as_str())
}

fn excerpt(entity: &SearchableEntity) -> Option<&str> {
    entity.excerpt.as_deref()
}

/// Ranking keys and their weights.
pub fn search_keys() -> [WeightedKey<SearchableEntity>; 3] {
    [
        WeightedKey { name: "displayName", weight: 0.5, get: display_name },
        WeightedKey { name: "searchText", weight: 0.3, get: search_text },
        WeightedKey { name: "excerpt", weight: 0.1, get: excerpt },
    ]
}

/// The trimmed query, cut to [`MAX_QUERY_CHARS`], if it is long enough to
/// search for.
pub fn searchable_query(query: Option<&str>) -> Option<&str> {
    let query = query?.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    let query = match query.char_indices().nth(MAX_QUERY_CHARS) {
        Some((end, _)) => query[..end].trim_end(),
        None => query,
    };
    Some(query)
}

/// Fetch the content snapshot and normalize it, in snapshot order.
pub async fn fetch_searchable_entities(
    store: &dyn ContentStore,
) -> Result<Vec<SearchableEntity>, AppError> {
    let snapshot: SearchSnapshot = fetch(store, SEARCH_SNAPSHOT_QUERY).await?;
    Ok(build_search_items(snapshot))
}

/// Rank `entities` against `query`, best first, at most [`MAX_RESULTS`].
pub fn rank(entities: &[SearchableEntity], query: &str) -> Vec<RankedResult> {
    let index = FuzzyIndex::new(entities, &search_keys(), MATCH_THRESHOLD);
    index
        .search(query, MAX_RESULTS)
        .into_iter()
        .map(|hit| RankedResult {
            entity: hit.item.clone(),
            relevance_score: hit.score,
        })
        .collect()
}

/// Full search: gate, fetch, normalize, rank.
///
/// Short or absent queries return an empty list without touching the store.
pub async fn search(
    store: &dyn ContentStore,
    query: Option<&str>,
) -> Result<Vec<RankedResult>, AppError> {
    let Some(query) = searchable_query(query) else {
        return Ok(Vec::new());
    };

    let entities = fetch_searchable_entities(store).await?;
    let results = rank(&entities, query);
    tracing::debug!(query, candidates = entities.len(), hits = results.len(), "search ranked");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::client::MockContentStore;
    use crate::search::models::EntityKind;
    use serde_json::json;

    fn entity(id: &str, name: &str, excerpt: Option<&str>) -> SearchableEntity {
        SearchableEntity {
            id: id.into(),
            kind: EntityKind::News,
            display_name: name.into(),
            slug: id.into(),
            url: EntityKind::News.url_for(id),
            category: EntityKind::News.category().into(),
            excerpt: excerpt.map(Into::into),
            image: None,
            badge_hint: None,
            search_text: name.into(),
        }
    }

    #[test]
    fn test_searchable_query_gate() {
        assert_eq!(searchable_query(None), None);
        assert_eq!(searchable_query(Some("a")), None);
        assert_eq!(searchable_query(Some("  a  ")), None);
        assert_eq!(searchable_query(Some("å")), None);
        assert_eq!(searchable_query(Some(" åä ")), Some("åä"));
    }

    #[test]
    fn test_searchable_query_is_capped() {
        let long = "ö".repeat(4_000);
        let query = searchable_query(Some(&long)).unwrap();
        assert_eq!(query.chars().count(), MAX_QUERY_CHARS);

        let exact = "a".repeat(MAX_QUERY_CHARS);
        assert_eq!(searchable_query(Some(&exact)), Some(exact.as_str()));
    }

    #[tokio::test]
    async fn test_oversized_query_still_ranks() {
        let mut store = MockContentStore::new();
        store.expect_query().times(1).returning(|_| {
            Ok(json!({
                "news": [{ "_id": "n1", "title": "Ny skola i Fisksätra", "slug": "skola" }]
            }))
        });

        let query = format!("skola{}", " x".repeat(2_000));
        let results = search(&store, Some(&query)).await.unwrap();
        assert!(results.len() <= MAX_RESULTS);
    }

    #[test]
    fn test_rank_caps_results() {
        let entities: Vec<SearchableEntity> = (0..15)
            .map(|i| entity(&format!("n{i}"), "Nacka växer", None))
            .collect();
        let results = rank(&entities, "nacka");
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].entity.id, "n0");
        assert_eq!(results[9].entity.id, "n9");
    }

    #[test]
    fn test_rank_prefers_display_name_over_excerpt() {
        let entities = vec![
            entity("n1", "Kommunens ekonomi", Some("Budgeten för nästa år")),
            entity("n2", "Budget", None),
        ];
        let results = rank(&entities, "budget");
        assert_eq!(results[0].entity.id, "n2");
        assert!(results[0].relevance_score <= results[1].relevance_score);
    }

    #[tokio::test]
    async fn test_short_query_never_queries_store() {
        let mut store = MockContentStore::new();
        store.expect_query().never();

        assert!(search(&store, Some("a")).await.unwrap().is_empty());
        assert!(search(&store, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_fetches_and_ranks() {
        let mut store = MockContentStore::new();
        store.expect_query().times(1).returning(|_| {
            Ok(json!({
                "politicians": [{ "_id": "p1", "name": "Anna Andersson", "slug": "anna" }],
                "news": [{ "_id": "n1", "title": "Ny skola i Fisksätra", "slug": "skola" }]
            }))
        });

        let results = search(&store, Some("skola")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entity.id, "n1");
        assert_eq!(results[0].entity.url, "/nyheter/skola");
    }

    #[tokio::test]
    async fn test_search_propagates_store_failure() {
        let mut store = MockContentStore::new();
        store
            .expect_query()
            .returning(|_| Err(AppError::Upstream("timeout".into())));

        let result = search(&store, Some("skola")).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
