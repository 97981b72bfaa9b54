//! Case-insensitive substring search over the loaded catalog.
//!
//! Literal containment only: no tokenization, no fuzzy matching. An
//! empty or whitespace-only query matches everything.

use crate::item::CatalogItem;

/// Returns true when the item matches the query.
///
/// The query is lower-cased and tested as a substring against the
/// title, the owner name, and every tag; any hit matches.
#[must_use]
pub fn matches_query(item: &CatalogItem, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();

    item.title.to_lowercase().contains(&query)
        || item.owner_name.to_lowercase().contains(&query)
        || item
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&query))
}

/// Narrows `items` to those matching `query`, preserving order.
#[must_use]
pub fn filter(items: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    items
        .iter()
        .filter(|item| matches_query(item, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkar_core::TattooId;

    fn item(title: &str, owner: &str, tags: &[&str]) -> CatalogItem {
        CatalogItem {
            id: TattooId::generate(),
            title: title.to_string(),
            image_ref: format!("https://img/{}.png", title.to_lowercase()),
            owner_name: owner.to_string(),
            owner_id: owner.to_lowercase(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    fn sample() -> Vec<CatalogItem> {
        vec![
            item("Anchor", "Alice", &[]),
            item("Crab", "Bob", &["ocean"]),
            item("Heart", "Alice", &["love"]),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let items = sample();
        assert_eq!(filter(&items, ""), items);
        assert_eq!(filter(&items, "   "), items);
    }

    #[test]
    fn matches_by_owner_case_insensitive() {
        let items = sample();
        let hits = filter(&items, "alice");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Anchor");
        assert_eq!(hits[1].title, "Heart");
    }

    #[test]
    fn matches_by_title_substring() {
        let items = sample();
        let hits = filter(&items, "CRA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Crab");
    }

    #[test]
    fn matches_by_tag() {
        let items = sample();
        let hits = filter(&items, "ocean");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Crab");
    }

    #[test]
    fn no_match_yields_empty() {
        let items = sample();
        assert!(filter(&items, "dragon").is_empty());
    }

    #[test]
    fn every_hit_contains_query_and_every_miss_does_not() {
        let items = sample();
        let query = "a";
        let hits = filter(&items, query);

        for item in &items {
            let contained = item.title.to_lowercase().contains(query)
                || item.owner_name.to_lowercase().contains(query)
                || item.tags.iter().any(|t| t.to_lowercase().contains(query));
            assert_eq!(hits.contains(item), contained);
        }
    }

    #[test]
    fn order_is_preserved() {
        let items = sample();
        let hits = filter(&items, "a");
        let positions: Vec<usize> = hits
            .iter()
            .map(|hit| items.iter().position(|i| i == hit).expect("hit from input"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }
}
