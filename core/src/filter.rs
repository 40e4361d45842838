//! Live text filter over the category collection.

use nebula_types::Category;

/// Categories whose links match `query`, with non-matching links dropped.
///
/// Matching is a case-insensitive substring test on the link title or
/// description. An empty query returns everything, including empty
/// categories; otherwise categories left with no links are hidden.
#[must_use]
pub fn filter_categories(categories: &[Category], query: &str) -> Vec<Category> {
    if query.is_empty() {
        return categories.to_vec();
    }
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    categories
        .iter()
        .filter_map(|category| {
            let links: Vec<_> = category
                .links
                .iter()
                .filter(|link| {
                    matches(&link.title) || link.description.as_deref().is_some_and(matches)
                })
                .cloned()
                .collect();
            (!links.is_empty()).then(|| Category {
                links,
                ..category.clone()
            })
        })
        .collect()
}

/// Reordering is only offered on the unfiltered view.
#[must_use]
pub fn is_drag_enabled(query: &str) -> bool {
    query.is_empty()
}
