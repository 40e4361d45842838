//! Drag reorder of links within one category.
//!
//! Reorders are not gated. Invalid input (unknown category, indices out of
//! range, a drop onto another category) leaves the model untouched and
//! returns `None` so the caller knows not to schedule a save.

use nebula_types::{Category, CategoryId, LinkId};

/// A resolved drag: where the link came from and where it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragMove {
    pub source_category: CategoryId,
    pub target_category: CategoryId,
    pub old_index: usize,
    pub new_index: usize,
}

impl DragMove {
    #[must_use]
    pub fn within(category: impl Into<CategoryId>, old_index: usize, new_index: usize) -> Self {
        let category = category.into();
        Self {
            source_category: category.clone(),
            target_category: category,
            old_index,
            new_index,
        }
    }

    /// Resolve a drop of `active` onto `over` into indices.
    ///
    /// Returns `None` when the link was dropped on itself or either id cannot
    /// be found in its category.
    #[must_use]
    pub fn from_link_ids(
        categories: &[Category],
        active: (&CategoryId, &LinkId),
        over: (&CategoryId, &LinkId),
    ) -> Option<Self> {
        let (source_category, active_link) = active;
        let (target_category, over_link) = over;
        if active_link == over_link && source_category == target_category {
            return None;
        }

        let index_of = |category_id: &CategoryId, link_id: &LinkId| {
            categories
                .iter()
                .find(|category| &category.id == category_id)?
                .link_index(link_id)
        };

        Some(Self {
            source_category: source_category.clone(),
            target_category: target_category.clone(),
            old_index: index_of(source_category, active_link)?,
            new_index: index_of(target_category, over_link)?,
        })
    }
}

/// Apply a drag. Cross-category drops are rejected.
#[must_use]
pub fn apply_drag(categories: &[Category], drag: &DragMove) -> Option<Vec<Category>> {
    if drag.source_category != drag.target_category {
        tracing::debug!(
            source = %drag.source_category,
            target = %drag.target_category,
            "Ignoring cross-category drag"
        );
        return None;
    }
    reorder(categories, &drag.source_category, drag.old_index, drag.new_index)
}

/// Move the link at `old_index` to `new_index`, shifting the links between.
#[must_use]
pub fn reorder(
    categories: &[Category],
    category_id: &CategoryId,
    old_index: usize,
    new_index: usize,
) -> Option<Vec<Category>> {
    let position = categories
        .iter()
        .position(|category| &category.id == category_id)?;
    let len = categories[position].links.len();
    if old_index >= len || new_index >= len || old_index == new_index {
        return None;
    }

    let mut next = categories.to_vec();
    let links = &mut next[position].links;
    let moved = links.remove(old_index);
    links.insert(new_index, moved);
    Some(next)
}
