//! Model transformations applied once a gated action is confirmed.
//!
//! Every function takes the current collection by reference and returns a new
//! one. Unknown ids are no-ops rather than errors: the intent that produced
//! them was built from a view of this same model.

use nebula_types::{AppState, Category, CategoryId, Link, LinkId, PendingAction};

/// Result of applying a confirmed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub state: AppState,
    /// Set for `Reset`: both storage tiers must be cleared.
    pub clears_storage: bool,
}

/// Fresh identifier for a link or category created without one.
#[must_use]
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[must_use]
pub fn apply(state: &AppState, action: &PendingAction) -> Applied {
    let categories = &state.categories;
    let next = match action {
        PendingAction::DeleteLink {
            category_id,
            link_id,
        } => delete_link(categories, category_id, link_id),
        PendingAction::SaveLink {
            category_id,
            link,
            is_edit: true,
        } => update_link(categories, category_id, link),
        PendingAction::SaveLink {
            category_id,
            link,
            is_edit: false,
        } => append_link(categories, category_id, link),
        PendingAction::SaveCategory {
            category,
            is_edit: true,
        } => update_category(categories, category),
        PendingAction::SaveCategory {
            category,
            is_edit: false,
        } => append_category(categories, category),
        PendingAction::DeleteCategory { category_id } => delete_category(categories, category_id),
        PendingAction::Reset => {
            return Applied {
                state: AppState::default(),
                clears_storage: true,
            };
        }
    };

    Applied {
        state: state.with_categories(next),
        clears_storage: false,
    }
}

fn map_category(
    categories: &[Category],
    category_id: &CategoryId,
    f: impl FnOnce(&Category) -> Category,
) -> Vec<Category> {
    let mut f = Some(f);
    categories
        .iter()
        .map(|category| match f.take_if(|_| &category.id == category_id) {
            Some(f) => f(category),
            None => category.clone(),
        })
        .collect()
}

#[must_use]
pub fn delete_link(categories: &[Category], category_id: &CategoryId, link_id: &LinkId) -> Vec<Category> {
    map_category(categories, category_id, |category| Category {
        links: category
            .links
            .iter()
            .filter(|link| &link.id != link_id)
            .cloned()
            .collect(),
        ..category.clone()
    })
}

/// Append to the end of the category, minting an id when the supplied one is
/// blank or already taken in that category.
#[must_use]
pub fn append_link(categories: &[Category], category_id: &CategoryId, link: &Link) -> Vec<Category> {
    map_category(categories, category_id, |category| {
        let mut link = link.clone();
        if link.id.is_blank() || category.link(&link.id).is_some() {
            link.id = LinkId::new(fresh_id());
        }
        let mut next = category.clone();
        next.links.push(link);
        next
    })
}

/// Replace the link with the same id in place, keeping its position.
#[must_use]
pub fn update_link(categories: &[Category], category_id: &CategoryId, link: &Link) -> Vec<Category> {
    map_category(categories, category_id, |category| Category {
        links: category
            .links
            .iter()
            .map(|existing| {
                if existing.id == link.id {
                    link.clone()
                } else {
                    existing.clone()
                }
            })
            .collect(),
        ..category.clone()
    })
}

/// Append a new, empty category.
#[must_use]
pub fn append_category(categories: &[Category], category: &Category) -> Vec<Category> {
    let taken = categories.iter().any(|existing| existing.id == category.id);
    let id = if category.id.is_blank() || taken {
        CategoryId::new(fresh_id())
    } else {
        category.id.clone()
    };

    let mut next = categories.to_vec();
    next.push(Category {
        id,
        title: category.title.clone(),
        icon: category.icon.clone(),
        links: Vec::new(),
    });
    next
}

/// Replace title and icon only. Links are never touched by a category edit.
#[must_use]
pub fn update_category(categories: &[Category], category: &Category) -> Vec<Category> {
    map_category(categories, &category.id, |existing| Category {
        title: category.title.clone(),
        icon: category.icon.clone(),
        ..existing.clone()
    })
}

#[must_use]
pub fn delete_category(categories: &[Category], category_id: &CategoryId) -> Vec<Category> {
    categories
        .iter()
        .filter(|category| &category.id != category_id)
        .cloned()
        .collect()
}
