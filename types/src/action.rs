use crate::ids::{CategoryId, LinkId};
use crate::model::{Category, Link};

/// A state-changing intent that must be confirmed before it is applied.
///
/// Reorders and appearance edits are not represented here; they never
/// require confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteLink {
        category_id: CategoryId,
        link_id: LinkId,
    },
    SaveLink {
        category_id: CategoryId,
        link: Link,
        is_edit: bool,
    },
    SaveCategory {
        category: Category,
        is_edit: bool,
    },
    DeleteCategory {
        category_id: CategoryId,
    },
    Reset,
}

impl PendingAction {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DeleteLink { .. } => "deleteLink",
            Self::SaveLink { .. } => "saveLink",
            Self::SaveCategory { .. } => "saveCategory",
            Self::DeleteCategory { .. } => "deleteCategory",
            Self::Reset => "reset",
        }
    }

    /// One-line description suitable for a confirmation prompt.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::DeleteLink {
                category_id,
                link_id,
            } => format!("Delete link '{link_id}' from '{category_id}'"),
            Self::SaveLink {
                category_id,
                link,
                is_edit: true,
            } => format!("Update link '{}' in '{category_id}'", link.title),
            Self::SaveLink {
                category_id,
                link,
                is_edit: false,
            } => format!("Add link '{}' to '{category_id}'", link.title),
            Self::SaveCategory {
                category,
                is_edit: true,
            } => format!("Update category '{}'", category.title),
            Self::SaveCategory {
                category,
                is_edit: false,
            } => format!("Add category '{}'", category.title),
            Self::DeleteCategory { category_id } => {
                format!("Delete category '{category_id}' and all of its links")
            }
            Self::Reset => "Reset the dashboard to its built-in defaults".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_distinguishes_create_and_edit() {
        let link = Link::new("l1", "GitHub", "https://github.com");
        let create = PendingAction::SaveLink {
            category_id: "dev".into(),
            link: link.clone(),
            is_edit: false,
        };
        let edit = PendingAction::SaveLink {
            category_id: "dev".into(),
            link,
            is_edit: true,
        };
        assert_eq!(create.describe(), "Add link 'GitHub' to 'dev'");
        assert_eq!(edit.describe(), "Update link 'GitHub' in 'dev'");
        assert_eq!(create.kind(), "saveLink");
    }

    #[test]
    fn reset_has_static_description() {
        assert_eq!(PendingAction::Reset.kind(), "reset");
        assert!(PendingAction::Reset.describe().contains("defaults"));
    }
}
