//! Persisted dashboard document: categories, links and appearance settings.
//!
//! Everything here is plain data. Mutations elsewhere build a new value from
//! an old one instead of editing shared state in place.

use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, LinkId};

/// Logo text shown when nothing else has been configured.
pub const DEFAULT_LOGO_TEXT: &str = "科技刘导航站";

fn default_logo_text() -> String {
    DEFAULT_LOGO_TEXT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Image URL or symbolic icon name; absent means "derive a favicon".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Link {
    #[must_use]
    pub fn new(id: impl Into<LinkId>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            icon: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Display and drag order. Never re-sorted implicitly.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Category {
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    #[must_use]
    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.iter().find(|link| &link.id == id)
    }

    #[must_use]
    pub fn link_index(&self, id: &LinkId) -> Option<usize> {
        self.links.iter().position(|link| &link.id == id)
    }
}

/// The unit of persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default = "default_logo_text")]
    pub logo_text: String,
    #[serde(default)]
    pub logo_image: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            categories: crate::defaults::default_categories(),
            background_image: None,
            logo_text: default_logo_text(),
            logo_image: None,
        }
    }
}

impl AppState {
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// Structural copy with the category collection swapped out.
    #[must_use]
    pub fn with_categories(&self, categories: Vec<Category>) -> Self {
        Self {
            categories,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.categories.iter().map(|category| category.links.len()).sum()
    }
}
