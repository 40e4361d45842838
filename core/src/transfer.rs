//! Export and import of the category collection.
//!
//! Export always succeeds on a well-formed model. Import runs a shallow
//! probe on the raw JSON, then a typed decode; nothing is applied until the
//! caller has affirmed the returned [`ImportPlan`].

use std::collections::HashSet;

use nebula_types::Category;
use serde_json::Value;

use crate::errors::ImportError;

/// Default file name offered when exporting.
pub const EXPORT_FILE_NAME: &str = "nebula-nav-config.json";

/// Serialize categories as a pretty-printed JSON array.
pub fn export_categories(categories: &[Category]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(categories)
}

/// Validated import, waiting for the user to accept the overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    categories: Vec<Category>,
}

impl ImportPlan {
    #[must_use]
    pub fn count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Confirmation text shown before the collection is replaced.
    #[must_use]
    pub fn prompt(&self) -> String {
        let noun = if self.count() == 1 { "category" } else { "categories" };
        format!(
            "Importing {} {noun} will overwrite all current links. Continue?",
            self.count()
        )
    }

    #[must_use]
    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }
}

/// Parse raw file contents and validate them.
pub fn parse_import(text: &str) -> Result<ImportPlan, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Format(e.to_string()))?;
    validate_import(&value)
}

pub fn validate_import(value: &Value) -> Result<ImportPlan, ImportError> {
    let Value::Array(entries) = value else {
        return Err(ImportError::Format(format!("got {}", kind_of(value))));
    };
    if let Some((index, other)) = entries.iter().enumerate().find(|(_, e)| !e.is_object()) {
        return Err(ImportError::Format(format!(
            "entry {index} is {}, not an object",
            kind_of(other)
        )));
    }

    if let Some(first) = entries.first() {
        for field in ["id", "links"] {
            if !first.get(field).is_some_and(is_truthy) {
                return Err(ImportError::Structure(format!(
                    "first entry has no `{field}`"
                )));
            }
        }
    }

    let categories: Vec<Category> = serde_json::from_value(value.clone())
        .map_err(|e| ImportError::Structure(e.to_string()))?;

    let mut seen = HashSet::new();
    if let Some(duplicate) = categories.iter().find(|c| !seen.insert(&c.id)) {
        return Err(ImportError::Structure(format!(
            "category id `{}` appears more than once",
            duplicate.id
        )));
    }

    Ok(ImportPlan { categories })
}

/// Presence test used by the shallow probe: `null`, `false`, `0` and `""`
/// count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
