//! Local cache tier: four independent string entries.
//!
//! The cache mirrors the last flushed document so the dashboard can start
//! when the remote tier is unreachable. Fields are read back one by one;
//! whatever is missing falls back to the built-in default.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nebula_types::{AppState, Category};
use nebula_utils::{AtomicWriteOptions, FileSyncPolicy, atomic_write_with_options, remove_if_exists};

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Categories,
    Background,
    LogoText,
    LogoImage,
}

impl CacheKey {
    pub const ALL: [Self; 4] = [
        Self::Categories,
        Self::Background,
        Self::LogoText,
        Self::LogoImage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "nebula_categories",
            Self::Background => "nebula_background",
            Self::LogoText => "nebula_logo_text",
            Self::LogoImage => "nebula_logo_image",
        }
    }
}

pub trait LocalCache: Send + Sync {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError>;
    fn set(&self, key: CacheKey, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: CacheKey) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError> {
        CacheKey::ALL.into_iter().try_for_each(|key| self.remove(key))
    }
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    fn io_error(&self, key: CacheKey, source: io::Error) -> StoreError {
        StoreError::Cache {
            path: self.path(key),
            source,
        }
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(key, err)),
        }
    }

    fn set(&self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(key, e))?;
        let options = AtomicWriteOptions {
            file_sync: FileSyncPolicy::SkipSync,
            ..AtomicWriteOptions::default()
        };
        atomic_write_with_options(self.path(key), value.as_bytes(), options)
            .map_err(|e| self.io_error(key, e))
    }

    fn remove(&self, key: CacheKey) -> Result<(), StoreError> {
        remove_if_exists(self.path(key)).map_err(|e| self.io_error(key, e))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<CacheKey, String>>>,
}

impl MemoryCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(&key).cloned())
    }

    fn set(&self, key: CacheKey, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<(), StoreError> {
        self.lock().remove(&key);
        Ok(())
    }
}

/// Write every field of `state`. Empty or absent fields are removed.
///
/// Each field is attempted even when an earlier one fails; the first error
/// is returned once all four have been tried.
pub fn write_state(cache: &dyn LocalCache, state: &AppState) -> Result<(), StoreError> {
    let categories = serde_json::to_string(&state.categories)
        .map_err(StoreError::from)
        .and_then(|json| cache.set(CacheKey::Categories, &json));
    let results = [
        categories,
        put_or_remove(cache, CacheKey::Background, state.background_image.as_deref()),
        put_or_remove(cache, CacheKey::LogoText, Some(state.logo_text.as_str())),
        put_or_remove(cache, CacheKey::LogoImage, state.logo_image.as_deref()),
    ];
    let mut first = None;
    for result in results {
        if let Err(err) = result {
            tracing::warn!("Cache field write failed: {err}");
            first.get_or_insert(err);
        }
    }
    first.map_or(Ok(()), Err)
}

fn put_or_remove(cache: &dyn LocalCache, key: CacheKey, value: Option<&str>) -> Result<(), StoreError> {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => cache.set(key, value),
        None => cache.remove(key),
    }
}

/// Rebuild a document from the cache, field by field.
///
/// Unreadable or malformed entries are logged and treated as missing.
/// Returns `None` when the cache holds nothing at all.
#[must_use]
pub fn read_state(cache: &dyn LocalCache) -> Option<AppState> {
    let read = |key: CacheKey| match cache.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(err) => {
            tracing::warn!(key = key.as_str(), "Cache read failed: {err}");
            None
        }
    };

    let categories = read(CacheKey::Categories);
    let background_image = read(CacheKey::Background);
    let logo_text = read(CacheKey::LogoText);
    let logo_image = read(CacheKey::LogoImage);

    if categories.is_none() && background_image.is_none() && logo_text.is_none() && logo_image.is_none() {
        return None;
    }

    let mut state = AppState::default();
    if let Some(raw) = categories {
        match serde_json::from_str::<Vec<Category>>(&raw) {
            Ok(categories) => state.categories = categories,
            Err(err) => tracing::warn!("Ignoring malformed cached categories: {err}"),
        }
    }
    if let Some(text) = logo_text {
        state.logo_text = text;
    }
    state.background_image = background_image;
    state.logo_image = logo_image;
    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_types::Link;
    use tempfile::tempdir;

    fn custom() -> AppState {
        AppState {
            categories: vec![
                Category::new("c1", "One")
                    .with_links(vec![Link::new("l1", "a", "https://a.example")]),
            ],
            background_image: Some("https://bg.example/x.jpg".into()),
            logo_text: "Mine".into(),
            logo_image: None,
        }
    }

    #[test]
    fn keys_use_dashboard_names() {
        let names: Vec<_> = CacheKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["nebula_categories", "nebula_background", "nebula_logo_text", "nebula_logo_image"]
        );
    }

    #[test]
    fn file_cache_set_get_remove() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));
        assert_eq!(cache.get(CacheKey::LogoText).unwrap(), None);

        cache.set(CacheKey::LogoText, "hello").unwrap();
        assert_eq!(cache.get(CacheKey::LogoText).unwrap().as_deref(), Some("hello"));
        assert!(dir.path().join("nested/nebula_logo_text").exists());

        cache.remove(CacheKey::LogoText).unwrap();
        cache.remove(CacheKey::LogoText).unwrap();
        assert_eq!(cache.get(CacheKey::LogoText).unwrap(), None);
    }

    #[test]
    fn write_state_removes_empty_fields() {
        let cache = MemoryCache::default();
        cache.set(CacheKey::LogoImage, "stale").unwrap();
        write_state(&cache, &custom()).unwrap();

        assert!(cache.get(CacheKey::Categories).unwrap().is_some());
        assert_eq!(
            cache.get(CacheKey::Background).unwrap().as_deref(),
            Some("https://bg.example/x.jpg")
        );
        assert_eq!(cache.get(CacheKey::LogoImage).unwrap(), None);
    }

    struct FailingCategories(MemoryCache);

    impl LocalCache for FailingCategories {
        fn get(&self, key: CacheKey) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&self, key: CacheKey, value: &str) -> Result<(), StoreError> {
            if key == CacheKey::Categories {
                return Err(StoreError::Disabled);
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: CacheKey) -> Result<(), StoreError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_field_does_not_skip_the_others() {
        let cache = FailingCategories(MemoryCache::default());
        cache
            .0
            .set(CacheKey::LogoImage, "https://old.example/logo.png")
            .unwrap();

        let err = write_state(&cache, &custom()).unwrap_err();
        assert!(matches!(err, StoreError::Disabled));

        assert_eq!(cache.get(CacheKey::LogoImage).unwrap(), None);
        assert_eq!(cache.get(CacheKey::LogoText).unwrap().as_deref(), Some("Mine"));
        assert_eq!(
            cache.get(CacheKey::Background).unwrap().as_deref(),
            Some("https://bg.example/x.jpg")
        );
        assert_eq!(read_state(&cache).unwrap().logo_image, None);
    }

    #[test]
    fn read_state_round_trips() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        write_state(&cache, &custom()).unwrap();
        assert_eq!(read_state(&cache), Some(custom()));
    }

    #[test]
    fn empty_cache_reads_nothing() {
        assert_eq!(read_state(&MemoryCache::default()), None);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cache = MemoryCache::default();
        cache.set(CacheKey::LogoText, "Only logo").unwrap();
        let state = read_state(&cache).unwrap();
        assert_eq!(state.logo_text, "Only logo");
        assert_eq!(state.categories, AppState::default().categories);
        assert_eq!(state.background_image, None);
    }

    #[test]
    fn malformed_categories_fall_back_to_defaults() {
        let cache = MemoryCache::default();
        cache.set(CacheKey::Categories, "{not json").unwrap();
        cache.set(CacheKey::Background, "bg").unwrap();
        let state = read_state(&cache).unwrap();
        assert_eq!(state.categories, AppState::default().categories);
        assert_eq!(state.background_image.as_deref(), Some("bg"));
    }

    #[test]
    fn clear_removes_every_key() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        write_state(&cache, &custom()).unwrap();
        cache.clear().unwrap();
        for key in CacheKey::ALL {
            assert_eq!(cache.get(key).unwrap(), None);
        }
    }
}
