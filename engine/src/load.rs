//! Startup load: remote, then cache, then built-in defaults.

use std::fmt;

use nebula_storage::{LocalCache, RemoteStore, read_state};
use nebula_types::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    /// Remote reachable but empty, or both tiers empty.
    Defaults,
    /// Remote unreachable; rebuilt from cached fields.
    LocalCache,
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Defaults => "defaults",
            Self::LocalCache => "local cache",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub state: AppState,
    pub source: LoadSource,
}

/// Never fails. Remote errors select the cache tier.
pub async fn load_initial_state(remote: &dyn RemoteStore, cache: &dyn LocalCache) -> LoadedState {
    let loaded = match remote.load().await {
        Ok(Some(state)) => LoadedState {
            state,
            source: LoadSource::Remote,
        },
        Ok(None) => LoadedState {
            state: AppState::default(),
            source: LoadSource::Defaults,
        },
        Err(err) => {
            tracing::warn!(store = %remote.describe(), "Remote load failed, using local cache: {err}");
            match read_state(cache) {
                Some(state) => LoadedState {
                    state,
                    source: LoadSource::LocalCache,
                },
                None => LoadedState {
                    state: AppState::default(),
                    source: LoadSource::Defaults,
                },
            }
        }
    };
    tracing::info!(
        source = %loaded.source,
        categories = loaded.state.categories.len(),
        "Dashboard state loaded"
    );
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_storage::{CacheKey, DisabledStore, MemoryCache, MemoryStore, write_state};
    use nebula_types::Category;

    fn custom(logo: &str) -> AppState {
        AppState {
            categories: vec![Category::new("c1", "One")],
            logo_text: logo.into(),
            ..AppState::default()
        }
    }

    #[tokio::test]
    async fn remote_document_wins() {
        let remote = MemoryStore::with_document(custom("remote"));
        let cache = MemoryCache::default();
        write_state(&cache, &custom("cache")).unwrap();

        let loaded = load_initial_state(&remote, &cache).await;
        assert_eq!(loaded.source, LoadSource::Remote);
        assert_eq!(loaded.state.logo_text, "remote");
    }

    #[tokio::test]
    async fn remote_not_found_uses_defaults_not_cache() {
        let cache = MemoryCache::default();
        write_state(&cache, &custom("cache")).unwrap();

        let loaded = load_initial_state(&MemoryStore::default(), &cache).await;
        assert_eq!(loaded.source, LoadSource::Defaults);
        assert_eq!(loaded.state, AppState::default());
    }

    #[tokio::test]
    async fn remote_error_falls_back_to_cache() {
        let cache = MemoryCache::default();
        write_state(&cache, &custom("cache")).unwrap();

        let loaded = load_initial_state(&DisabledStore, &cache).await;
        assert_eq!(loaded.source, LoadSource::LocalCache);
        assert_eq!(loaded.state, custom("cache"));
    }

    #[tokio::test]
    async fn partial_cache_is_filled_from_defaults() {
        let cache = MemoryCache::default();
        cache.set(CacheKey::Background, "https://bg.example/a.jpg").unwrap();

        let loaded = load_initial_state(&DisabledStore, &cache).await;
        assert_eq!(loaded.source, LoadSource::LocalCache);
        assert_eq!(loaded.state.categories, AppState::default().categories);
        assert_eq!(loaded.state.background_image.as_deref(), Some("https://bg.example/a.jpg"));
    }

    #[tokio::test]
    async fn everything_empty_uses_defaults() {
        let loaded = load_initial_state(&DisabledStore, &MemoryCache::default()).await;
        assert_eq!(loaded.source, LoadSource::Defaults);
        assert_eq!(loaded.state, AppState::default());
    }
}
