//! Wiring from resolved settings to a running dashboard.

use std::sync::Arc;
use std::time::Duration;

use nebula_config::Settings;
use nebula_storage::{DisabledStore, FileCache, HttpStore, LocalCache, RemoteStore, RetryConfig};
use nebula_types::Secret;
use thiserror::Error;

use crate::dashboard::Dashboard;
use crate::load::{LoadSource, load_initial_state};
use crate::persistence::PersistenceCoordinator;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug)]
pub struct Session {
    pub dashboard: Dashboard,
    pub source: LoadSource,
}

/// Storage tiers a session runs against.
pub struct Tiers {
    pub remote: Arc<dyn RemoteStore>,
    pub cache: Arc<dyn LocalCache>,
}

impl Tiers {
    /// HTTP gateway when a remote URL is configured, local-only otherwise.
    pub fn from_settings(settings: &Settings) -> Result<Self, SessionError> {
        let remote: Arc<dyn RemoteStore> = match settings.remote_url.as_deref() {
            Some(url) => {
                let client = reqwest::Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .timeout(REQUEST_TIMEOUT)
                    .build()?;
                let retry = RetryConfig::default().with_max_retries(settings.max_retries);
                Arc::new(HttpStore::new(client, url, retry))
            }
            None => {
                tracing::info!("No remote URL configured; running in local-only mode");
                Arc::new(DisabledStore)
            }
        };
        Ok(Self {
            remote,
            cache: Arc::new(FileCache::new(&settings.cache_dir)),
        })
    }
}

/// Load the model and start persistence.
///
/// Must be called inside a tokio runtime.
pub async fn start(tiers: Tiers, secret: Option<Secret>, debounce: Duration) -> Session {
    let loaded = load_initial_state(tiers.remote.as_ref(), tiers.cache.as_ref()).await;
    let persistence = PersistenceCoordinator::spawn(tiers.remote, tiers.cache, debounce);
    Session {
        dashboard: Dashboard::new(loaded.state, secret, persistence),
        source: loaded.source,
    }
}

pub async fn open(settings: &Settings) -> Result<Session, SessionError> {
    let tiers = Tiers::from_settings(settings)?;
    Ok(start(tiers, settings.secret.clone(), settings.debounce).await)
}
