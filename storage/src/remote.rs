//! Remote key-value gateway holding the authoritative document.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nebula_types::AppState;
use reqwest::StatusCode;

use crate::retry::{RetryConfig, RetryOutcome, send_with_retry};
use crate::{StoreError, StoreFut};

pub const SYNC_PATH: &str = "/api/sync";

/// The authoritative tier.
///
/// `load` returns `Ok(None)` when nothing has ever been written.
pub trait RemoteStore: Send + Sync {
    fn load(&self) -> StoreFut<'_, Option<AppState>>;
    fn save<'a>(&'a self, state: &'a AppState) -> StoreFut<'a, ()>;
    fn describe(&self) -> String;
}

/// `GET`/`POST {base}/api/sync` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpStore {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, retry: RetryConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}{SYNC_PATH}", base_url.trim_end_matches('/')),
            retry,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self) -> Result<Option<AppState>, StoreError> {
        let outcome = send_with_retry(|| self.client.get(&self.endpoint), &self.retry).await;
        let response = match outcome {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) if response.status() == StatusCode::NOT_FOUND => {
                return Ok(None);
            }
            RetryOutcome::HttpError(response) => {
                return Err(StoreError::Status(response.status().as_u16()));
            }
            RetryOutcome::Transport { attempts, source } => {
                return Err(StoreError::Transport { attempts, source });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|source| StoreError::Transport {
                attempts: 1,
                source,
            })?;
        let state = serde_json::from_slice(&body)?;
        Ok(Some(state))
    }

    async fn push(&self, state: &AppState) -> Result<(), StoreError> {
        let outcome =
            send_with_retry(|| self.client.post(&self.endpoint).json(state), &self.retry).await;
        match outcome {
            RetryOutcome::Success(_) => Ok(()),
            RetryOutcome::HttpError(response) => {
                Err(StoreError::Status(response.status().as_u16()))
            }
            RetryOutcome::Transport { attempts, source } => {
                Err(StoreError::Transport { attempts, source })
            }
        }
    }
}

impl RemoteStore for HttpStore {
    fn load(&self) -> StoreFut<'_, Option<AppState>> {
        Box::pin(self.fetch())
    }

    fn save<'a>(&'a self, state: &'a AppState) -> StoreFut<'a, ()> {
        Box::pin(self.push(state))
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Local-only mode: every call fails as unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl RemoteStore for DisabledStore {
    fn load(&self) -> StoreFut<'_, Option<AppState>> {
        Box::pin(async { Err(StoreError::Disabled) })
    }

    fn save<'a>(&'a self, _state: &'a AppState) -> StoreFut<'a, ()> {
        Box::pin(async { Err(StoreError::Disabled) })
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}

/// In-process store, mainly for tests. Can be switched offline.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    document: Option<AppState>,
    offline: bool,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn with_document(state: AppState) -> Self {
        let store = Self::default();
        store.lock().document = Some(state);
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    #[must_use]
    pub fn document(&self) -> Option<AppState> {
        self.lock().document.clone()
    }

    /// Successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }
}

impl RemoteStore for MemoryStore {
    fn load(&self) -> StoreFut<'_, Option<AppState>> {
        let result = {
            let inner = self.lock();
            if inner.offline {
                Err(StoreError::Disabled)
            } else {
                Ok(inner.document.clone())
            }
        };
        Box::pin(async move { result })
    }

    fn save<'a>(&'a self, state: &'a AppState) -> StoreFut<'a, ()> {
        let result = {
            let mut inner = self.lock();
            if inner.offline {
                Err(StoreError::Disabled)
            } else {
                inner.document = Some(state.clone());
                inner.saves += 1;
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
