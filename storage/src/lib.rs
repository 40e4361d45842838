//! Storage tiers for Nebula.
//!
//! - [`RemoteStore`]: the authoritative document behind `/api/sync`
//! - [`LocalCache`]: per-field mirror of the last flush
//!
//! Neither tier is allowed to interrupt editing. Callers log and swallow
//! [`StoreError`]s except during startup, where they select a fallback.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use thiserror::Error;

pub mod cache;
pub mod remote;
pub mod retry;

pub use cache::{CacheKey, FileCache, LocalCache, MemoryCache, read_state, write_state};
pub use remote::{DisabledStore, HttpStore, MemoryStore, RemoteStore, SYNC_PATH};
pub use retry::{RetryConfig, RetryOutcome, send_with_retry};

/// Boxed future returned by [`RemoteStore`] methods.
pub type StoreFut<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sync request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("sync endpoint returned HTTP {0}")]
    Status(u16),
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("remote sync is not configured")]
    Disabled,
    #[error("cache entry {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
