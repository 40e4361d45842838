//! Configuration for Nebula.
//!
//! Raw TOML structs mirror `~/.nebula/config.toml` with every field optional.
//! [`Settings::resolve`] folds them together with environment overrides into
//! the fully-resolved values the rest of the workspace consumes.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fmt, fs, io};

use serde::Deserialize;
use thiserror::Error;

use nebula_types::Secret;

/// Quiet period before a burst of edits is written out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
/// Retries after the first attempt for remote store calls.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

pub const PASSWORD_ENV: &str = "NEBULA_PASSWORD";
pub const REMOTE_URL_ENV: &str = "NEBULA_REMOTE_URL";

#[derive(Debug, Default, Deserialize)]
pub struct NebulaConfig {
    pub security: Option<SecurityConfig>,
    pub sync: Option<SyncConfig>,
    pub cache: Option<CacheConfig>,
}

#[derive(Default, Deserialize)]
pub struct SecurityConfig {
    /// Shared password for gated actions. `${VAR}` references are expanded.
    pub password: Option<String>,
}

// Manual Debug impl to prevent leaking the password in logs.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_some() {
            "[REDACTED]"
        } else {
            "None"
        };
        f.debug_struct("SecurityConfig")
            .field("password", &password)
            .finish()
    }
}

/// Remote store settings.
///
/// ```toml
/// [sync]
/// remote_url = "https://nav.example.com"
/// debounce_ms = 1000
/// max_retries = 2
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the deployment serving `/api/sync`. Absent means local-only.
    pub remote_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the local cache entries. `~/` is expanded.
    pub dir: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl NebulaConfig {
    /// Load from the default location. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    nebula_home().map(|dir| dir.join("config.toml"))
}

/// `~/.nebula`, the root for config, cache and logs.
#[must_use]
pub fn nebula_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".nebula"))
}

/// Replace `${VAR}` references using `lookup` (missing vars become empty).
fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty()
                    && let Some(replacement) = lookup(name)
                {
                    out.push_str(&replacement);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(stripped) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(raw)
}

/// Fully-resolved settings. Existence of a value is the proof of its validity.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` means gated actions fail with a configuration error.
    pub secret: Option<Secret>,
    /// `None` means local-only mode.
    pub remote_url: Option<String>,
    pub debounce: Duration,
    pub max_retries: u32,
    pub cache_dir: PathBuf,
}

impl Settings {
    /// Resolve against the process environment.
    #[must_use]
    pub fn resolve(config: Option<&NebulaConfig>) -> Self {
        Self::resolve_with(config, |name| env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup.
    ///
    /// Environment variables win over file values.
    pub fn resolve_with(
        config: Option<&NebulaConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let security = config.and_then(|cfg| cfg.security.as_ref());
        let sync = config.and_then(|cfg| cfg.sync.as_ref());
        let cache = config.and_then(|cfg| cfg.cache.as_ref());

        let env_value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let password = env_value(PASSWORD_ENV).or_else(|| {
            security
                .and_then(|s| s.password.as_deref())
                .map(|raw| expand_with(raw, &lookup))
        });

        let remote_url = env_value(REMOTE_URL_ENV)
            .or_else(|| sync.and_then(|s| s.remote_url.clone()))
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let cache_dir = cache
            .and_then(|c| c.dir.as_deref())
            .map(expand_home)
            .or_else(|| nebula_home().map(|home| home.join("cache")))
            .unwrap_or_else(|| PathBuf::from(".nebula").join("cache"));

        Self {
            secret: password.and_then(Secret::new),
            remote_url,
            debounce: sync
                .and_then(|s| s.debounce_ms)
                .map_or(DEFAULT_DEBOUNCE, Duration::from_millis),
            max_retries: sync
                .and_then(|s| s.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
            cache_dir,
        }
    }
}
