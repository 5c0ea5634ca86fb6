//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use postquell_core::DEFAULT_STORAGE_KEY;
use postquell_core::query::{PostQuery, SortOrder};

/// Where the post collection is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// JSON file in the data directory, survives restarts.
    #[default]
    File,
    /// Process-local slot, useful for demos and quota experiments.
    Memory,
    /// No durable storage; the store starts empty and never saves.
    Disabled,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "none" | "off" => Ok(Self::Disabled),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Durable slot configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub key: String,
    pub quota_bytes: Option<usize>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    /// Number of posts shown in the "recent" section.
    pub recent_limit: usize,
    /// Search, tag and order for the full listing.
    pub listing: PostQuery,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let backend = var("POSTQUELL_STORAGE")
            .map(|value| {
                value.parse().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Falling back to file storage");
                    StorageBackend::File
                })
            })
            .unwrap_or_default();

        Self {
            storage: StorageConfig {
                backend,
                data_dir: var("POSTQUELL_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".postquell")),
                key: var("POSTQUELL_STORAGE_KEY")
                    .filter(|k| !k.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
                quota_bytes: var("POSTQUELL_QUOTA_BYTES").and_then(|s| s.parse().ok()),
            },
            recent_limit: var("POSTQUELL_RECENT_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(6),
            listing: PostQuery {
                search: var("POSTQUELL_SEARCH").filter(|s| !s.trim().is_empty()),
                tag: var("POSTQUELL_TAG").filter(|s| !s.trim().is_empty()),
                sort: var("POSTQUELL_SORT")
                    .and_then(|value| {
                        value
                            .parse::<SortOrder>()
                            .inspect_err(|e| tracing::warn!(error = %e, "Using newest-first"))
                            .ok()
                    })
                    .unwrap_or_default(),
            },
        }
    }
}
