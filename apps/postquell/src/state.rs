//! Application state - the store and the slot behind it.

use std::sync::Arc;

use postquell_core::PostStore;
use postquell_core::ports::KeyValueSlot;
use postquell_infra::{FileSlot, FileSlotConfig, InMemorySlot};

use crate::config::{StorageBackend, StorageConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
}

impl AppState {
    /// Build the store on the configured slot.
    pub fn new(config: &StorageConfig) -> Self {
        let slot: Option<Arc<dyn KeyValueSlot>> = match config.backend {
            StorageBackend::File => Some(Arc::new(FileSlot::new(FileSlotConfig {
                dir: config.data_dir.clone(),
                quota: config.quota_bytes,
            }))),
            StorageBackend::Memory => Some(Arc::new(match config.quota_bytes {
                Some(bytes) => InMemorySlot::with_quota(bytes),
                None => InMemorySlot::new(),
            })),
            StorageBackend::Disabled => {
                tracing::warn!("Durable storage disabled. Running in memory only.");
                None
            }
        };

        let mut builder = PostStore::builder().key(config.key.as_str());
        if let Some(slot) = slot {
            builder = builder.slot(slot);
        }
        let store = builder.build();

        tracing::info!(
            backend = ?config.backend,
            key = %store.storage_key(),
            persistent = store.is_persistent(),
            posts = store.len(),
            "Application state initialized"
        );

        Self {
            store: Arc::new(store),
        }
    }
}
