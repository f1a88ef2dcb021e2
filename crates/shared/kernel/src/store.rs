//! In-memory home of the four record collections.
//!
//! Each collection starts empty and is published exactly once, by swapping in a fully
//! parsed snapshot. Readers clone the current `Arc` and never observe a half-loaded
//! collection.

use crate::loader::{LoadError, read_jsonl};
use crate::record::{Record, RecordCollection};
use billmock_domain::config::DataConfig;
use billmock_domain::entity::Entity;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use strum::EnumCount;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Debug)]
struct RecordStoreInner {
    collections: [RwLock<RecordCollection>; Entity::COUNT],
    ready: watch::Sender<bool>,
}

/// Shared, cheaply clonable handle to the loaded collections.
#[derive(Debug, Clone)]
pub struct RecordStore {
    inner: Arc<RecordStoreInner>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates a store with four empty collections, not yet ready.
    #[must_use]
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            inner: Arc::new(RecordStoreInner {
                collections: std::array::from_fn(|_| RwLock::new(Arc::from(Vec::new()))),
                ready,
            }),
        }
    }

    /// Current snapshot of a collection; empty until that collection is loaded.
    #[must_use]
    pub fn get_all(&self, entity: Entity) -> RecordCollection {
        self.inner.collections[entity.index()].read().clone()
    }

    /// Publishes a complete collection, replacing the previous snapshot.
    pub fn publish(&self, entity: Entity, records: Vec<Record>) -> usize {
        let count = records.len();
        let snapshot: RecordCollection = records.into();
        *self.inner.collections[entity.index()].write() = snapshot;
        debug!(entity = %entity, count, "Collection published");
        count
    }

    /// Reads one JSONL file and publishes it as `entity`.
    ///
    /// The collection is only swapped in after the whole file parsed; on error the
    /// previous snapshot stays visible.
    ///
    /// # Errors
    /// Propagates [`LoadError`] from the reader.
    pub async fn load(&self, entity: Entity, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let records = read_jsonl(path).await?;
        Ok(self.publish(entity, records))
    }

    /// Loads every collection from `cfg.dir` in [`Entity::ALL`] order, then marks the
    /// store ready.
    ///
    /// Stops at the first failure: collections loaded before it stay published, the
    /// rest stay empty, and the store never becomes ready.
    ///
    /// # Errors
    /// Returns the first [`LoadError`] encountered.
    pub async fn load_all(&self, cfg: &DataConfig) -> Result<(), LoadError> {
        for entity in Entity::ALL {
            let path = cfg.dir.join(entity.file_name());
            let count = self.load(entity, &path).await?;
            info!(entity = %entity, count, path = %path.display(), "Collection loaded");
        }

        self.mark_ready();
        info!("Data loaded successfully");
        Ok(())
    }

    /// Number of records currently published per entity.
    #[must_use]
    pub fn counts(&self) -> [(Entity, usize); Entity::COUNT] {
        Entity::ALL.map(|entity| (entity, self.get_all(entity).len()))
    }

    /// Flags the store as fully loaded. Later calls are no-ops.
    pub fn mark_ready(&self) {
        self.inner.ready.send_if_modified(|ready| !std::mem::replace(ready, true));
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    /// Resolves once [`RecordStore::mark_ready`] has been called.
    pub async fn wait_ready(&self) {
        let mut rx = self.inner.ready.subscribe();
        // The sender lives inside `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
