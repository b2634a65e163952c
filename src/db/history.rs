use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{BlobStore, HistoryKey};
use crate::selector::HistoryLog;

/// Outcome of reading the history blob
enum Loaded {
    Present(HistoryLog),
    Missing,
    /// The store could not be reached; its contents are unknown
    Unavailable,
    /// The blob exists but does not parse; it is replaced on the next write
    Corrupt,
}

impl Loaded {
    fn is_writable(&self) -> bool {
        !matches!(self, Loaded::Unavailable)
    }

    fn into_log(self) -> HistoryLog {
        match self {
            Loaded::Present(log) => log,
            Loaded::Missing | Loaded::Unavailable | Loaded::Corrupt => HistoryLog::new(),
        }
    }
}

/// Persists one game's `HistoryLog` as a single JSON blob
///
/// Storage problems never fail a caller: an unreadable or corrupt blob loads
/// as an empty log and a failed write is logged and skipped, so the game keeps
/// running unpersisted.
pub struct HistoryStore {
    store: Arc<dyn BlobStore>,
    key: HistoryKey,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn BlobStore>, key: HistoryKey) -> Self {
        Self {
            store,
            key,
            lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> HistoryKey {
        self.key
    }

    /// Reads the current log, falling back to an empty one
    pub async fn load(&self) -> HistoryLog {
        self.read().await.into_log()
    }

    async fn read(&self) -> Loaded {
        let key = self.key.to_string();
        let blob = match self.store.get(&key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Loaded::Missing,
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    backend = self.store.name(),
                    error = %e,
                    "History store unavailable, continuing without history"
                );
                return Loaded::Unavailable;
            }
        };

        match HistoryLog::from_json(&blob) {
            Ok(log) => Loaded::Present(log),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt history blob ignored");
                Loaded::Corrupt
            }
        }
    }

    /// Writes the log back; failures are logged and swallowed
    pub async fn save(&self, log: &HistoryLog) {
        let key = self.key.to_string();
        let blob = match log.to_json() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "History serialization failed, not saved");
                return;
            }
        };

        if let Err(e) = self.store.set(&key, blob).await {
            tracing::warn!(
                key = %key,
                backend = self.store.name(),
                error = %e,
                "History write failed, continuing unpersisted"
            );
        }
    }

    /// Runs a read-modify-write of the log under this store's lock
    ///
    /// Concurrent updates of the same game are serialized so appends are not
    /// lost. The log is only written back when `apply` reports a change and
    /// the stored blob could be read; after a failed read `apply` still sees
    /// an empty log but nothing is written over the stored one.
    pub async fn update<R>(&self, apply: impl FnOnce(&mut HistoryLog) -> (R, bool)) -> R {
        let _guard = self.lock.lock().await;
        let loaded = self.read().await;
        let writable = loaded.is_writable();
        let mut log = loaded.into_log();
        let (result, changed) = apply(&mut log);
        match (changed, writable) {
            (true, true) => self.save(&log).await,
            (true, false) => tracing::warn!(
                key = %self.key,
                "History was not readable, update kept in memory only"
            ),
            (false, _) => {}
        }
        result
    }

    /// Removes the persisted log entirely
    pub async fn clear(&self) {
        let _guard = self.lock.lock().await;
        let key = self.key.to_string();
        match self.store.remove(&key).await {
            Ok(()) => tracing::info!(key = %key, "History cleared"),
            Err(e) => tracing::warn!(key = %key, error = %e, "History clear failed"),
        }
    }
}
