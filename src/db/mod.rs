use std::fmt::Display;

use crate::error::AppResult;

pub mod history;
pub mod memory;
pub mod redis;

pub use history::HistoryStore;
pub use memory::MemoryBlobStore;
pub use self::redis::{create_redis_client, RedisBlobStore};

/// Stable storage key for each game's history blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKey {
    FlickWord,
    Trivia,
}

impl Display for HistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKey::FlickWord => write!(f, "history:flickword"),
            HistoryKey::Trivia => write!(f, "history:trivia"),
        }
    }
}

/// String-keyed blob storage backing the history logs
///
/// The only primitives the scheduler needs are whole-value reads and writes;
/// callers serialize their own data.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
