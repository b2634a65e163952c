use std::sync::Arc;

use crate::{
    config::Config,
    db::{BlobStore, HistoryKey, HistoryStore},
    models::{TriviaQuestion, Word},
    selector::{DailySelector, PoolError},
    services::{load_trivia_pool, load_word_pool, DailyService},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub words: Arc<DailyService<Word>>,
    pub trivia: Arc<DailyService<TriviaQuestion>>,
    /// Name of the blob store backing both histories
    pub store_backend: &'static str,
}

impl AppState {
    /// Loads both pools and wires each game to its history key in `store`
    ///
    /// Fails when either pool is unusable; there is no degraded mode for a
    /// missing word list or question bank.
    pub async fn build(config: &Config, store: Arc<dyn BlobStore>) -> Result<Self, PoolError> {
        let word_pool = load_word_pool(config).await?;
        let trivia_pool = load_trivia_pool(config).await?;

        let words = DailyService::new(
            DailySelector::new(word_pool, config.word_selector()),
            HistoryStore::new(store.clone(), HistoryKey::FlickWord),
        )
        .record_on_resolve(config.record_word_on_resolve)
        .max_preview_days(config.max_preview_days);

        let trivia = DailyService::new(
            DailySelector::new(trivia_pool, config.trivia_selector()),
            HistoryStore::new(store.clone(), HistoryKey::Trivia),
        )
        .max_preview_days(config.max_preview_days);

        Ok(Self {
            words: Arc::new(words),
            trivia: Arc::new(trivia),
            store_backend: store.name(),
        })
    }
}
