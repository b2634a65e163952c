use serde::Serialize;

use crate::{
    db::HistoryStore,
    error::{AppError, AppResult},
    selector::{
        DailySelector, DateKey, FallbackCounts, HistoryStats, PoolItem, Selection, SelectionRecord,
    },
};

/// History and fallback figures for one game
#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub kind: &'static str,
    pub pool_size: usize,
    pub items_per_slot: u32,
    pub history: HistoryStats,
    pub fallbacks: FallbackCounts,
}

/// Async front of one game's selector
///
/// Loads the persisted history, runs the pure selector against it and writes
/// outcomes back. Storage trouble degrades to an unpersisted run; selection
/// itself never fails.
pub struct DailyService<T> {
    selector: DailySelector<T>,
    history: HistoryStore,
    record_on_resolve: bool,
    max_preview_days: u32,
}

impl<T: PoolItem> DailyService<T> {
    pub fn new(selector: DailySelector<T>, history: HistoryStore) -> Self {
        Self {
            selector,
            history,
            record_on_resolve: false,
            max_preview_days: 31,
        }
    }

    /// Persist each freshly computed selection as soon as it is resolved
    pub fn record_on_resolve(mut self, enabled: bool) -> Self {
        self.record_on_resolve = enabled;
        self
    }

    pub fn max_preview_days(mut self, days: u32) -> Self {
        self.max_preview_days = days.max(1);
        self
    }

    pub fn selector(&self) -> &DailySelector<T> {
        &self.selector
    }

    /// Selection for (date, slot)
    pub async fn resolve(&self, date: DateKey, slot: u32) -> Selection<T> {
        if !self.record_on_resolve {
            let log = self.history.load().await;
            return self.selector.resolve(date, slot, &log);
        }

        self.history
            .update(|log| {
                let selection = self.selector.resolve(date, slot, log);
                let changed = !selection.from_history
                    && log.append(SelectionRecord {
                        date,
                        slot,
                        identities: selection.identities.clone(),
                    });
                (selection, changed)
            })
            .await
    }

    /// Selections for `days` consecutive dates from `start`; never writes history
    pub async fn preview(&self, start: DateKey, days: u32, slot: u32) -> AppResult<Vec<Selection<T>>> {
        if days == 0 || days > self.max_preview_days {
            return Err(AppError::InvalidInput(format!(
                "days must be between 1 and {}",
                self.max_preview_days
            )));
        }

        let log = self.history.load().await;
        let selections = self.selector.preview(start, days, slot, &log);
        tracing::debug!(
            kind = T::KIND,
            start = %start,
            days,
            slot,
            "Previewed selections"
        );
        Ok(selections)
    }

    /// Records what was actually played for (date, slot)
    ///
    /// Identities must belong to the pool. Recording the same outcome twice is
    /// a no-op; a different outcome replaces the earlier one. Returns whether
    /// the history changed.
    pub async fn record_played(&self, date: DateKey, slot: u32, identities: Vec<String>) -> AppResult<bool> {
        let identities = self.validate_identities(identities)?;

        let changed = self
            .history
            .update(|log| {
                let changed = log.append(SelectionRecord {
                    date,
                    slot,
                    identities,
                });
                (changed, changed)
            })
            .await;

        tracing::info!(kind = T::KIND, date = %date, slot, changed, "Recorded played selection");
        Ok(changed)
    }

    fn validate_identities(&self, identities: Vec<String>) -> AppResult<Vec<String>> {
        if identities.is_empty() {
            return Err(AppError::InvalidInput("items must not be empty".to_string()));
        }
        let limit = self.selector.config().items_per_slot as usize;
        if identities.len() > limit {
            return Err(AppError::InvalidInput(format!(
                "at most {} items may be recorded per {}",
                limit,
                T::KIND
            )));
        }

        identities
            .iter()
            .map(|raw| {
                self.selector
                    .pool()
                    .find_by_identity(raw)
                    .map(|item| item.identity())
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!("`{}` is not in the {} pool", raw.trim(), T::KIND))
                    })
            })
            .collect()
    }

    /// Forgets every recorded selection of this game
    pub async fn clear_history(&self) {
        self.history.clear().await;
    }

    pub async fn stats(&self) -> DailyStats {
        let log = self.history.load().await;
        DailyStats {
            kind: T::KIND,
            pool_size: self.selector.pool().len(),
            items_per_slot: self.selector.config().items_per_slot,
            history: log.stats(),
            fallbacks: self.selector.fallback_counts(),
        }
    }
}
