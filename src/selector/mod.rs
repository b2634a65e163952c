//! Deterministic daily selection
//!
//! Maps (date, slot) to items of a fixed pool so that:
//! - the same inputs always produce the same answer,
//! - nothing repeats within the recent window,
//! - consecutive days do not form visible letter or alphabetical runs.
//!
//! Everything in this module is synchronous and free of I/O. Persistence of
//! the history log lives in [`crate::db`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub mod constraints;
pub mod date_key;
pub mod history;
pub mod pool;
pub mod search;
pub mod seed;
pub mod window;

pub use constraints::{accepts, compute_problematic_sets, AcceptanceState, RuleSet};
pub use date_key::{DateKey, DateKeyParseError};
pub use history::{HistoryLog, HistoryStats, SelectionRecord};
pub use pool::{CandidatePool, PoolError, PoolItem};
pub use search::{search, FallbackStage, SearchOutcome};
pub use seed::{seed_index, SeedParams};
pub use window::RecentWindowBuilder;

/// Largest window the builder will reconstruct, whatever the configuration says
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Where the recent window comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Trailing days, recomputed when the history has no record for them
    Progressive { days: u32 },
    /// Everything recorded as played, optionally limited to trailing days
    Recorded { days: Option<u32> },
}

/// Construction-time settings of a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    pub seed: SeedParams,
    pub rules: RuleSet,
    pub window: WindowPolicy,
    /// Items chosen per (date, slot); 1 for a word, N for a trivia game
    pub items_per_slot: u32,
}

impl SelectorConfig {
    /// Word-of-the-day settings: one item, full rule set, progressive window
    pub fn words(window_days: u32) -> Self {
        Self {
            seed: SeedParams::default(),
            rules: RuleSet::full(),
            window: WindowPolicy::Progressive { days: window_days },
            items_per_slot: 1,
        }
    }

    /// Trivia settings: a batch per game, anti-repeat only, played-history window
    pub fn trivia(questions_per_game: u32, window_days: Option<u32>) -> Self {
        Self {
            seed: SeedParams::default(),
            rules: RuleSet::no_repeat_only(),
            window: WindowPolicy::Recorded { days: window_days },
            items_per_slot: questions_per_game.max(1),
        }
    }

    pub fn with_seed(mut self, seed: SeedParams) -> Self {
        self.seed = seed;
        self
    }
}

/// Items chosen for one (date, slot)
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub date: DateKey,
    pub slot: u32,
    pub items: Vec<T>,
    pub identities: Vec<String>,
    /// Least strict stage used for any item of the batch
    pub stage: FallbackStage,
    /// Taken verbatim from the history log
    pub from_history: bool,
}

/// Pool indices picked for one (date, slot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pick {
    pub indices: Vec<usize>,
    pub stage: FallbackStage,
}

/// Number of selections that needed a fallback stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FallbackCounts {
    pub relaxed: u64,
    pub absolute: u64,
}

#[derive(Debug, Default)]
struct FallbackCounters {
    relaxed: AtomicU64,
    absolute: AtomicU64,
}

/// The single implementation of seeded, constrained daily selection
#[derive(Debug)]
pub struct DailySelector<T> {
    pool: CandidatePool<T>,
    config: SelectorConfig,
    fallbacks: FallbackCounters,
}

impl<T: PoolItem> DailySelector<T> {
    pub fn new(pool: CandidatePool<T>, config: SelectorConfig) -> Self {
        tracing::info!(
            kind = T::KIND,
            pool_size = pool.len(),
            items_per_slot = config.items_per_slot,
            window = ?config.window,
            "Daily selector ready"
        );
        Self {
            pool,
            config,
            fallbacks: FallbackCounters::default(),
        }
    }

    pub fn pool(&self) -> &CandidatePool<T> {
        &self.pool
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn fallback_counts(&self) -> FallbackCounts {
        FallbackCounts {
            relaxed: self.fallbacks.relaxed.load(Ordering::Relaxed),
            absolute: self.fallbacks.absolute.load(Ordering::Relaxed),
        }
    }

    /// Seeded starting index for (date, slot), before any constraint is applied
    pub fn base_index(&self, date: DateKey, slot: u32) -> usize {
        seed_index(date, self.seed_slot(slot, 0), self.pool.len(), &self.config.seed)
    }

    fn seed_slot(&self, slot: u32, position: u32) -> u32 {
        slot.wrapping_mul(self.config.items_per_slot).wrapping_add(position)
    }

    /// Runs the candidate search for every item of a slot
    ///
    /// Items picked earlier in the batch join the window for later ones.
    pub(crate) fn pick(&self, date: DateKey, slot: u32, window: &[String]) -> Pick {
        let identities = self.pool.identities();
        let mut window = self.trim_window(window);
        let mut indices = Vec::with_capacity(self.config.items_per_slot as usize);
        let mut stage = FallbackStage::Strict;

        for position in 0..self.config.items_per_slot {
            let outcome = search(
                date,
                self.seed_slot(slot, position),
                identities,
                &window,
                self.config.rules,
                &self.config.seed,
            );
            stage = stage.max(outcome.stage);
            window.push(identities[outcome.index].clone());
            indices.push(outcome.index);
        }

        Pick { indices, stage }
    }

    /// Keeps the newest identities that still leave room for a full batch
    ///
    /// Played-history windows grow without bound; once they cover the pool the
    /// oldest entries become eligible again.
    fn trim_window(&self, window: &[String]) -> Vec<String> {
        if matches!(self.config.window, WindowPolicy::Progressive { .. }) {
            return window.to_vec();
        }
        let capacity = self
            .pool
            .len()
            .saturating_sub(self.config.items_per_slot as usize);
        let mut seen = std::collections::HashSet::new();
        let mut kept: Vec<String> = window
            .iter()
            .rev()
            .filter(|id| seen.insert(*id))
            .take(capacity)
            .cloned()
            .collect();
        kept.reverse();
        kept
    }

    fn materialize(&self, date: DateKey, slot: u32, pick: Pick) -> Selection<T> {
        let items: Vec<T> = pick
            .indices
            .iter()
            .filter_map(|&index| self.pool.get(index).cloned())
            .collect();
        let identities = pick
            .indices
            .iter()
            .map(|&index| self.pool.identities()[index].clone())
            .collect();
        Selection {
            date,
            slot,
            items,
            identities,
            stage: pick.stage,
            from_history: false,
        }
    }

    fn from_history(&self, date: DateKey, slot: u32, history: &HistoryLog) -> Option<Selection<T>> {
        let recorded = history.get_slot(date, slot)?;
        if recorded.is_empty() {
            return None;
        }
        let items: Option<Vec<T>> = recorded
            .iter()
            .map(|id| self.pool.find_by_identity(id).cloned())
            .collect();
        match items {
            Some(items) => Some(Selection {
                date,
                slot,
                items,
                identities: recorded.to_vec(),
                stage: FallbackStage::Strict,
                from_history: true,
            }),
            None => {
                tracing::warn!(
                    kind = T::KIND,
                    date = %date,
                    slot,
                    "Recorded selection is not in the current pool, recomputing"
                );
                None
            }
        }
    }

    fn count_fallback(&self, selection: &Selection<T>) {
        let counter = match selection.stage {
            FallbackStage::Strict => return,
            FallbackStage::Relaxed => &self.fallbacks.relaxed,
            FallbackStage::Absolute => &self.fallbacks.absolute,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            kind = T::KIND,
            date = %selection.date,
            slot = selection.slot,
            stage = ?selection.stage,
            pool_size = self.pool.len(),
            "Selection needed a fallback stage"
        );
    }

    /// Trailing window of identities before (date, slot), oldest first
    pub fn recent_window(&self, date: DateKey, slot: u32, history: &HistoryLog) -> Vec<String> {
        RecentWindowBuilder::new(self, history).build(date, slot)
    }

    /// Selection for `slot` on `date`
    ///
    /// A recorded selection is returned as-is; otherwise the recent window is
    /// rebuilt and the search runs against it. Never fails.
    pub fn resolve(&self, date: DateKey, slot: u32, history: &HistoryLog) -> Selection<T> {
        if let Some(selection) = self.from_history(date, slot, history) {
            return selection;
        }
        let window = RecentWindowBuilder::new(self, history).build(date, slot);
        let selection = self.materialize(date, slot, self.pick(date, slot, &window));
        self.count_fallback(&selection);

        tracing::debug!(
            kind = T::KIND,
            date = %date,
            slot,
            window_len = window.len(),
            stage = ?selection.stage,
            "Resolved selection"
        );
        selection
    }

    /// Selections for `days` consecutive dates starting at `start`
    ///
    /// Each day's window sees the days previewed before it, so the batch is
    /// exactly what resolving the dates one after another would record.
    pub fn preview(&self, start: DateKey, days: u32, slot: u32, history: &HistoryLog) -> Vec<Selection<T>> {
        let mut builder = RecentWindowBuilder::new(self, history);
        let mut selections = Vec::with_capacity(days as usize);

        for offset in 0..i64::from(days) {
            let date = start.plus_days(offset);
            let selection = match self.from_history(date, slot, history) {
                Some(selection) => selection,
                None => {
                    let window = builder.build(date, slot);
                    let selection = self.materialize(date, slot, self.pick(date, slot, &window));
                    self.count_fallback(&selection);
                    selection
                }
            };
            builder.remember(date, slot, selection.identities.clone());
            selections.push(selection);
        }

        selections
    }
}
