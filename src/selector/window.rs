use std::collections::BTreeMap;

use super::{DailySelector, DateKey, HistoryLog, PoolItem, WindowPolicy, MAX_WINDOW_DAYS};

/// Rebuilds the recent window a selection is checked against
///
/// For progressive windows every trailing day comes from, in order of
/// preference: the history log, a selection remembered earlier in the same
/// batch, or a fresh search seeded by that day and the part of the window
/// already built. Fresh results are not memoized, so a batch sees exactly
/// what resolving and recording its days one by one would see.
pub struct RecentWindowBuilder<'a, T> {
    selector: &'a DailySelector<T>,
    history: &'a HistoryLog,
    resolved: BTreeMap<(DateKey, u32), Vec<String>>,
}

impl<'a, T: PoolItem> RecentWindowBuilder<'a, T> {
    pub fn new(selector: &'a DailySelector<T>, history: &'a HistoryLog) -> Self {
        Self {
            selector,
            history,
            resolved: BTreeMap::new(),
        }
    }

    /// Marks (date, slot) as resolved for the rest of this batch
    pub fn remember(&mut self, date: DateKey, slot: u32, identities: Vec<String>) {
        self.resolved.insert((date, slot), identities);
    }

    /// Window of identities preceding (date, slot), oldest first
    pub fn build(&mut self, date: DateKey, slot: u32) -> Vec<String> {
        match self.selector.config().window {
            WindowPolicy::Progressive { days } => self.progressive(date, slot, days),
            WindowPolicy::Recorded { days } => self.recorded(date, slot, days),
        }
    }

    fn known(&self, date: DateKey, slot: u32) -> Option<Vec<String>> {
        self.history
            .get_slot(date, slot)
            .filter(|recorded| !recorded.is_empty())
            .map(<[String]>::to_vec)
            .or_else(|| self.resolved.get(&(date, slot)).cloned())
    }

    fn progressive(&self, date: DateKey, slot: u32, days: u32) -> Vec<String> {
        if days > MAX_WINDOW_DAYS {
            tracing::warn!(days, max = MAX_WINDOW_DAYS, "Window size clamped");
        }
        let days = i64::from(days.min(MAX_WINDOW_DAYS));
        let identities = self.selector.pool().identities();
        let mut window = Vec::new();

        for offset in (1..=days).rev() {
            let day = date.minus_days(offset);
            match self.known(day, slot) {
                Some(known) => window.extend(known),
                None => {
                    let pick = self.selector.pick(day, slot, &window);
                    window.extend(pick.indices.iter().map(|&index| identities[index].clone()));
                }
            }
        }

        window
    }

    fn recorded(&self, date: DateKey, slot: u32, days: Option<u32>) -> Vec<String> {
        let days = days.map(|days| days.min(MAX_WINDOW_DAYS));
        let earliest = days.map(|days| date.minus_days(i64::from(days)));
        let mut window = self.history.recorded_before(date, slot, days);

        for ((day, day_slot), identities) in &self.resolved {
            let before = (*day, *day_slot) < (date, slot);
            let in_range = earliest.map_or(true, |earliest| *day >= earliest);
            if before && in_range && self.history.get_slot(*day, *day_slot).is_none() {
                window.extend(identities.iter().cloned());
            }
        }

        window
    }
}
