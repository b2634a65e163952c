use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DateKey;

/// One resolved (date, slot) and the identities chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub date: DateKey,
    pub slot: u32,
    pub identities: Vec<String>,
}

/// Everything recorded for a single day, keyed by slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DayRecord {
    date: DateKey,
    slots: BTreeMap<u32, Vec<String>>,
}

/// Summary of a history log for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_records: usize,
    pub total_items: usize,
    pub oldest_date: Option<DateKey>,
    pub newest_date: Option<DateKey>,
}

/// Append-only log of past selections, ordered by date
///
/// Serializes as a JSON array of per-day records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    days: Vec<DayRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a stored blob, merging out-of-order or duplicated day entries
    pub fn from_json(blob: &str) -> Result<Self, serde_json::Error> {
        let parsed: HistoryLog = serde_json::from_str(blob)?;
        let mut log = HistoryLog::new();
        for day in parsed.days {
            for (slot, identities) in day.slots {
                log.append(SelectionRecord {
                    date: day.date,
                    slot,
                    identities,
                });
            }
        }
        Ok(log)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn position(&self, date: DateKey) -> Result<usize, usize> {
        self.days.binary_search_by(|day| day.date.cmp(&date))
    }

    /// All records for `date`, or `None` if the day was never recorded
    pub fn get(&self, date: DateKey) -> Option<Vec<SelectionRecord>> {
        let day = &self.days[self.position(date).ok()?];
        Some(
            day.slots
                .iter()
                .map(|(slot, identities)| SelectionRecord {
                    date,
                    slot: *slot,
                    identities: identities.clone(),
                })
                .collect(),
        )
    }

    pub fn get_slot(&self, date: DateKey, slot: u32) -> Option<&[String]> {
        let day = &self.days[self.position(date).ok()?];
        day.slots.get(&slot).map(Vec::as_slice)
    }

    /// Stores a record; a second append for the same (date, slot) replaces the first
    ///
    /// Returns `true` when the stored content changed.
    pub fn append(&mut self, record: SelectionRecord) -> bool {
        let identities: Vec<String> = record.identities.iter().map(|id| id.to_lowercase()).collect();
        match self.position(record.date) {
            Ok(pos) => {
                let slots = &mut self.days[pos].slots;
                if slots.get(&record.slot) == Some(&identities) {
                    return false;
                }
                if slots.contains_key(&record.slot) {
                    tracing::warn!(
                        date = %record.date,
                        slot = record.slot,
                        "Overwriting existing history record"
                    );
                }
                slots.insert(record.slot, identities);
            }
            Err(pos) => {
                let mut slots = BTreeMap::new();
                slots.insert(record.slot, identities);
                self.days.insert(
                    pos,
                    DayRecord {
                        date: record.date,
                        slots,
                    },
                );
            }
        }
        true
    }

    /// Wipes every record
    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Identities recorded before (`date`, `slot`), oldest first
    ///
    /// Covers every slot of earlier days (limited to the trailing `days_back`
    /// days when given) followed by lower slots of `date` itself.
    pub fn recorded_before(&self, date: DateKey, slot: u32, days_back: Option<u32>) -> Vec<String> {
        let earliest = days_back.map(|days| date.minus_days(i64::from(days)));
        let mut identities = Vec::new();

        for day in &self.days {
            if day.date > date || earliest.is_some_and(|earliest| day.date < earliest) {
                continue;
            }
            for (day_slot, ids) in &day.slots {
                if day.date == date && *day_slot >= slot {
                    break;
                }
                identities.extend(ids.iter().cloned());
            }
        }

        identities
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_records: self.days.iter().map(|day| day.slots.len()).sum(),
            total_items: self
                .days
                .iter()
                .flat_map(|day| day.slots.values())
                .map(Vec::len)
                .sum(),
            oldest_date: self.days.first().map(|day| day.date),
            newest_date: self.days.last().map(|day| day.date),
        }
    }
}
