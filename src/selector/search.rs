use serde::{Deserialize, Serialize};

use super::constraints::{accepts, compute_problematic_sets, RuleSet};
use super::seed::{seed_index, SeedParams};
use super::DateKey;

/// Search pass that produced a selection
///
/// Ordered from most to least strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStage {
    /// Every configured rule satisfied
    Strict,
    /// Anti-repeat dropped, pattern rules kept
    Relaxed,
    /// Seeded base item taken unconditionally
    Absolute,
}

impl FallbackStage {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, FallbackStage::Strict)
    }
}

/// Position of the selected item in the pool and the stage that chose it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub index: usize,
    pub base_index: usize,
    pub stage: FallbackStage,
}

/// Walks the pool from the seeded base index until a candidate passes
///
/// `identities` are the pool's identities in pool order and must be non-empty.
/// Always returns: strict pass, then relaxed pass, then the base item itself.
pub fn search(
    date: DateKey,
    slot: u32,
    identities: &[String],
    window: &[String],
    rules: RuleSet,
    seed: &SeedParams,
) -> SearchOutcome {
    let pool_size = identities.len();
    let base_index = seed_index(date, slot, pool_size, seed);
    let state = compute_problematic_sets(window);

    let walk = |rules: RuleSet| {
        (0..pool_size)
            .map(|attempt| (base_index + attempt) % pool_size)
            .find(|&index| accepts(&identities[index], window, &state, rules))
    };

    if let Some(index) = walk(rules) {
        return SearchOutcome {
            index,
            base_index,
            stage: FallbackStage::Strict,
        };
    }

    if rules.no_repeat {
        if let Some(index) = walk(rules.relaxed()) {
            return SearchOutcome {
                index,
                base_index,
                stage: FallbackStage::Relaxed,
            };
        }
    }

    SearchOutcome {
        index: base_index,
        base_index,
        stage: FallbackStage::Absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn day(offset: i64) -> DateKey {
        DateKey::from_ymd(2024, 5, 1).unwrap().plus_days(offset)
    }

    #[test]
    fn test_empty_window_returns_base_index() {
        let words = pool(&["apple", "bread", "crane", "dwell", "eagle"]);
        let seed = SeedParams::default();
        let outcome = search(day(0), 1, &words, &[], RuleSet::full(), &seed);
        assert_eq!(outcome.index, seed_index(day(0), 1, words.len(), &seed));
        assert_eq!(outcome.stage, FallbackStage::Strict);
    }

    #[test]
    fn test_skips_rejected_candidates_in_pool_order() {
        let words = pool(&["apple", "bread", "crane", "dwell", "eagle"]);
        let seed = SeedParams::default();
        let base = seed_index(day(3), 1, words.len(), &seed);
        // reject the base word by putting it in the window
        let window = vec![words[base].clone()];
        let outcome = search(day(3), 1, &words, &window, RuleSet::full(), &seed);
        assert_eq!(outcome.stage, FallbackStage::Strict);
        assert_eq!(outcome.index, (base + 1) % words.len());
    }

    #[test]
    fn test_relaxed_stage_when_every_word_was_used() {
        let words = pool(&["apple", "bread", "crane"]);
        let window = pool(&["bread", "crane", "apple"]);
        let outcome = search(day(0), 1, &words, &window, RuleSet::full(), &SeedParams::default());
        assert_eq!(outcome.stage, FallbackStage::Relaxed);
        assert_ne!(words[outcome.index].chars().next(), Some('a'));
    }

    #[test]
    fn test_absolute_stage_returns_base_item() {
        // every word starts with the newest entry's letter
        let words = pool(&["cabin", "cider", "crane"]);
        let window = pool(&["civic"]);
        let seed = SeedParams::default();
        let outcome = search(day(9), 2, &words, &window, RuleSet::full(), &seed);
        assert_eq!(outcome.stage, FallbackStage::Absolute);
        assert_eq!(outcome.index, seed_index(day(9), 2, words.len(), &seed));
        assert!(outcome.stage.is_fallback());
    }

    #[test]
    fn test_no_repeat_only_relaxes_to_base_item() {
        let ids = pool(&["aa11", "bb22"]);
        let window = pool(&["aa11", "bb22"]);
        let outcome = search(day(0), 0, &ids, &window, RuleSet::no_repeat_only(), &SeedParams::default());
        assert_eq!(outcome.stage, FallbackStage::Relaxed);
        assert_eq!(outcome.index, outcome.base_index);
    }

    #[test]
    fn test_pattern_only_rules_skip_relaxed_stage() {
        let rules = RuleSet {
            no_repeat: false,
            ..RuleSet::full()
        };
        let words = pool(&["cabin", "cider"]);
        let window = pool(&["civic"]);
        let outcome = search(day(0), 1, &words, &window, rules, &SeedParams::default());
        assert_eq!(outcome.stage, FallbackStage::Absolute);
    }

    #[test]
    fn test_search_is_deterministic() {
        let words = pool(&["apple", "bread", "crane", "dwell", "eagle", "flame", "grape"]);
        let window = pool(&["crane", "dwell"]);
        let seed = SeedParams::default();
        let first = search(day(17), 1, &words, &window, RuleSet::full(), &seed);
        let second = search(day(17), 1, &words, &window, RuleSet::full(), &seed);
        assert_eq!(first, second);
    }
}
