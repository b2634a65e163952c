use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Length of an increasing run that marks a pattern to break
const RUN_LENGTH: usize = 3;

/// Toggles for the acceptance rules, applied in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Reject anything already in the recent window
    pub no_repeat: bool,
    /// Reject the newest entry's first letter
    pub no_first_letter_repeat: bool,
    /// Reject candidates extending a strictly increasing run of items
    pub break_item_runs: bool,
    /// Reject candidates extending a strictly increasing run of first letters
    pub break_letter_runs: bool,
}

impl RuleSet {
    /// Every rule enabled; used for word puzzles
    pub const fn full() -> Self {
        Self {
            no_repeat: true,
            no_first_letter_repeat: true,
            break_item_runs: true,
            break_letter_runs: true,
        }
    }

    /// Only the anti-repeat rule; used for pools whose identities are opaque hashes
    pub const fn no_repeat_only() -> Self {
        Self {
            no_repeat: true,
            no_first_letter_repeat: false,
            break_item_runs: false,
            break_letter_runs: false,
        }
    }

    /// The same rules with anti-repeat switched off
    pub const fn relaxed(self) -> Self {
        Self {
            no_repeat: false,
            ..self
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::full()
    }
}

/// Per-search view of the recent window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptanceState {
    pub problematic_first_letters: HashSet<char>,
    pub problematic_prior_items: HashSet<String>,
    recent: HashSet<String>,
    newest_first_letter: Option<char>,
    letter_run_ceiling: Option<char>,
}

fn first_letter(identity: &str) -> Option<char> {
    identity.chars().next().map(|c| c.to_ascii_lowercase())
}

fn strictly_increasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

/// Derives the letters and prior items that make a candidate problematic
///
/// `window` holds identities ordered oldest to newest.
pub fn compute_problematic_sets(window: &[String]) -> AcceptanceState {
    let mut state = AcceptanceState {
        recent: window.iter().map(|id| id.to_lowercase()).collect(),
        ..AcceptanceState::default()
    };

    if let Some(letter) = window.last().and_then(|id| first_letter(id)) {
        state.newest_first_letter = Some(letter);
        state.problematic_first_letters.insert(letter);
    }

    if window.len() >= RUN_LENGTH {
        let tail: Vec<String> = window[window.len() - RUN_LENGTH..]
            .iter()
            .map(|id| id.to_lowercase())
            .collect();

        if strictly_increasing(&tail) {
            if let Some(newest) = tail.last() {
                state.problematic_prior_items.insert(newest.clone());
            }
        }

        let letters: Option<Vec<char>> = tail.iter().map(|id| first_letter(id)).collect();
        if let Some(letters) = letters {
            if strictly_increasing(&letters) {
                let ceiling = letters[RUN_LENGTH - 1];
                state.letter_run_ceiling = Some(ceiling);
                state
                    .problematic_first_letters
                    .extend(('a'..='z').filter(|c| *c > ceiling));
            }
        }
    }

    state
}

/// Decides whether `candidate` may be selected after `window`
///
/// `state` must come from [`compute_problematic_sets`] over the same window;
/// `window` itself is only consulted for its length.
pub fn accepts(candidate: &str, window: &[String], state: &AcceptanceState, rules: RuleSet) -> bool {
    if window.is_empty() {
        return true;
    }
    let candidate = candidate.to_lowercase();
    let letter = first_letter(&candidate);

    if rules.no_repeat && state.recent.contains(&candidate) {
        return false;
    }

    if rules.no_first_letter_repeat && letter.is_some() && letter == state.newest_first_letter {
        return false;
    }

    if rules.break_item_runs
        && state
            .problematic_prior_items
            .iter()
            .any(|prior| candidate.as_str() > prior.as_str())
    {
        return false;
    }

    if rules.break_letter_runs {
        if let (Some(letter), Some(ceiling)) = (letter, state.letter_run_ceiling) {
            if letter > ceiling {
                return false;
            }
        }
    }

    true
}
