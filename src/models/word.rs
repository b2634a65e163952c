use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::selector::{CandidatePool, PoolError, PoolItem};

/// A FlickWord answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PoolItem for Word {
    const KIND: &'static str = "word";

    fn identity(&self) -> String {
        self.0.clone()
    }

    fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// Shape every answer must have
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordShape {
    pub length: usize,
    pub excluded: HashSet<String>,
}

impl WordShape {
    pub fn new(length: usize, excluded: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            length,
            excluded: excluded
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, word: &Word) -> bool {
        word.is_well_formed() && word.0.len() == self.length && !self.excluded.contains(&word.0)
    }
}

impl Default for WordShape {
    fn default() -> Self {
        Self::new(5, Vec::<String>::new())
    }
}

/// Parses a newline-separated word list; blank lines and `#` comments are skipped
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Builds the answer pool, keeping only words of the configured shape
pub fn build_word_pool(
    words: impl IntoIterator<Item = impl AsRef<str>>,
    shape: &WordShape,
) -> Result<CandidatePool<Word>, PoolError> {
    let words: Vec<Word> = words.into_iter().map(Word::new).collect();
    if words.is_empty() {
        return Err(PoolError::Empty { kind: Word::KIND });
    }

    let total = words.len();
    let kept: Vec<Word> = words.into_iter().filter(|w| shape.matches(w)).collect();
    if kept.is_empty() {
        return Err(PoolError::NoValidItems {
            kind: Word::KIND,
            rejected: total,
        });
    }
    if kept.len() < total {
        tracing::debug!(
            rejected = total - kept.len(),
            length = shape.length,
            "Dropped words that do not match the answer shape"
        );
    }

    CandidatePool::new(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_is_normalized() {
        assert_eq!(Word::new("  Crane ").as_str(), "crane");
        assert_eq!(Word::new("CRANE").identity(), "crane");
    }

    #[test]
    fn test_shape_filters_length_letters_and_exclusions() {
        let shape = WordShape::new(5, ["Blade"]);
        let pool = build_word_pool(["crane", "cranes", "cr4ne", "blade", "eagle", "Eagle"], &shape).unwrap();
        assert_eq!(pool.identities(), &["crane".to_string(), "eagle".to_string()]);
    }

    #[test]
    fn test_empty_list_is_malformed() {
        let err = build_word_pool(Vec::<String>::new(), &WordShape::default()).unwrap_err();
        assert_eq!(err, PoolError::Empty { kind: "word" });
    }

    #[test]
    fn test_list_without_valid_words_is_malformed() {
        let err = build_word_pool(["toolong", "abc"], &WordShape::default()).unwrap_err();
        assert_eq!(err, PoolError::NoValidItems { kind: "word", rejected: 2 });
    }

    #[test]
    fn test_parse_word_list_skips_comments() {
        let words = parse_word_list("# header\ncrane\n\n  eagle  \n#skip\n");
        assert_eq!(words, vec!["crane", "eagle"]);
    }

    #[test]
    fn test_builtin_list_is_well_formed() {
        let words = parse_word_list(include_str!("../../data/words.txt"));
        let pool = build_word_pool(&words, &WordShape::default()).unwrap();
        assert_eq!(pool.len(), words.len());
    }
}
