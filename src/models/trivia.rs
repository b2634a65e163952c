use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::selector::{CandidatePool, PoolError, PoolItem};

/// Hex characters kept from the question hash
const IDENTITY_LEN: usize = 16;

/// A multiple-choice trivia question from the question bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub choices: Vec<String>,
    /// Index of the correct entry in `choices`
    pub answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TriviaQuestion {
    /// Stable identity derived from the question text
    ///
    /// Whitespace and case differences do not change the identity, so a bank
    /// edit that only reformats a question keeps its play history.
    pub fn question_id(text: &str) -> String {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        hasher
            .finalize()
            .iter()
            .take(IDENTITY_LEN / 2)
            .map(|byte| format!("{:02x}", byte))
            .collect()
    }
}

impl PoolItem for TriviaQuestion {
    const KIND: &'static str = "trivia";

    fn identity(&self) -> String {
        Self::question_id(&self.question)
    }

    fn is_well_formed(&self) -> bool {
        !self.question.trim().is_empty() && self.choices.len() >= 2 && self.answer < self.choices.len()
    }
}

/// Parses a JSON array of questions into a pool
pub fn build_trivia_pool(json: &str) -> Result<CandidatePool<TriviaQuestion>, PoolError> {
    let questions: Vec<TriviaQuestion> =
        serde_json::from_str(json).map_err(|e| PoolError::Unreadable {
            kind: TriviaQuestion::KIND,
            reason: e.to_string(),
        })?;
    CandidatePool::new(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: usize) -> TriviaQuestion {
        TriviaQuestion {
            question: text.to_string(),
            choices: vec!["A".to_string(), "B".to_string()],
            answer,
            category: None,
        }
    }

    #[test]
    fn test_question_id_ignores_case_and_spacing() {
        let a = TriviaQuestion::question_id("Who directed  Jaws?");
        let b = TriviaQuestion::question_id(" who directed jaws? ");
        assert_eq!(a, b);
        assert_eq!(a.len(), IDENTITY_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_question_id_differs_between_questions() {
        assert_ne!(
            TriviaQuestion::question_id("Who directed Jaws?"),
            TriviaQuestion::question_id("Who directed Alien?")
        );
    }

    #[test]
    fn test_malformed_questions_are_dropped() {
        let pool = CandidatePool::new(vec![
            question("Valid?", 1),
            question("Answer out of range?", 2),
            question("   ", 0),
        ])
        .unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_build_trivia_pool_from_json() {
        let json = r#"[
            {"question": "Which film features Arrakis?", "choices": ["Dune", "Alien"], "answer": 0},
            {"question": "Which show features the Upside Down?", "choices": ["Dark", "Stranger Things"], "answer": 1, "category": "tv"}
        ]"#;
        let pool = build_trivia_pool(json).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(1).unwrap().category.as_deref(), Some("tv"));
    }

    #[test]
    fn test_build_trivia_pool_rejects_bad_json() {
        assert!(build_trivia_pool("{").is_err());
        assert_eq!(
            build_trivia_pool("[]").unwrap_err(),
            PoolError::Empty { kind: "trivia" }
        );
    }

    #[test]
    fn test_builtin_bank_is_well_formed() {
        let pool = build_trivia_pool(include_str!("../../data/trivia.json")).unwrap();
        assert!(pool.len() >= 20);
    }
}
