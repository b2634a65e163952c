use serde::{Deserialize, Serialize};

use crate::selector::{DateKey, FallbackStage, PoolItem, Selection};

pub mod trivia;
pub mod word;

pub use trivia::TriviaQuestion;
pub use word::Word;

/// A FlickWord answer returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyWord {
    pub date: DateKey,
    pub slot: u32,
    pub word: String,
    pub stage: FallbackStage,
}

impl From<&Selection<Word>> for DailyWord {
    fn from(selection: &Selection<Word>) -> Self {
        Self {
            date: selection.date,
            slot: selection.slot,
            word: selection
                .items
                .first()
                .map(|word| word.as_str().to_string())
                .unwrap_or_default(),
            stage: selection.stage,
        }
    }
}

/// A question as served to the client, tagged with its history identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionView {
    pub id: String,
    #[serde(flatten)]
    pub question: TriviaQuestion,
}

/// One trivia game (a batch of questions) for a date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriviaGame {
    pub date: DateKey,
    pub game: u32,
    pub questions: Vec<QuestionView>,
    pub stage: FallbackStage,
}

impl From<&Selection<TriviaQuestion>> for TriviaGame {
    fn from(selection: &Selection<TriviaQuestion>) -> Self {
        Self {
            date: selection.date,
            game: selection.slot,
            questions: selection
                .items
                .iter()
                .map(|question| QuestionView {
                    id: question.identity(),
                    question: question.clone(),
                })
                .collect(),
            stage: selection.stage,
        }
    }
}

/// Outcome of recording a played selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordOutcome {
    pub date: DateKey,
    pub slot: u32,
    pub recorded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_word_from_selection() {
        let selection = Selection {
            date: DateKey::from_ymd(2024, 1, 2).unwrap(),
            slot: 1,
            items: vec![Word::new("Crane")],
            identities: vec!["crane".to_string()],
            stage: FallbackStage::Relaxed,
            from_history: false,
        };
        let json = serde_json::to_value(DailyWord::from(&selection)).unwrap();
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["word"], "crane");
        assert_eq!(json["stage"], "relaxed");
    }

    #[test]
    fn test_trivia_game_flattens_questions() {
        let question = TriviaQuestion {
            question: "Which film features Arrakis?".to_string(),
            choices: vec!["Dune".to_string(), "Alien".to_string()],
            answer: 0,
            category: Some("film".to_string()),
        };
        let selection = Selection {
            date: DateKey::from_ymd(2024, 1, 2).unwrap(),
            slot: 2,
            items: vec![question.clone()],
            identities: vec![question.identity()],
            stage: FallbackStage::Strict,
            from_history: false,
        };

        let json = serde_json::to_value(TriviaGame::from(&selection)).unwrap();
        assert_eq!(json["game"], 2);
        assert_eq!(json["questions"][0]["id"], question.identity());
        assert_eq!(json["questions"][0]["question"], "Which film features Arrakis?");
        assert_eq!(json["questions"][0]["answer"], 0);
    }
}
