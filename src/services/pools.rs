use crate::{
    config::Config,
    models::{
        trivia::{build_trivia_pool, TriviaQuestion},
        word::{build_word_pool, parse_word_list, Word},
    },
    selector::{CandidatePool, PoolError, PoolItem},
};

const BUILTIN_WORDS: &str = include_str!("../../data/words.txt");
const BUILTIN_TRIVIA: &str = include_str!("../../data/trivia.json");

/// Reads a configured pool file, or returns the built-in text when no path is set
async fn read_source<T: PoolItem>(path: Option<&str>, builtin: &'static str) -> Result<String, PoolError> {
    match path {
        Some(path) => {
            tracing::info!(kind = T::KIND, path = %path, "Loading pool from file");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| PoolError::Unreadable {
                    kind: T::KIND,
                    reason: format!("{}: {}", path, e),
                })
        }
        None => Ok(builtin.to_string()),
    }
}

/// Answer pool for FlickWord
pub async fn load_word_pool(config: &Config) -> Result<CandidatePool<Word>, PoolError> {
    let text = read_source::<Word>(config.word_list_path.as_deref(), BUILTIN_WORDS).await?;
    build_word_pool(parse_word_list(&text), &config.word_shape())
}

/// Question bank for Trivia
pub async fn load_trivia_pool(config: &Config) -> Result<CandidatePool<TriviaQuestion>, PoolError> {
    let text = read_source::<TriviaQuestion>(config.trivia_bank_path.as_deref(), BUILTIN_TRIVIA).await?;
    let pool = build_trivia_pool(&text)?;
    if (pool.len() as u32) < config.trivia_questions_per_game {
        tracing::warn!(
            pool_size = pool.len(),
            per_game = config.trivia_questions_per_game,
            "Question bank is smaller than one game, questions will repeat within a game"
        );
    }
    Ok(pool)
}
