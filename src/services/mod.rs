pub mod daily;
pub mod pools;

pub use daily::{DailyService, DailyStats};
pub use pools::{load_trivia_pool, load_word_pool};
