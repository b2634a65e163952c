use serde::Deserialize;

use crate::models::word::WordShape;
use crate::selector::seed::{DEFAULT_DAY_PRIME, DEFAULT_SLOT_PRIME};
use crate::selector::{DateKey, SeedParams, SelectorConfig};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Redis connection URL; history is kept in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Newline-separated answer list; the built-in list is used when unset
    #[serde(default)]
    pub word_list_path: Option<String>,

    /// JSON question bank; the built-in bank is used when unset
    #[serde(default)]
    pub trivia_bank_path: Option<String>,

    #[serde(default = "default_word_length")]
    pub word_length: usize,

    /// Words never served as answers
    #[serde(default)]
    pub excluded_words: Vec<String>,

    /// Trailing days a word may not repeat within
    #[serde(default = "default_word_window_days")]
    pub word_window_days: u32,

    /// Trailing days of played games a question may not repeat within; unlimited when unset
    #[serde(default)]
    pub trivia_window_days: Option<u32>,

    #[serde(default = "default_trivia_questions_per_game")]
    pub trivia_questions_per_game: u32,

    #[serde(default = "DateKey::default_epoch")]
    pub seed_epoch: DateKey,

    #[serde(default = "default_day_prime")]
    pub seed_day_prime: u64,

    #[serde(default = "default_slot_prime")]
    pub seed_slot_prime: u64,

    /// Record the word of the day as soon as it is resolved
    #[serde(default = "default_true")]
    pub record_word_on_resolve: bool,

    /// Mount the history reset routes
    #[serde(default)]
    pub enable_debug_routes: bool,

    /// Longest preview a single request may ask for
    #[serde(default = "default_max_preview_days")]
    pub max_preview_days: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_word_length() -> usize {
    5
}

fn default_word_window_days() -> u32 {
    14
}

fn default_trivia_questions_per_game() -> u32 {
    5
}

fn default_day_prime() -> u64 {
    DEFAULT_DAY_PRIME
}

fn default_slot_prime() -> u64 {
    DEFAULT_SLOT_PRIME
}

fn default_true() -> bool {
    true
}

fn default_max_preview_days() -> u32 {
    31
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn seed_params(&self) -> SeedParams {
        SeedParams {
            epoch: self.seed_epoch,
            day_prime: self.seed_day_prime,
            slot_prime: self.seed_slot_prime,
        }
    }

    pub fn word_shape(&self) -> WordShape {
        WordShape::new(self.word_length, &self.excluded_words)
    }

    pub fn word_selector(&self) -> SelectorConfig {
        SelectorConfig::words(self.word_window_days).with_seed(self.seed_params())
    }

    pub fn trivia_selector(&self) -> SelectorConfig {
        SelectorConfig::trivia(self.trivia_questions_per_game, self.trivia_window_days)
            .with_seed(self.seed_params())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redis_url: None,
            word_list_path: None,
            trivia_bank_path: None,
            word_length: default_word_length(),
            excluded_words: Vec::new(),
            word_window_days: default_word_window_days(),
            trivia_window_days: None,
            trivia_questions_per_game: default_trivia_questions_per_game(),
            seed_epoch: DateKey::default_epoch(),
            seed_day_prime: default_day_prime(),
            seed_slot_prime: default_slot_prime(),
            record_word_on_resolve: default_true(),
            enable_debug_routes: false,
            max_preview_days: default_max_preview_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::WindowPolicy;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.word_window_days, 14);
        assert_eq!(config.trivia_questions_per_game, 5);
        assert_eq!(config.seed_params(), SeedParams::default());
        assert!(config.record_word_on_resolve);
        assert!(!config.enable_debug_routes);
        assert_eq!(config.max_preview_days, 31);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config: Config = envy::from_iter(vars(&[
            ("PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("EXCLUDED_WORDS", "crane,Slate"),
            ("TRIVIA_WINDOW_DAYS", "30"),
            ("SEED_EPOCH", "2021-06-19"),
            ("ENABLE_DEBUG_ROUTES", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert!(config.word_shape().excluded.contains("slate"));
        assert_eq!(config.seed_epoch, DateKey::from_ymd(2021, 6, 19).unwrap());
        assert_eq!(
            config.trivia_selector().window,
            WindowPolicy::Recorded { days: Some(30) }
        );
        assert!(config.enable_debug_routes);
    }

    #[test]
    fn test_bad_epoch_is_rejected() {
        let result: Result<Config, _> = envy::from_iter(vars(&[("SEED_EPOCH", "yesterday")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_selector_configs_carry_seed() {
        let config = Config {
            seed_day_prime: 31,
            ..Config::default()
        };
        assert_eq!(config.word_selector().seed.day_prime, 31);
        assert_eq!(config.trivia_selector().items_per_slot, 5);
    }
}
