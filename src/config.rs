//! Runtime settings read from the environment (optionally seeded from `.env`).

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VOCAB_PATH: &str = "data/food.csv";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Sentiment service endpoint; `None` selects the built-in lexicon classifier
    pub sentiment_url: Option<String>,
    /// Summarization service endpoint; `None` selects the built-in extractive summarizer
    pub summary_url: Option<String>,
    pub service_timeout: Duration,
    pub vocab_path: PathBuf,
    pub top_k: usize,
    pub max_input_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sentiment_url: None,
            summary_url: None,
            service_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            vocab_path: PathBuf::from(DEFAULT_VOCAB_PATH),
            top_k: DEFAULT_TOP_K,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable or zero numbers keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs: u64 = non_empty("SERVICE_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            sentiment_url: non_empty("SENTIMENT_SERVICE_URL"),
            summary_url: non_empty("SUMMARY_SERVICE_URL"),
            service_timeout: Duration::from_secs(timeout_secs),
            vocab_path: non_empty("FOOD_VOCAB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.vocab_path),
            top_k: non_empty("KEYWORD_TOP_K")
                .and_then(|s| s.parse().ok())
                .filter(|k| *k > 0)
                .unwrap_or(DEFAULT_TOP_K),
            max_input_chars: non_empty("SUMMARY_MAX_INPUT_CHARS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_INPUT_CHARS),
        }
    }
}
