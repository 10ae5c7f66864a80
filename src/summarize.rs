//! Abstractive summary of a list of texts with deterministic fallbacks.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::segment::split_sentences;
use crate::tagger::is_stopword;

/// Below this many whitespace tokens the text is returned as-is
pub const MIN_TOKENS_TO_SUMMARIZE: usize = 5;
/// Characters kept by the failure fallback before the ellipsis
pub const FALLBACK_CHARS: usize = 200;

/// Requested output length in tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl LengthBounds {
    /// Per-aspect summaries
    pub const ASPECT: LengthBounds = LengthBounds { min_tokens: 10, max_tokens: 80 };
    /// Whole-venue summary over the aspect summaries
    pub const RESTAURANT: LengthBounds = LengthBounds { min_tokens: 20, max_tokens: 80 };
}

#[async_trait]
pub trait SummaryService: Send + Sync {
    async fn summarize(&self, text: &str, min_tokens: usize, max_tokens: usize)
        -> Result<String, ServiceError>;
}

pub struct Summarizer {
    service: Box<dyn SummaryService>,
    max_input_chars: usize,
}

impl Summarizer {
    pub fn new(service: Box<dyn SummaryService>, max_input_chars: usize) -> Self {
        Self {
            service,
            max_input_chars,
        }
    }

    /// Join with single spaces, cut to `max_input_chars`, then summarize.
    /// Short inputs come back unchanged; service failures fall back to a prefix.
    pub async fn summarize<S: AsRef<str>>(&self, texts: &[S], bounds: LengthBounds) -> String {
        let joined = texts.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(" ");
        let text: String = joined.chars().take(self.max_input_chars).collect();

        if text.split_whitespace().count() < MIN_TOKENS_TO_SUMMARIZE {
            return text;
        }

        match self
            .service
            .summarize(&text, bounds.min_tokens, bounds.max_tokens)
            .await
        {
            Ok(summary) => {
                debug!("[summary] {} chars -> {} chars", text.len(), summary.len());
                summary
            }
            Err(e) => {
                warn!("⚠️ [summary] service failed: {}; using text prefix", e);
                fallback_summary(&text)
            }
        }
    }
}

/// First 200 characters plus `...` when longer, else the text itself
pub fn fallback_summary(text: &str) -> String {
    if text.chars().count() > FALLBACK_CHARS {
        let head: String = text.chars().take(FALLBACK_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// ============================================================================
// HTTP service
// ============================================================================

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryResponse {
    Single(SummaryItem),
    List(Vec<SummaryItem>),
}

/// Calls a summarization sidecar with greedy decoding (`do_sample: false`).
pub struct HttpSummaryService {
    client: reqwest::Client,
    url: String,
}

impl HttpSummaryService {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SummaryService for HttpSummaryService {
    async fn summarize(
        &self,
        text: &str,
        min_tokens: usize,
        max_tokens: usize,
    ) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "text": text,
                "min_length": min_tokens,
                "max_length": max_tokens,
                "do_sample": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: SummaryResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))?;

        let summary = match parsed {
            SummaryResponse::Single(item) => Some(item.summary_text),
            SummaryResponse::List(items) => items.into_iter().next().map(|i| i.summary_text),
        };

        summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::Malformed("empty summary".to_string()))
    }
}

// ============================================================================
// Offline extractive service
// ============================================================================

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}0-9']+").unwrap());

/// Picks the sentences with the highest average word frequency and keeps them in
/// their original order. Only sentences that still fit in `max_tokens` are taken;
/// when none fits, the best one is cut to `max_tokens` words.
#[derive(Debug, Clone, Default)]
pub struct ExtractiveSummaryService;

impl ExtractiveSummaryService {
    pub fn summarize_text(text: &str, max_tokens: usize) -> String {
        let sentences = split_sentences(text);

        let content_words = |s: &str| -> Vec<String> {
            WORD_PATTERN
                .find_iter(&s.to_lowercase())
                .map(|w| w.as_str().to_string())
                .filter(|w| w.len() > 2 && !is_stopword(w))
                .collect()
        };

        let mut freq: HashMap<String, usize> = HashMap::new();
        for sentence in &sentences {
            for word in content_words(sentence) {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let words = content_words(s);
                let score = if words.is_empty() {
                    0.0
                } else {
                    words.iter().map(|w| freq[w] as f64).sum::<f64>() / words.len() as f64
                };
                (idx, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let top = ranked.first().map(|(idx, _)| *idx);
        let mut chosen: HashSet<usize> = HashSet::new();
        let mut used = 0usize;
        for (idx, _) in ranked {
            let len = sentences[idx].split_whitespace().count();
            if used + len <= max_tokens {
                chosen.insert(idx);
                used += len;
            }
        }

        if chosen.is_empty() {
            return top
                .map(|idx| {
                    sentences[idx]
                        .split_whitespace()
                        .take(max_tokens)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
        }

        sentences
            .iter()
            .enumerate()
            .filter(|(idx, _)| chosen.contains(idx))
            .map(|(_, s)| *s)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SummaryService for ExtractiveSummaryService {
    async fn summarize(
        &self,
        text: &str,
        _min_tokens: usize,
        max_tokens: usize,
    ) -> Result<String, ServiceError> {
        let summary = Self::summarize_text(text, max_tokens);
        if summary.is_empty() {
            return Err(ServiceError::Malformed("nothing to extract".to_string()));
        }
        Ok(summary)
    }
}
