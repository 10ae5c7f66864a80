//! Sentence sentiment on a 1–5 scale.
//!
//! Classification is delegated to a 3-class sentiment service. The scorer folds the
//! winning class and its probability into a single number and never fails: blank
//! input and any service error both come back as neutral.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;

use crate::error::ServiceError;

pub const NEUTRAL_SCORE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Accepts full names and the `pos|neu|neg` short forms, any case
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "pos" => Some(SentimentLabel::Positive),
            "neutral" | "neu" => Some(SentimentLabel::Neutral),
            "negative" | "neg" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

/// One `{label, probability}` pair reported by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassScore {
    pub label: String,
    #[serde(alias = "probability")]
    pub score: f64,
}

#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<ClassScore>, ServiceError>;
}

/// Map the most probable class onto [1, 5].
pub fn score_from_classes(classes: &[ClassScore]) -> Result<f64, ServiceError> {
    let best = classes
        .iter()
        .fold(None::<&ClassScore>, |best, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
        .ok_or_else(|| ServiceError::Malformed("no classes returned".to_string()))?;

    let p = best.score;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ServiceError::Probability(p));
    }

    let label = SentimentLabel::parse(&best.label)
        .ok_or_else(|| ServiceError::UnknownLabel(best.label.clone()))?;

    Ok(match label {
        SentimentLabel::Positive => 3.0 + 2.0 * p,
        SentimentLabel::Neutral => NEUTRAL_SCORE,
        SentimentLabel::Negative => 1.0 + 2.0 * p,
    })
}

pub struct SentimentScorer {
    service: Box<dyn SentimentService>,
}

impl SentimentScorer {
    pub fn new(service: Box<dyn SentimentService>) -> Self {
        Self { service }
    }

    /// Sentiment in [1.0, 5.0]. Blank input skips the service entirely.
    pub async fn score(&self, sentence: &str) -> f64 {
        if sentence.trim().is_empty() {
            return NEUTRAL_SCORE;
        }

        match self.service.classify(sentence).await {
            Ok(classes) => match score_from_classes(&classes) {
                Ok(score) => score,
                Err(e) => {
                    warn!("⚠️ [sentiment] {}; using neutral {}", e, NEUTRAL_SCORE);
                    NEUTRAL_SCORE
                }
            },
            Err(e) => {
                warn!("⚠️ [sentiment] service failed: {}; using neutral {}", e, NEUTRAL_SCORE);
                NEUTRAL_SCORE
            }
        }
    }
}

// ============================================================================
// HTTP service
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Flat(Vec<ClassScore>),
    Nested(Vec<Vec<ClassScore>>),
    Single(ClassScore),
}

/// Calls a sentiment sidecar: POST `{"text": ...}` → `[{"label", "score"}, ...]`.
pub struct HttpSentimentService {
    client: reqwest::Client,
    url: String,
}

impl HttpSentimentService {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SentimentService for HttpSentimentService {
    async fn classify(&self, text: &str) -> Result<Vec<ClassScore>, ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let parsed: ClassifyResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))?;

        Ok(match parsed {
            ClassifyResponse::Flat(classes) => classes,
            ClassifyResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            ClassifyResponse::Single(class) => vec![class],
        })
    }
}

// ============================================================================
// Offline lexicon service
// ============================================================================

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "superb",
        "outstanding", "brilliant", "love", "loved", "loving", "best", "better", "happy",
        "beautiful", "perfect", "awesome", "incredible", "delightful", "pleasant", "satisfying",
        "satisfied", "recommend", "recommended", "impressive", "exceptional", "delicious",
        "tasty", "yummy", "fresh", "friendly", "attentive", "helpful", "polite", "cozy", "clean",
        "generous", "reasonable", "affordable", "nice", "lovely", "flavorful", "tender", "juicy",
        "crispy", "quick", "fast", "welcoming", "enjoyed", "enjoy", "worth",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse", "hate", "hated",
        "dislike", "disappointing", "disappointed", "sad", "unhappy", "angry", "annoyed",
        "frustrated", "frustrating", "problem", "wrong", "useless", "waste", "slow", "rude",
        "dirty", "cold", "bland", "salty", "greasy", "soggy", "stale", "overpriced", "expensive",
        "pricey", "noisy", "loud", "crowded", "cramped", "mediocre", "subpar", "gross", "nasty",
        "undercooked", "overcooked", "burnt", "never", "ignored", "forgot", "tasteless",
    ]
    .into_iter()
    .collect()
});

/// Deterministic word-count classifier used when no sentiment service is configured.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentimentService;

impl LexiconSentimentService {
    pub fn classify_text(text: &str) -> Vec<ClassScore> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .collect();

        let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(*w)).count() as f64;
        let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(*w)).count() as f64;
        let total = positive + negative;

        let (p_pos, p_neu, p_neg) = if total == 0.0 {
            (0.0, 1.0, 0.0)
        } else {
            // one pseudo-count of neutrality
            let denom = total + 1.0;
            (positive / denom, 1.0 / denom, negative / denom)
        };

        // neutral first so an even split resolves to it
        vec![
            ClassScore { label: "neutral".to_string(), score: p_neu },
            ClassScore { label: "positive".to_string(), score: p_pos },
            ClassScore { label: "negative".to_string(), score: p_neg },
        ]
    }
}

#[async_trait]
impl SentimentService for LexiconSentimentService {
    async fn classify(&self, text: &str) -> Result<Vec<ClassScore>, ServiceError> {
        Ok(Self::classify_text(text))
    }
}
