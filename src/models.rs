use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Input
// ============================================================================

/// One record of the input array. Only `text` is read; other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub text: Option<String>,
}

/// Structured rating labels that may be embedded in review text as `Label: value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    Food,
    Service,
    Atmosphere,
    #[serde(rename = "Noise level")]
    NoiseLevel,
}

impl RatingLabel {
    pub const ALL: [RatingLabel; 4] = [
        RatingLabel::Food,
        RatingLabel::Service,
        RatingLabel::Atmosphere,
        RatingLabel::NoiseLevel,
    ];

    /// The literal token as it appears in review text (case-sensitive)
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingLabel::Food => "Food",
            RatingLabel::Service => "Service",
            RatingLabel::Atmosphere => "Atmosphere",
            RatingLabel::NoiseLevel => "Noise level",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == s)
    }
}

/// A review after preprocessing. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub text: String,
    pub ratings: BTreeMap<RatingLabel, String>,
    pub clean_text: String,
}

// ============================================================================
// Aspects
// ============================================================================

/// The closed set of aspects a sentence can be attributed to.
/// Declaration order is the iteration order of detection results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Food,
    Service,
    WaitingTime,
    Price,
    Environment,
}

impl Aspect {
    pub const ALL: [Aspect; 5] = [
        Aspect::Food,
        Aspect::Service,
        Aspect::WaitingTime,
        Aspect::Price,
        Aspect::Environment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Food => "food",
            Aspect::Service => "service",
            Aspect::WaitingTime => "waiting_time",
            Aspect::Price => "price",
            Aspect::Environment => "environment",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectSummary {
    pub aspect: Aspect,
    /// Mean sentence sentiment in [1, 5], rounded to 3 decimals
    pub sentiment: f64,
    /// At most 5 entries, most frequent first
    pub keywords: Vec<String>,
    #[serde(skip)]
    pub summary_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Report {
    pub aspects: Vec<AspectSummary>,
    pub restaurant_summary: String,
}
