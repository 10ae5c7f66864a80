//! Rating-field extraction and text cleanup.
//!
//! Review text often carries structured fields inline, e.g.
//! `"Food: 5 Service: 4 Atmosphere: 5\nLovely dinner."`. Those fragments are pulled
//! into a ratings map and cut out of the free text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{RatingLabel, RawReview, Review};

/// `<Label> : ` head of a rating fragment. Labels are matched case-sensitively.
static RATING_HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Food|Service|Atmosphere|Noise level)\s*:\s*").unwrap()
});

/// A word-bounded label occurrence; terminates the value of the previous fragment
static LABEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Food|Service|Atmosphere|Noise level)").unwrap()
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Split raw text into `(ratings, clean_text)`.
///
/// A value runs from after the colon up to the next label occurrence, the end of
/// its line, or the end of the text, whichever comes first. The same label seen
/// twice keeps the last value. Fragments with an empty value are still removed
/// but contribute no rating.
pub fn extract_ratings(text: &str) -> (BTreeMap<RatingLabel, String>, String) {
    let mut ratings = BTreeMap::new();
    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(caps) = RATING_HEAD.captures_at(text, cursor) {
        let Some(head) = caps.get(0) else { break };
        let value_start = head.end();

        let line_end = text[value_start..]
            .find('\n')
            .map(|offset| value_start + offset)
            .unwrap_or(text.len());

        let value_end = LABEL_BOUNDARY
            .find_at(text, value_start)
            .map(|m| m.start())
            .filter(|start| *start < line_end)
            .unwrap_or(line_end);

        let value = text[value_start..value_end].trim();
        if let Some(label) = RatingLabel::parse(&caps[1]) {
            if !value.is_empty() {
                ratings.insert(label, value.to_string());
            }
        }

        kept.push_str(&text[cursor..head.start()]);
        kept.push(' ');
        cursor = value_end;
    }
    kept.push_str(&text[cursor..]);

    (ratings, normalize_whitespace(&kept))
}

/// Newlines become spaces, whitespace runs collapse to one space, ends trimmed.
pub fn normalize_whitespace(text: &str) -> String {
    let flattened = text.replace('\n', " ");
    WHITESPACE_RUN.replace_all(&flattened, " ").trim().to_string()
}

impl Review {
    pub fn from_text(text: &str) -> Self {
        let (ratings, clean_text) = extract_ratings(text);
        Review {
            text: text.to_string(),
            ratings,
            clean_text,
        }
    }
}

/// Preprocess every raw record, keeping input order.
pub fn preprocess_reviews(raw: &[RawReview]) -> Vec<Review> {
    raw.iter()
        .enumerate()
        .map(|(idx, r)| {
            let review = Review::from_text(r.text.as_deref().unwrap_or(""));
            debug!(
                "review #{}: {} rating field(s), {} chars of clean text",
                idx,
                review.ratings.len(),
                review.clean_text.len()
            );
            review
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratings_on_separate_lines() {
        let text = "Food : Great\nService : Slow\nThe pasta was amazing but service was slow.";
        let (ratings, clean) = extract_ratings(text);
        assert_eq!(ratings.get(&RatingLabel::Food).map(String::as_str), Some("Great"));
        assert_eq!(ratings.get(&RatingLabel::Service).map(String::as_str), Some("Slow"));
        assert_eq!(ratings.len(), 2);
        assert_eq!(clean, "The pasta was amazing but service was slow.");
    }

    #[test]
    fn test_ratings_on_one_line() {
        let text = "Loved it! Food: 5 Service: 4 Atmosphere: 5 Noise level: Moderate noise";
        let (ratings, clean) = extract_ratings(text);
        assert_eq!(ratings[&RatingLabel::Food], "5");
        assert_eq!(ratings[&RatingLabel::Service], "4");
        assert_eq!(ratings[&RatingLabel::Atmosphere], "5");
        assert_eq!(ratings[&RatingLabel::NoiseLevel], "Moderate noise");
        assert_eq!(clean, "Loved it!");
    }

    #[test]
    fn test_no_fields_only_normalizes() {
        let (ratings, clean) = extract_ratings("  Great   tacos.\n\nWill return.  ");
        assert!(ratings.is_empty());
        assert_eq!(clean, "Great tacos. Will return.");
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let (ratings, clean) = extract_ratings("food: cold but service: fine");
        assert!(ratings.is_empty());
        assert_eq!(clean, "food: cold but service: fine");
    }

    #[test]
    fn test_repeated_label_last_wins() {
        let (ratings, _) = extract_ratings("Food: 2\nFood: 4\nOkay overall.");
        assert_eq!(ratings[&RatingLabel::Food], "4");
        assert_eq!(ratings.len(), 1);
    }

    #[test]
    fn test_empty_value_is_dropped_but_removed() {
        let (ratings, clean) = extract_ratings("Nice patio. Food:");
        assert!(ratings.is_empty());
        assert_eq!(clean, "Nice patio.");
    }

    #[test]
    fn test_label_word_without_colon_ends_value() {
        let (ratings, clean) = extract_ratings("Food: good Service was slow");
        assert_eq!(ratings[&RatingLabel::Food], "good");
        assert_eq!(clean, "Service was slow");
    }

    #[test]
    fn test_clean_text_never_keeps_label_colon() {
        let samples = [
            "Food: 5\nService: 3\nAtmosphere: 4\nNoise level: Quiet",
            "a SeaFood: b",
            "Food:\nService: 2",
            "x.Food:Service:Atmosphere:",
            "Noise level : loud Food :",
        ];
        for sample in samples {
            let (ratings, clean) = extract_ratings(sample);
            for label in RatingLabel::ALL {
                assert!(
                    !clean.contains(&format!("{}:", label.as_str())),
                    "{:?} -> {:?}",
                    sample,
                    clean
                );
            }
            assert!(ratings.keys().all(|k| RatingLabel::ALL.contains(k)));
        }
    }

    #[test]
    fn test_preprocess_reviews_handles_missing_text() {
        let raw = vec![
            RawReview { text: Some("Food: 5\nTasty.".to_string()) },
            RawReview { text: None },
        ];
        let reviews = preprocess_reviews(&raw);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].clean_text, "Tasty.");
        assert_eq!(reviews[1].clean_text, "");
        assert!(reviews[1].ratings.is_empty());
    }
}
