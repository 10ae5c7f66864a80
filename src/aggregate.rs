//! Per-aspect accumulation of sentences, scores and keyword counts.

use std::collections::HashMap;
use tracing::debug;

use crate::models::{Aspect, AspectSummary, RatingLabel, Review};

/// Keywords kept per aspect in the report
pub const TOP_KEYWORDS: usize = 5;
/// Organic keywords kept for `environment` when a noise level annotation is added
pub const ENVIRONMENT_ORGANIC_KEYWORDS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct AspectBucket {
    pub sentences: Vec<String>,
    pub scores: Vec<f64>,
    /// Phrase counts in first-seen order
    keyword_counts: Vec<(String, usize)>,
}

impl AspectBucket {
    fn add_keywords(&mut self, keywords: &[String]) {
        for keyword in keywords {
            match self.keyword_counts.iter_mut().find(|(k, _)| k == keyword) {
                Some((_, count)) => *count += 1,
                None => self.keyword_counts.push((keyword.clone(), 1)),
            }
        }
    }

    /// Arithmetic mean of the sentence scores; 0.0 for an empty bucket
    pub fn mean_sentiment(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Most frequent phrases first; equal counts keep first-seen order
    pub fn top_keywords(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<&(String, usize)> = self.keyword_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(n).map(|(k, _)| k.clone()).collect()
    }

    pub fn keyword_count(&self, keyword: &str) -> usize {
        self.keyword_counts
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }
}

/// Buckets keyed by aspect, remembering the order aspects first appeared in
#[derive(Debug, Default)]
pub struct Aggregator {
    buckets: HashMap<Aspect, AspectBucket>,
    order: Vec<Aspect>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, aspect: Aspect, sentence: &str, score: f64, keywords: &[String]) {
        if !self.buckets.contains_key(&aspect) {
            self.order.push(aspect);
        }
        let bucket = self.buckets.entry(aspect).or_default();
        bucket.sentences.push(sentence.to_string());
        bucket.scores.push(score);
        bucket.add_keywords(keywords);
    }

    pub fn bucket(&self, aspect: Aspect) -> Option<&AspectBucket> {
        self.buckets.get(&aspect)
    }

    /// Aspects with at least one sentence, first-seen order
    pub fn aspects(&self) -> &[Aspect] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Statistics for every non-empty bucket. `summary_text` is left empty for the
    /// summarizer to fill in.
    pub fn summaries(&self, noise_level: Option<&str>) -> Vec<AspectSummary> {
        self.order
            .iter()
            .filter_map(|aspect| self.buckets.get(aspect).map(|b| (*aspect, b)))
            .map(|(aspect, bucket)| {
                let mut keywords = bucket.top_keywords(TOP_KEYWORDS);
                if aspect == Aspect::Environment {
                    if let Some(level) = noise_level {
                        keywords.truncate(ENVIRONMENT_ORGANIC_KEYWORDS);
                        keywords.push(format!("Noise Level: {}", level));
                    }
                }
                let sentiment = round3(bucket.mean_sentiment());
                debug!(
                    "[aggregate] {}: {} sentences, sentiment {}, keywords {:?}",
                    aspect,
                    bucket.sentences.len(),
                    sentiment,
                    keywords
                );
                AspectSummary {
                    aspect,
                    sentiment,
                    keywords,
                    summary_text: String::new(),
                }
            })
            .collect()
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Most frequent non-empty `Noise level` rating across reviews, lower-cased.
/// Equal counts go to the value encountered first.
pub fn majority_noise_level(reviews: &[Review]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in reviews
        .iter()
        .filter_map(|r| r.ratings.get(&RatingLabel::NoiseLevel))
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
    {
        match counts.iter_mut().find(|(k, _)| *k == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mean_and_first_seen_order() {
        let mut agg = Aggregator::new();
        agg.add(Aspect::Service, "Slow service.", 2.0, &[]);
        agg.add(Aspect::Food, "Great pasta.", 5.0, &[]);
        agg.add(Aspect::Service, "Friendly staff.", 4.5, &[]);

        assert_eq!(agg.aspects(), &[Aspect::Service, Aspect::Food]);
        let summaries = agg.summaries(None);
        assert_eq!(summaries[0].aspect, Aspect::Service);
        assert_eq!(summaries[0].sentiment, 3.25);
        assert_eq!(agg.bucket(Aspect::Service).unwrap().sentences.len(), 2);
    }

    #[test]
    fn test_keyword_ranking_ties_keep_first_seen() {
        let mut agg = Aggregator::new();
        agg.add(Aspect::Food, "s1", 4.0, &kw(&["fresh pasta", "spicy ramen"]));
        agg.add(Aspect::Food, "s2", 4.0, &kw(&["garlic bread", "spicy ramen"]));
        agg.add(
            Aspect::Food,
            "s3",
            4.0,
            &kw(&["garlic bread", "cold soup", "dry rice", "fresh fish"]),
        );

        let bucket = agg.bucket(Aspect::Food).unwrap();
        assert_eq!(bucket.keyword_count("spicy ramen"), 2);
        assert_eq!(
            bucket.top_keywords(TOP_KEYWORDS),
            kw(&["spicy ramen", "garlic bread", "fresh pasta", "cold soup", "dry rice"])
        );
    }

    #[test]
    fn test_environment_noise_annotation() {
        let mut agg = Aggregator::new();
        agg.add(
            Aspect::Environment,
            "s",
            3.0,
            &kw(&["cozy room", "dim lights", "loud music", "nice patio", "clean tables"]),
        );
        agg.add(Aspect::Food, "f", 3.0, &kw(&["fresh pasta"]));

        let summaries = agg.summaries(Some("moderate"));
        let env = &summaries[0];
        assert_eq!(env.keywords.len(), 5);
        assert_eq!(env.keywords[4], "Noise Level: moderate");
        assert_eq!(env.keywords[3], "nice patio");
        // other aspects are untouched
        assert_eq!(summaries[1].keywords, kw(&["fresh pasta"]));
    }

    #[test]
    fn test_noise_annotation_with_few_keywords() {
        let mut agg = Aggregator::new();
        agg.add(Aspect::Environment, "s", 3.0, &kw(&["cozy room"]));
        let summaries = agg.summaries(Some("quiet"));
        assert_eq!(summaries[0].keywords, kw(&["cozy room", "Noise Level: quiet"]));
    }

    #[test]
    fn test_majority_noise_level() {
        let review = |noise: Option<&str>| {
            let mut r = Review {
                text: String::new(),
                ratings: Default::default(),
                clean_text: String::new(),
            };
            if let Some(v) = noise {
                r.ratings.insert(RatingLabel::NoiseLevel, v.to_string());
            }
            r
        };
        let reviews = vec![
            review(Some("Quiet")),
            review(Some("Loud")),
            review(None),
            review(Some("loud")),
            review(Some("quiet")),
        ];
        // tie between quiet and loud goes to the first counted
        assert_eq!(majority_noise_level(&reviews), Some("quiet".to_string()));

        let reviews = vec![review(Some("Loud")), review(Some("quiet")), review(Some("LOUD"))];
        assert_eq!(majority_noise_level(&reviews), Some("loud".to_string()));
        assert_eq!(majority_noise_level(&[review(None)]), None);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(3.14159), 3.142);
        assert_eq!(round3(11.0 / 3.0), 3.667);
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = Aggregator::new();
        assert!(agg.is_empty());
        assert!(agg.summaries(Some("loud")).is_empty());
    }
}
