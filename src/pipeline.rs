//! End-to-end run over a review collection.
//!
//! Preprocess → fit term index → per sentence: detect, score, extract → aggregate →
//! per-aspect summaries → restaurant summary. Strictly sequential: one sentence at a
//! time, one service call in flight at most.

use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregate::{majority_noise_level, Aggregator};
use crate::aspect::{AspectDetector, AspectLexicon};
use crate::config::Settings;
use crate::error::ServiceError;
use crate::keywords::KeywordExtractor;
use crate::models::{RawReview, Report};
use crate::preprocess::preprocess_reviews;
use crate::segment::split_sentences;
use crate::sentiment::{
    HttpSentimentService, LexiconSentimentService, SentimentScorer, SentimentService,
};
use crate::summarize::{
    ExtractiveSummaryService, HttpSummaryService, LengthBounds, Summarizer, SummaryService,
};
use crate::tagger::LexiconTagger;

pub struct ReviewPipeline {
    lexicon: Arc<AspectLexicon>,
    extractor: KeywordExtractor,
    scorer: SentimentScorer,
    summarizer: Summarizer,
}

impl ReviewPipeline {
    pub fn new(
        lexicon: Arc<AspectLexicon>,
        sentiment: Box<dyn SentimentService>,
        summary: Box<dyn SummaryService>,
        top_k: usize,
        max_input_chars: usize,
    ) -> Self {
        let tagger = LexiconTagger::new().with_nouns(lexicon.dishes());
        Self {
            extractor: KeywordExtractor::new(lexicon.clone(), Box::new(tagger), top_k),
            lexicon,
            scorer: SentimentScorer::new(sentiment),
            summarizer: Summarizer::new(summary, max_input_chars),
        }
    }

    /// HTTP services where a URL is configured, the offline stand-ins otherwise.
    pub fn from_settings(
        settings: &Settings,
        lexicon: AspectLexicon,
    ) -> Result<Self, ServiceError> {
        let sentiment: Box<dyn SentimentService> = match &settings.sentiment_url {
            Some(url) => {
                info!("🔌 Sentiment service: {}", url);
                Box::new(HttpSentimentService::new(url.as_str(), settings.service_timeout)?)
            }
            None => {
                info!("🔌 Sentiment service: built-in lexicon classifier");
                Box::new(LexiconSentimentService)
            }
        };

        let summary: Box<dyn SummaryService> = match &settings.summary_url {
            Some(url) => {
                info!("🔌 Summary service: {}", url);
                Box::new(HttpSummaryService::new(url.as_str(), settings.service_timeout)?)
            }
            None => {
                info!("🔌 Summary service: built-in extractive summarizer");
                Box::new(ExtractiveSummaryService)
            }
        };

        Ok(Self::new(
            Arc::new(lexicon),
            sentiment,
            summary,
            settings.top_k,
            settings.max_input_chars,
        ))
    }

    pub async fn run(&mut self, raw: &[RawReview]) -> Report {
        let reviews = preprocess_reviews(raw);
        let noise_level = majority_noise_level(&reviews);
        if let Some(level) = &noise_level {
            debug!("majority noise level: {}", level);
        }

        self.extractor.fit(reviews.iter().map(|r| r.clean_text.as_str()));

        let detector = AspectDetector::new(&self.lexicon);
        let mut aggregator = Aggregator::new();
        let mut sentence_count = 0usize;

        for (idx, review) in reviews.iter().enumerate() {
            for sentence in split_sentences(&review.clean_text) {
                let aspects = detector.detect(sentence);
                let score = self.scorer.score(sentence).await;
                debug!("review #{} {:?} {:.3}: {}", idx, aspects, score, sentence);

                for aspect in aspects {
                    let keywords = self.extractor.extract(sentence, aspect);
                    aggregator.add(aspect, sentence, score, &keywords);
                }
                sentence_count += 1;
            }
        }

        info!(
            "🧮 Scanned {} reviews, {} sentences, {} aspects",
            reviews.len(),
            sentence_count,
            aggregator.aspects().len()
        );

        let mut aspects = aggregator.summaries(noise_level.as_deref());
        for summary in aspects.iter_mut() {
            if let Some(bucket) = aggregator.bucket(summary.aspect) {
                summary.summary_text = self
                    .summarizer
                    .summarize(&bucket.sentences, LengthBounds::ASPECT)
                    .await;
            }
        }

        let aspect_texts: Vec<&str> = aspects.iter().map(|a| a.summary_text.as_str()).collect();
        let restaurant_summary = self
            .summarizer
            .summarize(&aspect_texts, LengthBounds::RESTAURANT)
            .await;

        Report {
            aspects,
            restaurant_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Aspect;
    use crate::sentiment::ClassScore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PositiveService {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SentimentService for PositiveService {
        async fn classify(&self, _text: &str) -> Result<Vec<ClassScore>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ClassScore {
                label: "positive".to_string(),
                score: 0.5,
            }])
        }
    }

    struct FailingSummary;

    #[async_trait]
    impl SummaryService for FailingSummary {
        async fn summarize(&self, _: &str, _: usize, _: usize) -> Result<String, ServiceError> {
            Err(ServiceError::Status(503))
        }
    }

    fn pipeline(calls: Arc<AtomicUsize>) -> ReviewPipeline {
        ReviewPipeline::new(
            Arc::new(AspectLexicon::new(["pasta"])),
            Box::new(PositiveService { calls }),
            Box::new(FailingSummary),
            5,
            3000,
        )
    }

    fn raw(texts: &[&str]) -> Vec<RawReview> {
        texts
            .iter()
            .map(|t| RawReview {
                text: Some(t.to_string()),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_scenario_sentence_fans_out_to_aspects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut p = pipeline(calls.clone());
        let text = "Food : Great\nService : Slow\nThe pasta was amazing but service was slow.";
        let report = p.run(&raw(&[text])).await;

        let aspects: Vec<Aspect> = report.aspects.iter().map(|a| a.aspect).collect();
        assert_eq!(aspects, vec![Aspect::Food, Aspect::Service, Aspect::WaitingTime]);
        // one sentiment call per sentence, not per aspect
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for a in &report.aspects {
            assert_eq!(a.sentiment, 4.0);
            assert_eq!(a.summary_text, "The pasta was amazing but service was slow.");
        }
    }

    #[tokio::test]
    async fn test_zero_reviews() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = pipeline(calls.clone()).run(&[]).await;
        assert!(report.aspects.is_empty());
        assert_eq!(report.restaurant_summary, "");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_and_missing_text_contribute_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let input = vec![RawReview { text: None }, RawReview { text: Some("   ".to_string()) }];
        let report = pipeline(calls.clone()).run(&input).await;
        assert!(report.aspects.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_noise_level_annotation_reaches_environment() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = pipeline(calls)
            .run(&raw(&[
                "Noise level: Quiet\nLovely clean space.",
                "Noise level: quiet\nMusic was soft.",
                "Noise level: Loud",
            ]))
            .await;
        let env = report
            .aspects
            .iter()
            .find(|a| a.aspect == Aspect::Environment)
            .unwrap();
        assert_eq!(env.keywords.last().map(String::as_str), Some("Noise Level: quiet"));
    }

    #[tokio::test]
    async fn test_from_settings_uses_offline_services() {
        let settings = Settings::default();
        let mut p =
            ReviewPipeline::from_settings(&settings, AspectLexicon::new(["ramen"])).unwrap();
        let report = p
            .run(&raw(&["The ramen was delicious and the staff were friendly. Prices were fair."]))
            .await;
        assert!(!report.aspects.is_empty());
        for a in &report.aspects {
            assert!((1.0..=5.0).contains(&a.sentiment));
        }
    }
}
