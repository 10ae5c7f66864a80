//! Aspect-relevant keyword phrase extraction and ranking.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use crate::aspect::AspectLexicon;
use crate::models::Aspect;
use crate::tagger::{is_stopword, noun_chunks, pattern_ngrams, PosTagger};
use crate::tfidf::TermIndex;

/// `$20`, `$$ 15`, `$30-50`, `$30–50`
static CURRENCY_AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$+\s*\d+(?:[-–]\d+)?").unwrap());

/// Score forced onto currency amounts under `price`
pub const CURRENCY_SCORE: f64 = 10.0;
/// Score of every other candidate before the term index is fit
pub const UNFIT_SCORE: f64 = 1.0;

pub struct KeywordExtractor {
    lexicon: Arc<AspectLexicon>,
    tagger: Box<dyn PosTagger>,
    index: Option<TermIndex>,
    top_k: usize,
}

impl KeywordExtractor {
    pub fn new(lexicon: Arc<AspectLexicon>, tagger: Box<dyn PosTagger>, top_k: usize) -> Self {
        Self {
            lexicon,
            tagger,
            index: None,
            top_k,
        }
    }

    /// Fit the term index over the whole corpus. Must run before extraction for
    /// term weights to apply.
    pub fn fit<I, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.index = Some(TermIndex::fit(documents));
    }

    pub fn is_fit(&self) -> bool {
        self.index.is_some()
    }

    /// Candidate phrases in discovery order, before any filtering
    pub fn candidates(&self, sentence: &str, aspect: Aspect) -> Vec<String> {
        let tokens = self.tagger.tag(sentence);
        let mut found: Vec<String> = Vec::new();
        let mut push = |c: String| {
            if !found.contains(&c) {
                found.push(c);
            }
        };

        for chunk in noun_chunks(&tokens) {
            push(chunk);
        }
        for gram in pattern_ngrams(&tokens) {
            push(gram);
        }
        if aspect == Aspect::Price {
            for m in CURRENCY_AMOUNT.find_iter(sentence) {
                push(m.as_str().trim().to_string());
            }
        }

        found
    }

    fn keeps(&self, candidate: &str, aspect: Aspect) -> bool {
        let lowered = candidate.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        if words.iter().all(|w| is_stopword(w)) {
            return false;
        }
        if aspect != Aspect::Price && candidate.contains('$') {
            return false;
        }
        let blocked = self.lexicon.blocklist(aspect);
        if words.iter().any(|w| blocked.iter().any(|b| b == w)) {
            return false;
        }

        (aspect == Aspect::Price && candidate.contains('$'))
            || self.lexicon.mentions(aspect, &lowered)
    }

    fn score(&self, candidate: &str, aspect: Aspect) -> f64 {
        if aspect == Aspect::Price && candidate.contains('$') {
            return CURRENCY_SCORE;
        }
        match &self.index {
            Some(index) => index.phrase_weight(candidate),
            None => UNFIT_SCORE,
        }
    }

    /// Up to `top_k` phrases for the (sentence, aspect) pair, best first.
    /// Equal scores keep discovery order.
    pub fn extract(&self, sentence: &str, aspect: Aspect) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = self
            .candidates(sentence, aspect)
            .into_iter()
            .filter(|c| self.keeps(c, aspect))
            .map(|c| {
                let s = self.score(&c, aspect);
                (c, s)
            })
            .filter(|(_, s)| *s > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);

        if !scored.is_empty() {
            debug!("[keywords] {} -> {:?}", aspect, scored);
        }
        scored.into_iter().map(|(c, _)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::LexiconTagger;

    fn extractor(dishes: &[&str]) -> KeywordExtractor {
        let lexicon = Arc::new(AspectLexicon::new(dishes.iter().copied()));
        let tagger = LexiconTagger::new().with_nouns(lexicon.dishes());
        KeywordExtractor::new(lexicon, Box::new(tagger), 5)
    }

    const SCENARIO: &str = "The pasta was amazing but service was slow.";

    #[test]
    fn test_candidates_in_discovery_order() {
        let kx = extractor(&["pasta"]);
        assert_eq!(kx.candidates(SCENARIO, Aspect::Food), vec!["the pasta", "amazing service"]);
    }

    #[test]
    fn test_blocklist_and_relevance_per_aspect() {
        let kx = extractor(&["pasta"]);
        assert!(kx.extract(SCENARIO, Aspect::Food).is_empty());
        assert_eq!(kx.extract(SCENARIO, Aspect::Service), vec!["amazing service"]);
        assert!(kx.extract(SCENARIO, Aspect::WaitingTime).is_empty());
    }

    #[test]
    fn test_blocklisted_words_never_returned() {
        let kx = extractor(&["noodle", "soup"]);
        let sentence = "Great noodle soup, friendly service staff, and the manager smiled.";
        for aspect in Aspect::ALL {
            for phrase in kx.extract(sentence, aspect) {
                let words: Vec<&str> = phrase.split_whitespace().collect();
                for blocked in kx.lexicon.blocklist(aspect) {
                    assert!(!words.contains(&blocked.as_str()), "{} in {:?}", blocked, phrase);
                }
            }
        }
    }

    #[test]
    fn test_currency_amounts_rank_first_under_price() {
        let mut kx = extractor(&[]);
        kx.fit(["Great value meal for $25", "The bill was high", "Cheap lunch deal"]);
        let keywords = kx.extract("Great value meal for $25, cheap lunch price.", Aspect::Price);
        assert_eq!(keywords.first().map(String::as_str), Some("$25"));
        assert!(keywords.contains(&"great value meal".to_string()));
    }

    #[test]
    fn test_currency_dropped_outside_price() {
        let kx = extractor(&[]);
        let keywords = kx.extract("Fresh food for $25", Aspect::Food);
        assert!(keywords.iter().all(|k| !k.contains('$')));
        assert_eq!(keywords, vec!["fresh food"]);
    }

    #[test]
    fn test_unfit_index_gives_neutral_scores() {
        let kx = extractor(&["tacos"]);
        assert!(!kx.is_fit());
        // all candidates tie at 1.0, so discovery order is kept
        let keywords = kx.extract("Spicy tacos and fresh salsa dish.", Aspect::Food);
        assert_eq!(keywords, vec!["spicy tacos", "fresh salsa dish", "fresh salsa", "salsa dish"]);
        let price = kx.extract("Worth the $30-40 bill and reasonable price.", Aspect::Price);
        assert_eq!(price.first().map(String::as_str), Some("$30-40"));
    }

    #[test]
    fn test_zero_scored_candidates_are_dropped() {
        let mut kx = extractor(&["tacos"]);
        kx.fit(["nothing in common here"]);
        assert!(kx.extract("Spicy tacos everywhere.", Aspect::Food).is_empty());
    }

    #[test]
    fn test_top_k_limit() {
        let lexicon = Arc::new(AspectLexicon::new(Vec::<String>::new()));
        let kx = KeywordExtractor::new(lexicon, Box::new(LexiconTagger::new()), 2);
        let out = kx.extract("$10 starters, $20 mains, $8 desserts, fair price tag", Aspect::Price);
        // any phrase carrying a currency symbol takes the forced score
        assert_eq!(out, vec!["$10 starters", "$20 mains"]);
    }
}
