//! Corpus-wide inverse-document-frequency index.
//!
//! Fit once over every clean review text, then shared read-only by keyword scoring.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::info;

use crate::tagger::is_stopword;

static TERM_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    /// term -> smoothed idf
    idf: HashMap<String, f64>,
    n_docs: usize,
}

impl TermIndex {
    /// Lower-cased terms of at least two word characters, stopwords removed
    pub fn terms(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TERM_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !is_stopword(t))
            .map(str::to_string)
            .collect()
    }

    /// Fit over a document collection with `idf = ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut n_docs = 0usize;

        for doc in documents {
            n_docs += 1;
            let unique: HashSet<String> = Self::terms(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = n_docs as f64;
        let idf = doc_freq
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect::<HashMap<_, _>>();

        info!("📊 Term index fit: {} documents, {} terms", n_docs, idf.len());
        Self { idf, n_docs }
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Mean idf of the phrase's whitespace tokens found in the vocabulary.
    /// Tokens outside the vocabulary are ignored; no known token gives 0.0.
    pub fn phrase_weight(&self, phrase: &str) -> f64 {
        let weights: Vec<f64> = phrase
            .to_lowercase()
            .split_whitespace()
            .filter_map(|t| self.idf(t))
            .collect();

        if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_terms_drop_stopwords_and_short_tokens() {
        let terms = TermIndex::terms("The pasta was a 5 STAR dish");
        assert_eq!(terms, vec!["pasta", "star", "dish"]);
    }

    #[test]
    fn test_smoothed_idf() {
        let index = TermIndex::fit(["pasta night", "pasta again", "quiet room"]);
        assert_eq!(index.n_docs(), 3);
        // df(pasta) = 2, df(quiet) = 1
        assert!(approx(index.idf("pasta").unwrap(), (4.0f64 / 3.0).ln() + 1.0));
        assert!(approx(index.idf("quiet").unwrap(), (4.0f64 / 2.0).ln() + 1.0));
        assert!(index.idf("again").is_none());
    }

    #[test]
    fn test_phrase_weight_ignores_unknown_tokens() {
        let index = TermIndex::fit(["fresh pasta", "slow service"]);
        let fresh = index.idf("fresh").unwrap();
        assert!(approx(index.phrase_weight("fresh unknownword"), fresh));
        assert!(approx(index.phrase_weight("the zzz"), 0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let index = TermIndex::fit(Vec::<String>::new());
        assert_eq!(index.vocabulary_size(), 0);
        assert_eq!(index.phrase_weight("anything"), 0.0);
    }
}
