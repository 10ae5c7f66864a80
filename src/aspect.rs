//! Rule-based aspect detection.
//!
//! Every aspect owns a keyword list and a blocklist. A sentence belongs to each
//! aspect whose keywords occur in it as a plain substring, so `"waiter"` also fires
//! `wait`. Keyword extraction trims those false positives later.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::VocabularyError;
use crate::models::Aspect;

/// Generic food-quality words added on top of the dish vocabulary
pub const FOOD_QUALITY_WORDS: &[&str] = &[
    "food", "flavor", "taste", "dish", "spicy", "fresh", "delicious", "portion", "texture",
];

const SERVICE_KEYWORDS: &[&str] = &[
    "service", "staff", "waiter", "waitress", "employee", "friendly", "attitude", "server",
    "manager", "rude",
];

const WAITING_TIME_KEYWORDS: &[&str] = &[
    "wait", "waiting", "slow", "fast", "line", "queue", "minute", "hour", "reservation", "busy",
];

const PRICE_KEYWORDS: &[&str] = &[
    "price", "expensive", "cheap", "cost", "value", "pricey", "bill", "worth", "dollar",
];

const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "environment", "atmosphere", "clean", "dirty", "noise", "music", "space", "vibe",
    "bathroom", "parking",
];

/// Words that disqualify a keyword phrase for the aspect
fn default_blocklist(aspect: Aspect) -> &'static [&'static str] {
    match aspect {
        Aspect::Food => &["the", "service", "price"],
        Aspect::Service => &["the", "manager", "employee"],
        Aspect::WaitingTime => &["the", "noise", "waiter", "waitress"],
        Aspect::Price => &["the"],
        Aspect::Environment => &["the"],
    }
}

/// Immutable lookup tables: aspect → keywords, aspect → blocklist.
#[derive(Debug, Clone)]
pub struct AspectLexicon {
    keywords: HashMap<Aspect, Vec<String>>,
    blocklist: HashMap<Aspect, Vec<String>>,
    dishes: Vec<String>,
}

impl AspectLexicon {
    /// Build the tables around a dish vocabulary (lower-cased, blanks dropped).
    pub fn new<I, S>(dishes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dishes: Vec<String> = dishes
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();

        let mut food = dishes.clone();
        food.extend(owned(FOOD_QUALITY_WORDS));

        let mut keywords = HashMap::new();
        keywords.insert(Aspect::Food, food);
        keywords.insert(Aspect::Service, owned(SERVICE_KEYWORDS));
        keywords.insert(Aspect::WaitingTime, owned(WAITING_TIME_KEYWORDS));
        keywords.insert(Aspect::Price, owned(PRICE_KEYWORDS));
        keywords.insert(Aspect::Environment, owned(ENVIRONMENT_KEYWORDS));

        let blocklist = Aspect::ALL
            .into_iter()
            .map(|aspect| (aspect, owned(default_blocklist(aspect))))
            .collect();

        Self {
            keywords,
            blocklist,
            dishes,
        }
    }

    /// Load the dish vocabulary file and build the lexicon from it.
    pub fn from_vocab_file(path: &Path) -> Result<Self, VocabularyError> {
        let dishes = load_vocabulary(path)?;
        info!("🍜 Loaded {} dish terms from {}", dishes.len(), path.display());
        Ok(Self::new(dishes))
    }

    /// Like [`from_vocab_file`](Self::from_vocab_file), but an unreadable file only
    /// costs the dish terms: the generic food words still apply.
    pub fn from_vocab_file_or_generic(path: &Path) -> Self {
        match Self::from_vocab_file(path) {
            Ok(lexicon) => lexicon,
            Err(e) => {
                warn!("⚠️ {}. Continuing with generic food words only.", e);
                Self::new(Vec::<String>::new())
            }
        }
    }

    pub fn keywords(&self, aspect: Aspect) -> &[String] {
        self.keywords.get(&aspect).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn blocklist(&self, aspect: Aspect) -> &[String] {
        self.blocklist.get(&aspect).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dishes(&self) -> &[String] {
        &self.dishes
    }

    /// True if `text` (any case) contains one of the aspect's keywords as a substring
    pub fn mentions(&self, aspect: Aspect, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords(aspect).iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Parse a one-term-per-line vocabulary file. Only the first CSV column is read;
/// surrounding quotes are stripped and blank lines skipped.
pub fn load_vocabulary(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let raw = std::fs::read_to_string(path).map_err(|source| VocabularyError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_vocabulary(&raw))
}

pub fn parse_vocabulary(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim();
            let term = if let Some(quoted) = line.strip_prefix('"') {
                quoted.split('"').next().unwrap_or("")
            } else {
                line.split(',').next().unwrap_or("")
            };
            let term = term.trim().to_lowercase();
            (!term.is_empty()).then_some(term)
        })
        .collect()
}

/// Maps a sentence to the aspects it discusses.
pub struct AspectDetector<'a> {
    lexicon: &'a AspectLexicon,
}

impl<'a> AspectDetector<'a> {
    pub fn new(lexicon: &'a AspectLexicon) -> Self {
        Self { lexicon }
    }

    /// All matching aspects in declaration order; `[Food]` when nothing matches.
    pub fn detect(&self, sentence: &str) -> Vec<Aspect> {
        let found: Vec<Aspect> = Aspect::ALL
            .into_iter()
            .filter(|aspect| self.lexicon.mentions(*aspect, sentence))
            .collect();

        if found.is_empty() {
            vec![Aspect::Food]
        } else {
            found
        }
    }
}
