//! Lightweight part-of-speech tagging and noun-phrase chunking.
//!
//! The tagger is deterministic and lexicon driven: closed-class word lists, an
//! adjective/verb lexicon tuned for venue reviews, the dish vocabulary as known
//! nouns, a few suffix heuristics and one context rule. Anything left over is a noun.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Conj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Punct,
    Verb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: Pos,
}

impl TaggedToken {
    pub fn is_stop(&self) -> bool {
        is_stopword(&self.text)
    }

    pub fn is_nominal(&self) -> bool {
        self.pos == Pos::Noun
    }
}

/// Tags a (lower-cased) sentence. Implementations must be deterministic.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

// ============================================================================
// Word lists
// ============================================================================

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$+\s*\d+(?:[-–]\d+)?|\d+(?:[.,:]\d+)*|\p{L}+(?:'\p{L}+)*|[^\s\p{L}\d]").unwrap()
});

/// English stopwords (spaCy's list plus common contractions)
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
        "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
        "amongst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything",
        "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became", "because",
        "become", "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
        "below", "beside", "besides", "between", "beyond", "both", "bottom", "but", "by",
        "call", "can", "cannot", "ca", "could", "did", "do", "does", "doing", "done", "down",
        "due", "during", "each", "eight", "either", "eleven", "else", "elsewhere", "empty",
        "enough", "even", "ever", "every", "everyone", "everything", "everywhere", "except",
        "few", "fifteen", "fifty", "first", "five", "for", "former", "formerly", "forty",
        "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "have",
        "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers",
        "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
        "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter",
        "latterly", "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might",
        "mine", "more", "moreover", "most", "mostly", "move", "much", "must", "my", "myself",
        "name", "namely", "neither", "never", "nevertheless", "next", "nine", "no", "nobody",
        "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
        "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
        "ourselves", "out", "over", "own", "part", "per", "perhaps", "please", "put", "quite",
        "rather", "re", "really", "regarding", "same", "say", "see", "seem", "seemed",
        "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
        "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
        "sometimes", "somewhere", "still", "such", "take", "ten", "than", "that", "the",
        "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
        "therefore", "therein", "thereupon", "these", "they", "third", "this", "those",
        "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
        "top", "toward", "towards", "twelve", "twenty", "two", "under", "unless", "until",
        "up", "upon", "us", "used", "using", "various", "very", "via", "was", "we", "well",
        "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
        "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
        "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
        "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
        "don't", "doesn't", "didn't", "isn't", "wasn't", "weren't", "aren't", "can't",
        "couldn't", "won't", "wouldn't", "shouldn't", "i'm", "it's", "that's", "we're",
        "they're", "you're", "i've", "we've", "i'd", "we'd", "there's", "let's", "he's",
        "she's", "n't", "'s", "'re", "'ve", "'d", "'ll", "'m",
    ]
    .into_iter()
    .collect()
});

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any",
        "no", "another", "either", "neither", "all", "both", "my", "your", "his", "her", "its",
        "our", "their", "whose",
    ]
    .into_iter()
    .collect()
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "i", "me", "we", "us", "you", "he", "him", "she", "it", "they", "them", "myself",
        "ourselves", "yourself", "itself", "themselves", "mine", "ours", "yours", "hers",
        "theirs", "someone", "something", "anyone", "anything", "everyone", "everything",
        "nobody", "nothing", "who", "whom", "what", "which", "there", "i'm", "it's", "that's",
        "we're", "they're", "you're", "i've", "we've", "i'd", "we'd", "there's", "let's",
        "he's", "she's",
    ]
    .into_iter()
    .collect()
});

static ADPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "from", "up", "down", "out",
        "off", "over", "under", "around", "near", "across", "behind", "beside", "besides",
        "beyond", "despite", "except", "inside", "outside", "like", "per", "since", "toward",
        "towards", "upon", "via", "within", "without", "than", "throughout",
    ]
    .into_iter()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "and", "or", "but", "nor", "yet", "because", "although", "though", "while", "whereas",
        "if", "unless", "until", "whether", "when", "where", "as", "plus",
    ]
    .into_iter()
    .collect()
});

static AUXILIARIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "be", "is", "am", "are", "was", "were", "been", "being", "have", "has", "had",
        "having", "do", "does", "did", "will", "would", "shall", "should", "can", "could",
        "may", "might", "must", "don't", "doesn't", "didn't", "isn't", "wasn't", "weren't",
        "aren't", "can't", "couldn't", "won't", "wouldn't", "shouldn't",
    ]
    .into_iter()
    .collect()
});

static PARTICLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| vec!["not", "n't", "to", "'s"].into_iter().collect());

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "very", "really", "so", "too", "quite", "also", "just", "always", "never", "ever",
        "often", "sometimes", "still", "already", "even", "only", "pretty", "rather", "almost",
        "again", "here", "then", "now", "soon", "later", "maybe", "definitely", "absolutely",
        "totally", "super", "extremely", "incredibly", "highly", "well", "back", "away",
        "enough", "much", "more", "most", "less", "least", "how", "why", "once", "twice",
        "overall", "instead", "however", "though",
    ]
    .into_iter()
    .collect()
});

static INTERJECTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec!["wow", "yum", "ok", "okay", "oh", "yes", "yeah", "hmm"]
        .into_iter()
        .collect()
});

static NUMBER_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        "eleven", "twelve", "fifteen", "twenty", "thirty", "forty", "fifty", "sixty",
        "hundred", "dozen",
    ]
    .into_iter()
    .collect()
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "good", "great", "amazing", "awesome", "excellent", "fantastic", "wonderful",
        "delicious", "tasty", "yummy", "fresh", "friendly", "rude", "slow", "fast", "quick",
        "long", "short", "cheap", "expensive", "pricey", "reasonable", "affordable",
        "overpriced", "clean", "dirty", "noisy", "loud", "quiet", "cozy", "cosy", "nice", "bad",
        "terrible", "awful", "horrible", "poor", "mediocre", "bland", "salty", "sweet", "sour",
        "bitter", "spicy", "hot", "cold", "warm", "crispy", "crunchy", "tender", "juicy", "dry",
        "soggy", "greasy", "oily", "rich", "creamy", "small", "large", "big", "huge", "tiny",
        "generous", "busy", "attentive", "helpful", "polite", "professional", "knowledgeable",
        "authentic", "average", "decent", "fine", "perfect", "best", "better", "worse", "worst",
        "new", "old", "special", "favorite", "favourite", "happy", "sad", "lovely", "pleasant",
        "comfortable", "cramped", "spacious", "crowded", "romantic", "casual", "fancy", "extra",
        "different", "main", "local", "real", "free", "high", "low", "bright", "dark",
        "outdoor", "indoor", "cool", "chill", "fun", "beautiful", "ugly", "nasty", "gross",
        "stale", "raw", "undercooked", "overcooked", "burnt", "flavorful", "flavourful",
        "tasteless", "homemade", "vegan", "vegetarian", "incredible", "outstanding", "superb",
        "solid", "classic", "basic", "terrific", "eclectic", "acidic", "packed", "disappointing",
        "disappointed", "interesting", "refreshing", "boring", "charming", "welcoming",
        "inviting", "satisfying", "underwhelming", "overwhelming", "annoying", "relaxing",
        "stunning", "exciting", "appetizing", "costly", "lively", "early", "late", "chilly",
        "grilled", "fried", "baked", "roasted", "smoked", "steamed", "stuffed", "braised",
        "seared", "poached", "toasted", "marinated", "pickled", "whipped", "mashed", "shredded",
        "sliced", "chopped", "aged", "cured", "glazed", "limited", "dated", "tired", "worth",
        "little", "several", "many", "few", "whole", "same", "other", "own", "next", "last",
        "first", "second", "true", "wrong", "right", "easy", "hard", "clear", "strong", "light",
        "heavy", "thick", "thin", "mild", "plain", "simple", "modern", "trendy", "hip", "lukewarm",
    ]
    .into_iter()
    .collect()
});

static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "come", "came", "go", "went", "gone", "order", "get", "got", "try", "tried", "love",
        "loved", "recommend", "eat", "ate", "eaten", "make", "made", "take", "took", "taken",
        "give", "gave", "given", "say", "said", "tell", "told", "ask", "bring", "brought",
        "serve", "seat", "wait", "pay", "paid", "charge", "return", "visit", "enjoy", "feel",
        "felt", "seem", "look", "want", "need", "know", "knew", "think", "thought", "find",
        "found", "keep", "kept", "leave", "left", "see", "saw", "seen", "forget", "forgot",
        "let", "put", "sit", "sat", "stay", "call", "book", "arrive", "expect", "check", "hate",
        "like", "share", "split", "spend", "spent", "win", "won", "lose", "lost", "run", "ran",
        "became", "become", "begin", "began", "hope", "wish", "miss",
    ]
    .into_iter()
    .collect()
});

/// Nouns the suffix rules would otherwise mis-tag
static KNOWN_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "evening", "morning", "ceiling", "building", "thing", "things", "wing", "wings",
        "dumpling", "dumplings", "pudding", "topping", "toppings", "filling", "seating",
        "parking", "lighting", "setting", "icing", "stuffing", "dressing", "booking", "ring",
        "king", "spring", "string", "jelly", "belly", "family", "italy", "july", "rally",
        "lily", "supply", "reply", "assembly", "music", "garlic", "service", "staff", "waiter",
        "waitress", "employee", "attitude", "server", "manager", "line", "queue", "minute",
        "minutes", "hour", "hours", "reservation", "price", "prices", "cost", "value", "bill",
        "dollar", "dollars", "environment", "atmosphere", "noise", "space", "vibe", "bathroom",
        "food", "flavor", "taste", "dish", "dishes", "portion", "portions", "texture", "meal",
        "menu", "table", "place", "restaurant", "night", "time", "drink", "drinks",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

// ============================================================================
// Tagger
// ============================================================================

/// Rule-based tagger. Single words of the dish vocabulary are treated as nouns.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    extra_nouns: HashSet<String>,
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register vocabulary terms (multi-word terms contribute each word).
    pub fn with_nouns<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            for word in term.as_ref().split_whitespace() {
                self.extra_nouns.insert(word.to_lowercase());
            }
        }
        self
    }

    fn tag_word(&self, word: &str, prev: Option<Pos>) -> Pos {
        if !word.chars().any(|c| c.is_alphanumeric()) {
            return Pos::Punct;
        }
        if word.starts_with('$') || word.chars().all(|c| c.is_ascii_digit() || ".,:".contains(c)) {
            return Pos::Num;
        }
        if DETERMINERS.contains(word) {
            return Pos::Det;
        }
        if PRONOUNS.contains(word) {
            return Pos::Pron;
        }
        if AUXILIARIES.contains(word) {
            return Pos::Aux;
        }
        if PARTICLES.contains(word) {
            return Pos::Part;
        }
        if CONJUNCTIONS.contains(word) {
            return Pos::Conj;
        }
        if ADPOSITIONS.contains(word) {
            return Pos::Adp;
        }
        if ADVERBS.contains(word) {
            return Pos::Adv;
        }
        if INTERJECTIONS.contains(word) {
            return Pos::Intj;
        }
        if NUMBER_WORDS.contains(word) {
            return Pos::Num;
        }
        if ADJECTIVES.contains(word) {
            return Pos::Adj;
        }
        if KNOWN_NOUNS.contains(word) || self.extra_nouns.contains(word) {
            return Pos::Noun;
        }

        let after_modifier = matches!(prev, Some(Pos::Det) | Some(Pos::Adj));

        if VERBS.contains(word) {
            return if after_modifier { Pos::Noun } else { Pos::Verb };
        }

        let len = word.chars().count();
        if len > 4 && word.ends_with("ly") {
            return Pos::Adv;
        }
        if len > 4 && word.ends_with("ing") {
            return if after_modifier { Pos::Noun } else { Pos::Verb };
        }
        if len > 3 && word.ends_with("ed") {
            return if matches!(prev, Some(Pos::Det) | Some(Pos::Adv)) {
                Pos::Adj
            } else {
                Pos::Verb
            };
        }
        const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];
        if len > 4 && ADJ_SUFFIXES.iter().any(|s| word.ends_with(s)) {
            return Pos::Adj;
        }

        Pos::Noun
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let normalized = text.to_lowercase().replace('’', "'");
        let mut tokens: Vec<TaggedToken> = Vec::new();

        for m in TOKEN_PATTERN.find_iter(&normalized) {
            let word = m.as_str();
            let prev = tokens.last().map(|t| t.pos);
            let pos = self.tag_word(word, prev);
            tokens.push(TaggedToken {
                text: word.to_string(),
                pos,
            });
        }

        tokens
    }
}

// ============================================================================
// Phrase candidates
// ============================================================================

/// Noun chunks: optional determiner, adjective/number modifiers (adverbs only
/// when they lead into another modifier), then a run of nouns. Returns every
/// chunk of more than one word, left to right.
pub fn noun_chunks(tokens: &[TaggedToken]) -> Vec<String> {
    let is_modifier = |j: usize| match tokens[j].pos {
        Pos::Adj | Pos::Num => true,
        Pos::Adv => tokens
            .get(j + 1)
            .map(|next| matches!(next.pos, Pos::Adj | Pos::Adv))
            .unwrap_or(false),
        _ => false,
    };

    let mut chunks = Vec::new();
    let n = tokens.len();
    let mut i = 0;

    while i < n {
        let start = i;
        let mut j = i;
        if tokens[j].pos == Pos::Det {
            j += 1;
        }
        while j < n && is_modifier(j) {
            j += 1;
        }
        let noun_start = j;
        while j < n && tokens[j].is_nominal() {
            j += 1;
        }

        if j > noun_start {
            let words: Vec<&str> = tokens[start..j].iter().map(|t| t.text.as_str()).collect();
            let chunk = words.join(" ");
            if chunk.split_whitespace().count() > 1 {
                chunks.push(chunk);
            }
            i = j;
        } else {
            i = start + 1;
        }
    }

    chunks
}

/// Adjective/noun bigrams and trigrams over the content tokens (punctuation and
/// stopwords removed first, so windows can span them).
pub fn pattern_ngrams(tokens: &[TaggedToken]) -> Vec<String> {
    let content: Vec<&TaggedToken> = tokens
        .iter()
        .filter(|t| t.pos != Pos::Punct && !t.is_stop())
        .collect();

    let mut out = Vec::new();

    for pair in content.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.is_nominal() && (a.pos == Pos::Adj || a.is_nominal()) {
            out.push(format!("{} {}", a.text, b.text));
        }
    }

    for triple in content.windows(3) {
        let (a, b, c) = (triple[0], triple[1], triple[2]);
        let adj_or_noun = a.pos == Pos::Adj || a.is_nominal();
        if adj_or_noun && b.is_nominal() && c.is_nominal() {
            out.push(format!("{} {} {}", a.text, b.text, c.text));
        }
        if a.pos == Pos::Adj && b.pos == Pos::Adj && c.is_nominal() {
            out.push(format!("{} {} {}", a.text, b.text, c.text));
        }
    }

    out
}
