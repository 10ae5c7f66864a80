use unicode_segmentation::UnicodeSegmentation;

/// Split clean review text into sentences (UAX #29 boundaries), trimmed, blanks dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
