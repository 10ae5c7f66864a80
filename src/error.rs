//! Error types for the external collaborators and static assets.
//!
//! The core pipeline itself never fails on degenerate input; these errors only
//! travel as far as the call boundary that converts them into a fallback value.

use thiserror::Error;

/// Failure reported by (or while talking to) an external model service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("unknown sentiment label: {0}")]
    UnknownLabel(String),

    #[error("probability {0} outside [0, 1]")]
    Probability(f64),
}

/// Failure while loading the dish vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("cannot read vocabulary file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
