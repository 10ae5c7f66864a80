pub mod aggregate;
pub mod aspect;
pub mod config;
pub mod error;
pub mod keywords;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod report;
pub mod segment;
pub mod sentiment;
#[cfg(test)]
mod stub_http;
pub mod summarize;
pub mod tagger;
pub mod tfidf;

pub use aspect::{AspectDetector, AspectLexicon};
pub use config::Settings;
pub use error::{ServiceError, VocabularyError};
pub use models::{Aspect, AspectSummary, RawReview, Report, Review};
pub use pipeline::ReviewPipeline;
pub use sentiment::{SentimentScorer, SentimentService};
pub use summarize::{LengthBounds, Summarizer, SummaryService};
