//! Reading the review array and writing the digest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::models::{Aspect, RawReview, Report};

#[derive(Serialize)]
struct AspectEntry<'a> {
    aspect: Aspect,
    sentiment: f64,
    keywords: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    aspects: Vec<AspectEntry<'a>>,
    restaurant_summary: &'a str,
}

impl Report {
    /// Pretty JSON (2-space indent, non-ASCII kept) with a trailing newline.
    /// `include_aspect_summaries` adds each aspect's summary under `summary`.
    pub fn to_json(&self, include_aspect_summaries: bool) -> Result<String> {
        let entry = ReportEntry {
            aspects: self
                .aspects
                .iter()
                .map(|a| AspectEntry {
                    aspect: a.aspect,
                    sentiment: a.sentiment,
                    keywords: &a.keywords,
                    summary: include_aspect_summaries.then_some(a.summary_text.as_str()),
                })
                .collect(),
            restaurant_summary: &self.restaurant_summary,
        };
        let mut json = serde_json::to_string_pretty(&entry).context("Failed to serialize report")?;
        json.push('\n');
        Ok(json)
    }
}

/// Parse a JSON array of review objects. Records without `text` read as empty.
pub fn load_reviews(path: &Path) -> Result<Vec<RawReview>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read reviews from {}", path.display()))?;
    let reviews: Vec<RawReview> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of reviews", path.display()))?;
    info!("📥 Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

pub fn write_report(path: &Path, report: &Report, include_aspect_summaries: bool) -> Result<()> {
    let json = report.to_json(include_aspect_summaries)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("💾 Report written to {}", path.display());
    Ok(())
}
