use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{debug, info};

use review_digest::report::{load_reviews, write_report};
use review_digest::{AspectLexicon, ReviewPipeline, Settings};

/// Aspect-level sentiment, keywords and summaries for a venue's reviews
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON array of review objects with a `text` field
    input: PathBuf,

    /// Where to write the report
    output: PathBuf,

    /// Dish vocabulary file (overrides FOOD_VOCAB_PATH)
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// Include each aspect's summary text in the report
    #[arg(long)]
    aspect_summaries: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut settings = Settings::from_env();
    if let Some(vocab) = args.vocab {
        settings.vocab_path = vocab;
    }
    debug!("{:?}", settings);

    info!("🚀 Starting review digest for {}", args.input.display());

    let reviews = load_reviews(&args.input)?;
    let lexicon = AspectLexicon::from_vocab_file_or_generic(&settings.vocab_path);
    let mut pipeline = ReviewPipeline::from_settings(&settings, lexicon)?;

    let report = pipeline.run(&reviews).await;
    for aspect in &report.aspects {
        info!(
            "✅ {}: sentiment {:.3}, keywords {:?}",
            aspect.aspect, aspect.sentiment, aspect.keywords
        );
    }

    write_report(&args.output, &report, args.aspect_summaries)?;
    Ok(())
}
