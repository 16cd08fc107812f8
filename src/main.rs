//! ReviewLens - review sentiment analysis and text summarization service
//!
//! An HTTP service that rates Steam reviews with a local Ollama model and
//! summarizes long text or web articles chunk by chunk.
//!
//! Exit codes:
//!   0 - Clean shutdown
//!   1 - Startup error (bad arguments, config, bind failure, etc.)

mod cli;
mod config;
mod error;
mod extract;
mod inference;
mod models;
mod reviews;
mod server;
mod summarize;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use extract::HttpArticleExtractor;
use inference::{OllamaClassifier, OllamaClient, OllamaConfig, OllamaSummarizer};
use reviews::{AggregatorConfig, ReviewAggregator, SteamReviewSource};
use server::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use summarize::TextSummarizationPipeline;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so its `verbose` setting takes effect
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("ReviewLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    if let Err(e) = run(config).await {
        error!("Server failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .reviewlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize models, review limits and summary lengths.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.server.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration, build the model clients once and serve requests.
async fn run(config: Config) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let state = build_state(&config)?;

    println!("🚀 ReviewLens listening on {}:{}", config.server.host, config.server.port);
    println!("   Ollama: {}", config.model.ollama_url);
    println!("   Classifier: {}", config.model.classifier);
    println!("   Summarizer: {}", config.model.summarizer);

    server::serve(
        &config.server.host,
        config.server.port,
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    )
    .await
}

/// Build the shared request state. Model clients are created here, once per process.
fn build_state(config: &Config) -> Result<AppState> {
    let ollama_config = |model: &str| OllamaConfig {
        ollama_url: config.model.ollama_url.clone(),
        model_name: model.to_string(),
        timeout_seconds: config.model.timeout_seconds,
        seed: config.model.seed,
    };

    let classifier = OllamaClassifier::new(OllamaClient::new(ollama_config(
        &config.model.classifier,
    ))?);
    let summarizer = OllamaSummarizer::new(OllamaClient::new(ollama_config(
        &config.model.summarizer,
    ))?);
    let source = SteamReviewSource::new(
        &config.reviews.base_url,
        &config.reviews.language,
        config.model.timeout_seconds,
    )?;
    let extractor = HttpArticleExtractor::new(config.model.timeout_seconds)?;

    let aggregator = ReviewAggregator::new(
        AggregatorConfig::from(&config.reviews),
        Arc::new(source),
        Arc::new(classifier),
    );
    let pipeline =
        TextSummarizationPipeline::new(Arc::new(summarizer), config.summarizer.max_chunk_chars);

    Ok(AppState {
        aggregator: Arc::new(aggregator),
        pipeline: Arc::new(pipeline),
        extractor: Arc::new(extractor),
        review_count: config.reviews.target_count,
        default_min_length: config.summarizer.min_length,
        default_max_length: config.summarizer.max_length,
    })
}

/// Where the active configuration came from, reported once logging is up.
#[derive(Debug)]
enum ConfigOrigin {
    File(PathBuf),
    Default,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::Default => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::File(config_path.clone())));
    }

    Ok(match Config::load_default() {
        Ok(Some(config)) => (config, ConfigOrigin::Default),
        Ok(None) => (Config::default(), ConfigOrigin::Builtin),
        Err(e) => (Config::default(), ConfigOrigin::Fallback(e)),
    })
}
