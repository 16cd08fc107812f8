//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and log level selection.

use clap::Parser;
use std::path::PathBuf;

/// ReviewLens - sentiment analysis for Steam reviews and text summarization
///
/// Starts an HTTP service with two endpoints:
///   GET  /analyze?url=<steam store url>
///   POST /summarize {"text": "..."} or {"url": "..."}
///
/// Examples:
///   reviewlens
///   reviewlens --port 8080 --classifier-model qwen2.5:7b
///   reviewlens --config ./reviewlens.toml --verbose
///   reviewlens --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, value_name = "HOST", env = "REVIEWLENS_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", env = "REVIEWLENS_PORT")]
    pub port: Option<u16>,

    /// Ollama API endpoint URL
    #[arg(long, value_name = "URL", env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Ollama model used to rate reviews
    #[arg(long, value_name = "MODEL", env = "REVIEWLENS_CLASSIFIER_MODEL")]
    pub classifier_model: Option<String>,

    /// Ollama model used to summarize text
    #[arg(long, value_name = "MODEL", env = "REVIEWLENS_SUMMARIZER_MODEL")]
    pub summarizer_model: Option<String>,

    /// Timeout for each model request in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of reviews to collect per analysis
    #[arg(long, value_name = "COUNT")]
    pub review_count: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .reviewlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .reviewlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(count) = self.review_count {
            if count == 0 {
                return Err("Review count must be at least 1".to_string());
            }
        }

        if let Some(ref path) = self.config {
            if !path.is_file() {
                return Err(format!("Config file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
