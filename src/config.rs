//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.reviewlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".reviewlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Review provider settings.
    #[serde(default)]
    pub reviews: ReviewsConfig,

    /// Summarizer settings.
    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            verbose: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5500
}

fn default_request_timeout() -> u64 {
    900 // classifying 200 reviews one by one is slow on CPU-only hosts
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Model used for star-rating classification.
    #[serde(default = "default_classifier_model")]
    pub classifier: String,

    /// Model used for summarization.
    #[serde(default = "default_summarizer_model")]
    pub summarizer: String,

    /// Fixed sampling seed so repeated calls decode identically.
    #[serde(default)]
    pub seed: u64,

    /// Request timeout in seconds for each model call.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            classifier: default_classifier_model(),
            summarizer: default_summarizer_model(),
            seed: 0,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_classifier_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_summarizer_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// Review provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsConfig {
    /// Base URL of the store API.
    #[serde(default = "default_reviews_base_url")]
    pub base_url: String,

    /// Number of reviews to collect per analysis.
    #[serde(default = "default_target_count")]
    pub target_count: usize,

    /// Minimum number of reviews required for an analysis.
    #[serde(default = "default_min_reviews")]
    pub min_reviews: usize,

    /// Largest page the provider accepts.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Review language filter.
    #[serde(default = "default_language")]
    pub language: String,

    /// Cursor value the provider returns once every page was served.
    #[serde(default = "default_end_cursor")]
    pub end_cursor: String,

    /// Characters of each review passed to the classifier.
    #[serde(default = "default_classify_max_chars")]
    pub classify_max_chars: usize,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_reviews_base_url(),
            target_count: default_target_count(),
            min_reviews: default_min_reviews(),
            max_page_size: default_max_page_size(),
            language: default_language(),
            end_cursor: default_end_cursor(),
            classify_max_chars: default_classify_max_chars(),
        }
    }
}

fn default_reviews_base_url() -> String {
    "https://store.steampowered.com".to_string()
}

fn default_target_count() -> usize {
    200
}

fn default_min_reviews() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_language() -> String {
    "english".to_string()
}

fn default_end_cursor() -> String {
    "AoIIPwAAAAA=".to_string()
}

fn default_classify_max_chars() -> usize {
    512
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Maximum characters per chunk sent to the summarizer.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Default minimum summary length.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Default maximum summary length.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

fn default_max_chunk_chars() -> usize {
    1024
}

fn default_min_length() -> usize {
    30
}

fn default_max_length() -> usize {
    150
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when the CLI provides an explicit value.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref url) = args.ollama_url {
            self.model.ollama_url = url.clone();
        }
        if let Some(ref model) = args.classifier_model {
            self.model.classifier = model.clone();
        }
        if let Some(ref model) = args.summarizer_model {
            self.model.summarizer = model.clone();
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
        if let Some(count) = args.review_count {
            self.reviews.target_count = count;
        }

        // Flags always override
        if args.verbose {
            self.server.verbose = true;
        }
    }

    /// Check values that would make the service misbehave at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Port must be non-zero".to_string());
        }

        for (name, url) in [
            ("Ollama URL", &self.model.ollama_url),
            ("Reviews base URL", &self.reviews.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("{} must start with 'http://' or 'https://'", name));
            }
        }

        if self.model.timeout_seconds == 0 {
            return Err("Model timeout must be at least 1 second".to_string());
        }

        if self.reviews.target_count == 0 || self.reviews.max_page_size == 0 {
            return Err("Review count and page size must be at least 1".to_string());
        }

        if self.reviews.min_reviews > self.reviews.target_count {
            return Err(format!(
                "Minimum reviews ({}) cannot exceed the review count ({})",
                self.reviews.min_reviews, self.reviews.target_count
            ));
        }

        if self.reviews.classify_max_chars == 0 || self.summarizer.max_chunk_chars == 0 {
            return Err("Character limits must be at least 1".to_string());
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
