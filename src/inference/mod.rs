//! Model clients for sentiment classification and summarization.
//!
//! Both collaborators are traits so the pipelines can be driven by stubs
//! in tests and by Ollama in production.

pub mod classifier;
pub mod ollama;
pub mod summarizer;

pub use classifier::{OllamaClassifier, SentimentClassifier};
pub use ollama::{OllamaClient, OllamaConfig};
pub use summarizer::{OllamaSummarizer, Summarizer};
