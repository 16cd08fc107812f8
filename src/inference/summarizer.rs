//! Bounded-length text summarization.

use super::ollama::{ChatMessage, OllamaClient};
use anyhow::Result;
use async_trait::async_trait;

/// Summarize one chunk of text within `[min_len, max_len]` tokens.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, min_len: usize, max_len: usize) -> Result<String>;
}

/// Summarizer backed by an Ollama chat model.
pub struct OllamaSummarizer {
    client: OllamaClient,
}

impl OllamaSummarizer {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, text: &str, min_len: usize, max_len: usize) -> Result<String> {
        let (messages, num_predict) = build_prompt(text, min_len, max_len);
        let reply = self.client.chat(&messages, num_predict).await?;
        Ok(reply.trim().to_string())
    }
}

/// Chat messages plus the generation cap for one chunk.
///
/// Both the instruction and `num_predict` are expressed in tokens so the
/// model is never asked for more than it is allowed to produce.
fn build_prompt(text: &str, min_len: usize, max_len: usize) -> (Vec<ChatMessage>, Option<usize>) {
    let instruction = format!(
        "Summarize the following text in {} to {} tokens (about {} to {} words).\n\n{}",
        min_len,
        max_len,
        min_len * 3 / 4,
        max_len * 3 / 4,
        text
    );
    let messages = vec![
        ChatMessage::system(SUMMARIZER_SYSTEM_PROMPT),
        ChatMessage::user(&instruction),
    ];
    (messages, Some(max_len))
}

const SUMMARIZER_SYSTEM_PROMPT: &str = r#"You write concise summaries.
Only output the summary text, no preamble, headings or bullet points."#;
