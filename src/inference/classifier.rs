//! Star-rating sentiment classification.

use super::ollama::{ChatMessage, OllamaClient};
use anyhow::Result;
use async_trait::async_trait;

/// Text to star-rating label (`"1 star"` .. `"5 stars"`).
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String>;
}

/// Classifier backed by an Ollama chat model.
pub struct OllamaClassifier {
    client: OllamaClient,
}

impl OllamaClassifier {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SentimentClassifier for OllamaClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        let (messages, num_predict) = build_prompt(text);
        let reply = self.client.chat(&messages, num_predict).await?;
        Ok(normalize_label(&reply))
    }
}

/// A rating reply is a single digit; a few spare tokens cover stray whitespace.
const LABEL_MAX_TOKENS: usize = 8;

fn build_prompt(text: &str) -> (Vec<ChatMessage>, Option<usize>) {
    let messages = vec![
        ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
        ChatMessage::user(text),
    ];
    (messages, Some(LABEL_MAX_TOKENS))
}

/// Turn a free-form model reply into a star label.
///
/// The first digit 1-5 wins. Replies without one are returned trimmed, which
/// the label mapping treats as neutral.
pub fn normalize_label(reply: &str) -> String {
    match reply.chars().find(|c| ('1'..='5').contains(c)) {
        Some('1') => "1 star".to_string(),
        Some(d) => format!("{} stars", d),
        None => reply.trim().to_string(),
    }
}

const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You rate product reviews.
Read the review and answer with a single star rating from 1 to 5,
where 1 is very negative and 5 is very positive.
Answer with only the number."#;
