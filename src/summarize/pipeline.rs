//! Chunked summarization of arbitrarily long text.

use super::chunking::chunk_text;
use crate::error::{AppError, AppResult};
use crate::inference::Summarizer;
use std::sync::Arc;
use tracing::{debug, info};

/// Smallest `max_len` the summarizer accepts.
pub const MIN_MAX_LENGTH: usize = 20;
/// Largest `max_len` the summarizer accepts.
pub const MAX_MAX_LENGTH: usize = 512;
/// Smallest `min_len` the summarizer accepts.
pub const MIN_MIN_LENGTH: usize = 10;
/// Required gap between `min_len` and `max_len`.
const LENGTH_GAP: usize = 10;

/// Clamp requested summary bounds into the range the model supports.
///
/// `max_len` lands in `[20, 512]`, then `min_len` in `[10, max_len - 10]`.
pub fn clamp_lengths(min_len: usize, max_len: usize) -> (usize, usize) {
    let max_len = max_len.clamp(MIN_MAX_LENGTH, MAX_MAX_LENGTH);
    let min_len = min_len.clamp(MIN_MIN_LENGTH, max_len - LENGTH_GAP);
    (min_len, max_len)
}

pub struct TextSummarizationPipeline {
    summarizer: Arc<dyn Summarizer>,
    max_chunk_chars: usize,
}

impl TextSummarizationPipeline {
    pub fn new(summarizer: Arc<dyn Summarizer>, max_chunk_chars: usize) -> Self {
        Self {
            summarizer,
            max_chunk_chars,
        }
    }

    /// Summarize `text` chunk by chunk and join the partial summaries with a space.
    ///
    /// Any chunk failure aborts the whole call; no partial summary is returned.
    pub async fn summarize(&self, text: &str, min_len: usize, max_len: usize) -> AppResult<String> {
        if text.trim().is_empty() {
            return Err(AppError::EmptyInput);
        }

        let (min_len, max_len) = clamp_lengths(min_len, max_len);
        let chunks = chunk_text(text, self.max_chunk_chars);
        info!(
            "Summarizing {} chunk(s), length bounds {}..{}",
            chunks.len(),
            min_len,
            max_len
        );

        let mut summaries = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let summary = self
                .summarizer
                .summarize(chunk, min_len, max_len)
                .await
                .map_err(|e| AppError::Summarization(format!("{:#}", e)))?;
            debug!("Chunk {}/{} summarized", i + 1, chunks.len());
            summaries.push(summary);
        }

        Ok(summaries.join(" "))
    }
}
