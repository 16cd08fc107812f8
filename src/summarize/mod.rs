//! Long-text summarization.
//!
//! Text is cut into fixed-size chunks that fit the model's context, each
//! chunk is summarized on its own, and the partial summaries are joined.

pub mod chunking;
pub mod pipeline;

pub use pipeline::TextSummarizationPipeline;
