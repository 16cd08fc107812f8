//! Data models for review analysis and summarization.
//!
//! This module contains the core data structures shared by the review
//! aggregator, the summarization pipeline and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-class sentiment taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Neutral => write!(f, "Neutral"),
            Sentiment::Negative => write!(f, "Negative"),
        }
    }
}

impl Sentiment {
    /// Map a star-rating label from the classifier to a sentiment.
    ///
    /// Unknown labels fall back to `Neutral` rather than failing.
    pub fn from_label(label: &str) -> Self {
        match label {
            "1 star" | "2 stars" => Sentiment::Negative,
            "3 stars" => Sentiment::Neutral,
            "4 stars" | "5 stars" => Sentiment::Positive,
            _ => Sentiment::Neutral,
        }
    }
}

/// A single classified review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Full review text as returned by the provider.
    pub text: String,
    /// Sentiment assigned by the classifier.
    pub sentiment: Sentiment,
}

/// Count of reviews per sentiment class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
}

impl SentimentTally {
    /// Increment the bucket for `sentiment`.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    /// Sum of all buckets.
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Build a tally from already classified reviews.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut tally = Self::default();
        for review in reviews {
            tally.record(review.sentiment);
        }
        tally
    }
}

/// Result of aggregating and classifying a game's reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Counts per sentiment class.
    pub sentiments: SentimentTally,
    /// Number of reviews classified.
    pub total_reviews_analyzed: usize,
    /// Reviews in fetch order.
    pub reviews: Vec<Review>,
}

impl AnalysisReport {
    /// Build a report from classified reviews, keeping their order.
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self {
            sentiments: SentimentTally::from_reviews(&reviews),
            total_reviews_analyzed: reviews.len(),
            reviews,
        }
    }
}

/// Body of a `POST /summarize` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Literal text to summarize.
    #[serde(default)]
    pub text: Option<String>,
    /// Article URL to fetch and summarize.
    #[serde(default)]
    pub url: Option<String>,
    /// Minimum summary length per chunk.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Maximum summary length per chunk.
    #[serde(default)]
    pub max_length: Option<usize>,
}

/// Body of a successful `POST /summarize` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}
