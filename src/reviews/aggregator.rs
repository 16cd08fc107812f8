//! Review collection and sentiment aggregation.
//!
//! Pages through a [`ReviewSource`] until the requested number of reviews is
//! collected or the provider runs out, then classifies every review and
//! tallies the results.

use super::source::{ReviewSource, INITIAL_CURSOR};
use crate::error::{AppError, AppResult};
use crate::inference::SentimentClassifier;
use crate::models::{AnalysisReport, Review, Sentiment};
use std::sync::Arc;
use tracing::{debug, info};

/// Settings for review collection and classification.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Fewer reviews than this is an [`AppError::InsufficientData`].
    pub min_reviews: usize,
    /// Largest page size the provider accepts.
    pub max_page_size: usize,
    /// Provider cursor meaning "no more pages".
    pub end_cursor: String,
    /// Characters of each review passed to the classifier.
    pub classify_max_chars: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            min_reviews: 20,
            max_page_size: 100,
            end_cursor: "AoIIPwAAAAA=".to_string(),
            classify_max_chars: 512,
        }
    }
}

impl From<&crate::config::ReviewsConfig> for AggregatorConfig {
    fn from(config: &crate::config::ReviewsConfig) -> Self {
        Self {
            min_reviews: config.min_reviews,
            max_page_size: config.max_page_size,
            end_cursor: config.end_cursor.clone(),
            classify_max_chars: config.classify_max_chars,
        }
    }
}

pub struct ReviewAggregator {
    config: AggregatorConfig,
    source: Arc<dyn ReviewSource>,
    classifier: Arc<dyn SentimentClassifier>,
}

impl ReviewAggregator {
    pub fn new(
        config: AggregatorConfig,
        source: Arc<dyn ReviewSource>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            config,
            source,
            classifier,
        }
    }

    /// Collect up to `target_count` reviews for `app_id` and classify them.
    pub async fn aggregate(&self, app_id: &str, target_count: usize) -> AppResult<AnalysisReport> {
        let texts = self.collect_reviews(app_id, target_count).await?;

        if texts.is_empty() {
            return Err(AppError::NotFound(
                "No reviews found for this app ID".to_string(),
            ));
        }
        if texts.len() < self.config.min_reviews {
            return Err(AppError::InsufficientData {
                found: texts.len(),
                required: self.config.min_reviews,
            });
        }

        info!("Classifying {} reviews for app {}", texts.len(), app_id);

        let mut reviews = Vec::with_capacity(texts.len());
        for text in texts {
            let excerpt = truncate_chars(&text, self.config.classify_max_chars);
            let label = self
                .classifier
                .classify(excerpt)
                .await
                .map_err(|e| AppError::Upstream(format!("Classification failed: {:#}", e)))?;
            let sentiment = Sentiment::from_label(&label);
            debug!("Label {:?} -> {}", label, sentiment);
            reviews.push(Review { text, sentiment });
        }

        let report = AnalysisReport::from_reviews(reviews);
        info!(
            "App {}: {} reviews, {} positive, {} neutral, {} negative",
            app_id,
            report.sentiments.total(),
            report.sentiments.positive,
            report.sentiments.neutral,
            report.sentiments.negative
        );
        Ok(report)
    }

    /// Page through the source until `target_count` reviews are collected or
    /// the provider signals exhaustion.
    pub async fn collect_reviews(&self, app_id: &str, target_count: usize) -> AppResult<Vec<String>> {
        let mut collected: Vec<String> = Vec::new();
        let mut cursor = INITIAL_CURSOR.to_string();

        while collected.len() < target_count {
            let page_size = self.config.max_page_size.min(target_count - collected.len());
            let page = self
                .source
                .fetch_page(app_id, &cursor, page_size)
                .await
                .map_err(|e| AppError::Upstream(format!("{:#}", e)))?;

            if page.reviews.is_empty() {
                debug!("Empty page, review source exhausted");
                break;
            }

            let remaining = target_count - collected.len();
            collected.extend(page.reviews.into_iter().take(remaining));
            debug!("Collected {}/{} reviews", collected.len(), target_count);

            match page.cursor {
                Some(next) if !next.is_empty() && next != self.config.end_cursor => cursor = next,
                _ => {
                    debug!("No continuation cursor, stopping");
                    break;
                }
            }
        }

        Ok(collected)
    }
}

/// Prefix of `text` with at most `max_chars` characters.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::source::ReviewPage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a fixed list of pages, then empty pages.
    struct StubSource {
        pages: Vec<ReviewPage>,
        calls: AtomicUsize,
        requests: Mutex<Vec<(String, usize)>>,
    }

    impl StubSource {
        fn new(pages: Vec<ReviewPage>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// `total` reviews split into full pages of `page_size`, each with a cursor.
        fn with_reviews(total: usize, page_size: usize) -> Self {
            let texts: Vec<String> = (0..total).map(|i| format!("review {}", i)).collect();
            let pages = texts
                .chunks(page_size)
                .enumerate()
                .map(|(i, chunk)| ReviewPage {
                    reviews: chunk.to_vec(),
                    cursor: Some(format!("cursor-{}", i + 1)),
                })
                .collect();
            Self::new(pages)
        }
    }

    #[async_trait]
    impl ReviewSource for StubSource {
        async fn fetch_page(
            &self,
            _app_id: &str,
            cursor: &str,
            page_size: usize,
        ) -> anyhow::Result<ReviewPage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .unwrap()
                .push((cursor.to_string(), page_size));
            let mut page = self.pages.get(call).cloned().unwrap_or_default();
            page.reviews.truncate(page_size);
            Ok(page)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ReviewSource for FailingSource {
        async fn fetch_page(&self, _: &str, _: &str, _: usize) -> anyhow::Result<ReviewPage> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    /// Rates "good" texts 5 stars, "bad" texts 1 star, anything else 3 stars.
    #[derive(Default)]
    struct StubClassifier {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SentimentClassifier for StubClassifier {
        async fn classify(&self, text: &str) -> anyhow::Result<String> {
            self.inputs.lock().unwrap().push(text.to_string());
            let label = if text.contains("good") {
                "5 stars"
            } else if text.contains("bad") {
                "1 star"
            } else {
                "3 stars"
            };
            Ok(label.to_string())
        }
    }

    fn aggregator(
        source: Arc<dyn ReviewSource>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> ReviewAggregator {
        ReviewAggregator::new(AggregatorConfig::default(), source, classifier)
    }

    #[tokio::test]
    async fn test_collect_requests_only_remaining_page_size() {
        let source = Arc::new(StubSource::new(vec![
            ReviewPage {
                reviews: (0..100).map(|i| format!("r{}", i)).collect(),
                cursor: Some("next".to_string()),
            },
            ReviewPage {
                reviews: (100..200).map(|i| format!("r{}", i)).collect(),
                cursor: Some("next2".to_string()),
            },
        ]));
        let agg = aggregator(source.clone(), Arc::new(StubClassifier::default()));

        let texts = agg.collect_reviews("730", 150).await.unwrap();
        assert_eq!(texts.len(), 150);
        assert_eq!(texts[0], "r0");
        assert_eq!(texts[149], "r149");

        let requests = source.requests.lock().unwrap().clone();
        assert_eq!(requests, vec![("*".to_string(), 100), ("next".to_string(), 50)]);
    }

    /// Ignores the requested page size and always returns 100 reviews.
    struct OversizedSource;

    #[async_trait]
    impl ReviewSource for OversizedSource {
        async fn fetch_page(&self, _: &str, _: &str, _: usize) -> anyhow::Result<ReviewPage> {
            Ok(ReviewPage {
                reviews: (0..100).map(|i| format!("r{}", i)).collect(),
                cursor: Some("more".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_collect_discards_rest_of_page_at_target() {
        let agg = aggregator(Arc::new(OversizedSource), Arc::new(StubClassifier::default()));

        let texts = agg.collect_reviews("730", 30).await.unwrap();
        assert_eq!(texts.len(), 30);
        assert_eq!(texts.last().map(String::as_str), Some("r29"));
    }

    #[tokio::test]
    async fn test_collect_never_exceeds_target() {
        for target in [1, 20, 99, 100, 101, 250] {
            let source = Arc::new(StubSource::with_reviews(1000, 100));
            let agg = aggregator(source, Arc::new(StubClassifier::default()));
            let texts = agg.collect_reviews("730", target).await.unwrap();
            assert_eq!(texts.len(), target);
        }
    }

    #[tokio::test]
    async fn test_pagination_terminates_on_empty_page() {
        let source = Arc::new(StubSource::with_reviews(230, 100));
        let agg = aggregator(source.clone(), Arc::new(StubClassifier::default()));

        let target = 500;
        let texts = agg.collect_reviews("730", target).await.unwrap();
        assert_eq!(texts.len(), 230);

        let calls = source.calls.load(Ordering::SeqCst);
        assert_eq!(calls, 4);
        assert!(calls <= target.div_ceil(100) + 1);
    }

    #[tokio::test]
    async fn test_missing_cursor_ends_pagination() {
        let source = Arc::new(StubSource::new(vec![
            ReviewPage {
                reviews: vec!["a".to_string(); 30],
                cursor: None,
            },
            ReviewPage {
                reviews: vec!["never fetched".to_string(); 30],
                cursor: Some("x".to_string()),
            },
        ]));
        let agg = aggregator(source.clone(), Arc::new(StubClassifier::default()));

        let texts = agg.collect_reviews("730", 200).await.unwrap();
        assert_eq!(texts.len(), 30);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_cursor_ends_pagination() {
        let source = Arc::new(StubSource::new(vec![ReviewPage {
            reviews: vec!["a".to_string(); 30],
            cursor: Some(String::new()),
        }]));
        let agg = aggregator(source.clone(), Arc::new(StubClassifier::default()));

        agg.collect_reviews("730", 200).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_configured_end_cursor_ends_pagination() {
        let source = Arc::new(StubSource::new(vec![
            ReviewPage {
                reviews: vec!["a".to_string(); 30],
                cursor: Some("DONE".to_string()),
            },
            ReviewPage {
                reviews: vec!["b".to_string(); 30],
                cursor: Some("more".to_string()),
            },
        ]));
        let config = AggregatorConfig {
            end_cursor: "DONE".to_string(),
            ..AggregatorConfig::default()
        };
        let agg = ReviewAggregator::new(
            config,
            source.clone(),
            Arc::new(StubClassifier::default()),
        );

        let texts = agg.collect_reviews("730", 200).await.unwrap();
        assert_eq!(texts.len(), 30);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_aggregate_tallies_in_fetch_order() {
        let mut reviews = Vec::new();
        for i in 0..30 {
            reviews.push(match i % 3 {
                0 => format!("good game {}", i),
                1 => format!("bad game {}", i),
                _ => format!("okay game {}", i),
            });
        }
        let source = Arc::new(StubSource::new(vec![ReviewPage {
            reviews: reviews.clone(),
            cursor: None,
        }]));
        let agg = aggregator(source, Arc::new(StubClassifier::default()));

        let report = agg.aggregate("730", 200).await.unwrap();
        assert_eq!(report.total_reviews_analyzed, 30);
        assert_eq!(report.sentiments.positive, 10);
        assert_eq!(report.sentiments.negative, 10);
        assert_eq!(report.sentiments.neutral, 10);
        assert_eq!(report.sentiments.total(), report.reviews.len());

        let texts: Vec<&str> = report.reviews.iter().map(|r| r.text.as_str()).collect();
        let expected: Vec<&str> = reviews.iter().map(String::as_str).collect();
        assert_eq!(texts, expected);
        assert_eq!(report.reviews[0].sentiment, Sentiment::Positive);
        assert_eq!(report.reviews[1].sentiment, Sentiment::Negative);
        assert_eq!(report.reviews[2].sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn test_aggregate_insufficient_reviews() {
        let source = Arc::new(StubSource::with_reviews(15, 10));
        let agg = aggregator(source, Arc::new(StubClassifier::default()));

        let err = agg.aggregate("730", 200).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientData {
                found: 15,
                required: 20
            }
        ));
    }

    #[tokio::test]
    async fn test_aggregate_no_reviews_is_not_found() {
        let source = Arc::new(StubSource::new(Vec::new()));
        let agg = aggregator(source, Arc::new(StubClassifier::default()));

        let err = agg.aggregate("730", 200).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_aggregate_source_failure_aborts() {
        let agg = aggregator(Arc::new(FailingSource), Arc::new(StubClassifier::default()));

        let err = agg.aggregate("730", 200).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref msg) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_classifier_sees_truncated_text_only() {
        let long = format!("good {}", "x".repeat(2000));
        let source = Arc::new(StubSource::new(vec![ReviewPage {
            reviews: vec![long.clone(); 20],
            cursor: None,
        }]));
        let classifier = Arc::new(StubClassifier::default());
        let agg = aggregator(source, classifier.clone());

        let report = agg.aggregate("730", 200).await.unwrap();
        assert_eq!(report.reviews[0].text, long);

        let inputs = classifier.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 20);
        assert!(inputs.iter().all(|t| t.chars().count() == 512));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 512), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
