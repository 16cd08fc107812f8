//! Paginated review retrieval from the Steam store API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Cursor value that requests the first page.
pub const INITIAL_CURSOR: &str = "*";

/// One page of reviews plus the cursor for the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPage {
    /// Review texts in provider order.
    pub reviews: Vec<String>,
    /// Continuation token; `None` when the provider sent none.
    pub cursor: Option<String>,
}

/// A paginated source of review texts.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch up to `page_size` reviews for `app_id` starting at `cursor`.
    async fn fetch_page(&self, app_id: &str, cursor: &str, page_size: usize) -> Result<ReviewPage>;
}

/// Raw `appreviews` response.
#[derive(Debug, Deserialize)]
struct SteamReviewsResponse {
    #[serde(default)]
    reviews: Vec<SteamReview>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SteamReview {
    review: String,
}

impl From<SteamReviewsResponse> for ReviewPage {
    fn from(response: SteamReviewsResponse) -> Self {
        Self {
            reviews: response.reviews.into_iter().map(|r| r.review).collect(),
            cursor: response.cursor,
        }
    }
}

/// Review source backed by `store.steampowered.com/appreviews`.
pub struct SteamReviewSource {
    base_url: String,
    language: String,
    http_client: reqwest::Client,
}

impl SteamReviewSource {
    pub fn new(base_url: &str, language: &str, timeout_seconds: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl ReviewSource for SteamReviewSource {
    async fn fetch_page(&self, app_id: &str, cursor: &str, page_size: usize) -> Result<ReviewPage> {
        let url = format!("{}/appreviews/{}", self.base_url, app_id);
        let page_size = page_size.to_string();

        debug!("Fetching reviews for app {} (cursor {})", app_id, cursor);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("json", "1"),
                ("num_per_page", page_size.as_str()),
                ("cursor", cursor),
                ("filter", "recent"),
                ("language", self.language.as_str()),
                ("purchase_type", "all"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to fetch reviews from {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Review API error {} for app {}", status, app_id));
        }

        let body: SteamReviewsResponse = response
            .json()
            .await
            .context("Failed to parse review API response")?;

        Ok(body.into())
    }
}
