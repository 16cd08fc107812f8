//! Axum HTTP server exposing the analysis and summarization endpoints.
//!
//! Routes:
//! - `GET /analyze?url=...` Steam review sentiment breakdown
//! - `POST /summarize` summary of literal text or an article URL
//! - `GET /health` liveness probe
//!
//! Every route allows any origin.

use crate::error::{AppError, AppResult};
use crate::extract::ArticleExtractor;
use crate::models::{AnalysisReport, SummarizeRequest, SummaryResponse};
use crate::reviews::{extract_app_id, ReviewAggregator};
use crate::summarize::TextSummarizationPipeline;
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<ReviewAggregator>,
    pub pipeline: Arc<TextSummarizationPipeline>,
    pub extractor: Arc<dyn ArticleExtractor>,
    /// Reviews to collect per analysis.
    pub review_count: usize,
    /// Summary bounds used when a request doesn't give any.
    pub default_min_length: usize,
    pub default_max_length: usize,
}

/// Build the router with CORS and request timeout layers.
///
/// CORS is the outermost layer so timed-out responses still carry the
/// allow-origin header.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/analyze", get(handle_analyze))
        .route("/summarize", post(handle_summarize))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(timeout_error_body))
        .layer(cors)
}

/// Give the bare 408 from the timeout layer the usual `{error}` body.
async fn timeout_error_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(host: &str, port: u16, state: AppState, request_timeout: Duration) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state, request_timeout))
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// GET /health
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeQuery {
    url: Option<String>,
}

/// GET /analyze?url=<store url>
async fn handle_analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> AppResult<Json<AnalysisReport>> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("No URL provided".to_string()))?;
    let app_id = extract_app_id(&url)
        .ok_or_else(|| AppError::InvalidInput("Invalid Steam URL".to_string()))?;

    info!("Analyzing reviews for app {}", app_id);
    let report = state.aggregator.aggregate(&app_id, state.review_count).await?;
    Ok(Json(report))
}

/// POST /summarize
async fn handle_summarize(
    State(state): State<AppState>,
    body: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> AppResult<Json<SummaryResponse>> {
    let Json(request) =
        body.map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;

    let text = match (request.text, request.url) {
        (Some(text), _) => text,
        (None, Some(url)) => {
            info!("Extracting article from {}", url);
            let text = state
                .extractor
                .extract(&url)
                .await
                .map_err(|e| AppError::Extraction(format!("{:#}", e)))?;
            if text.trim().is_empty() {
                return Err(AppError::Extraction(
                    "No article text found at URL".to_string(),
                ));
            }
            text
        }
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Provide either 'text' or 'url'".to_string(),
            ))
        }
    };

    let min_len = request.min_length.unwrap_or(state.default_min_length);
    let max_len = request.max_length.unwrap_or(state.default_max_length);
    let summary = state.pipeline.summarize(&text, min_len, max_len).await?;

    Ok(Json(SummaryResponse { summary }))
}
