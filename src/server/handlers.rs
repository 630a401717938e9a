//! Request handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::state::AppState;
use crate::domain::JobRecord;

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DebugExtractRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct DebugExtractResponse {
    pub url: String,
    pub adapter: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<JobRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /scrape`: always answers 200 with the batch output.
/// A missing or unreadable body counts as an empty batch.
pub async fn scrape(State(state): State<AppState>, body: Bytes) -> Json<Vec<JobRecord>> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ScrapeRequest::default()
    } else {
        serde_json::from_slice::<ScrapeRequest>(&body).unwrap_or_else(|e| {
            warn!("Unreadable /scrape body, treating as empty batch: {}", e);
            ScrapeRequest::default()
        })
    };

    Json(state.orchestrator.run_batch(&request.urls).await)
}

pub async fn healthz() -> Json<Value> {
    debug!("service is live");
    Json(json!({ "status": "ok" }))
}

/// `POST /debug/extract`: one adapter invocation, raw output, no dedup
pub async fn debug_extract(
    State(state): State<AppState>,
    Json(request): Json<DebugExtractRequest>,
) -> (StatusCode, Json<DebugExtractResponse>) {
    let (route, result) = state.orchestrator.extract_raw(&request.url).await;
    let adapter = route.adapter_name();

    match result {
        Ok(records) => (
            StatusCode::OK,
            Json(DebugExtractResponse {
                url: request.url,
                adapter,
                records: Some(records),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(DebugExtractResponse {
                url: request.url,
                adapter,
                records: None,
                error: Some(format!("{}: {}", e.kind(), e)),
            }),
        ),
    }
}
