//! HTTP surface tests driven through `tower::ServiceExt::oneshot`
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use jobscrape_lib::application::{AdapterRouter, AdapterSet, BatchOrchestrator};
use jobscrape_lib::infrastructure::extract_error::{ExtractError, ExtractResult};
use jobscrape_lib::infrastructure::page_source::{LoadHints, LoadedPage, PageSource};
use jobscrape_lib::server::{AppState, build_routes};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Two identical cards for any URL under `ok.example.com`, failure otherwise
struct TwinCards;

#[async_trait]
impl PageSource for TwinCards {
    fn name(&self) -> &'static str {
        "twin-cards"
    }

    async fn load(&self, url: &str, _hints: LoadHints) -> ExtractResult<LoadedPage> {
        if url.contains("ok.example.com") {
            Ok(LoadedPage {
                final_url: url.to_string(),
                html: r#"<article><h2>Agent d'accueil</h2></article><article><h2>Agent d'accueil</h2></article>"#
                    .to_string(),
            })
        } else {
            Err(ExtractError::HttpStatus {
                status: 500,
                url: url.to_string(),
            })
        }
    }
}

fn app() -> axum::Router {
    let adapters = AdapterSet::from_sources(Arc::new(TwinCards), Arc::new(TwinCards)).unwrap();
    build_routes(AppState::new(BatchOrchestrator::new(AdapterRouter::default(), adapters)))
}

async fn call(method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (status, body) = call("GET", "/healthz", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn scrape_with_empty_or_missing_urls_returns_empty_array() {
    for payload in [json!({}), json!({ "urls": [] })] {
        let (status, body) = call("POST", "/scrape", Body::from(payload.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    let (status, body) = call("POST", "/scrape", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn scrape_is_always_ok_and_isolates_failures() {
    let payload = json!({ "urls": ["https://ok.example.com/jobs", "https://down.example.com/jobs"] });
    let (status, body) = call("POST", "/scrape", Body::from(payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["poste"], "Agent d'accueil");
    assert_eq!(records[1]["source"], "https://down.example.com/jobs");
    assert!(records[1]["commentaires"].as_str().unwrap().starts_with("ERROR: FetchError: HTTP 500"));
}

#[tokio::test]
async fn debug_extract_returns_raw_records() {
    let payload = json!({ "url": "https://ok.example.com/jobs" });
    let (status, body) = call("POST", "/debug/extract", Body::from(payload.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["adapter"], "static");
    assert_eq!(body["records"].as_array().unwrap().len(), 2);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn debug_extract_reports_failures_as_bad_gateway() {
    let payload = json!({ "url": "https://down.example.com/jobs" });
    let (status, body) = call("POST", "/debug/extract", Body::from(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["url"], "https://down.example.com/jobs");
    assert!(body["error"].as_str().unwrap().starts_with("FetchError"));
    assert!(body.get("records").is_none());
}
