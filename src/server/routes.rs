use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use super::handlers::{debug_extract, healthz, scrape};
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/scrape", post(scrape))
        .route("/debug/extract", post(debug_extract))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
