// Presentation layer - HTTP routes and the live query socket
pub mod app_state;
pub mod handlers;
pub mod ws;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dataset, health_check};
use crate::presentation::ws::ws_handler;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ws_handler))
        .route("/healthz", get(health_check))
        .route("/datasets/:name", get(get_dataset))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
