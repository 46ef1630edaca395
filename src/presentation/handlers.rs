// HTTP request handlers
use crate::domain::dataset::Dataset;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full mission dataset, fetched once by each client
pub async fn get_dataset(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Arc<Dataset>>, StatusCode> {
    match state.dataset_service.get_dataset(&name) {
        Some(dataset) => Ok(Json(dataset)),
        None => {
            tracing::debug!("Unknown dataset requested: {}", name);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
