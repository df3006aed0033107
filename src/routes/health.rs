use crate::{models::Envelope, state::AppState};
use axum::{response::Json, routing::get, Router};
use serde_json::Value;
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
}

async fn home() -> &'static str {
    "API Gateway OK"
}

/// GET /health
async fn health_check() -> Json<Envelope<Value>> {
    Json(Envelope::ok())
}
