use axum::{Router, response::IntoResponse, response::Json, routing::get};

/// Build the health router (shared between production startup and tests).
pub fn build_app() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
