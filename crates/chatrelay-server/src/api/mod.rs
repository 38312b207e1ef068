pub mod error;
pub mod messages;

use axum::{
    Router,
    routing::{get, post},
};
use chatrelay_core::AppCore;
use std::sync::Arc;

/// Shared handler state.
pub type AppState = Arc<AppCore>;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> axum::Json<Health> {
    axum::Json(Health {
        status: "chatrelay is working!".to_string(),
    })
}

/// Assemble the HTTP surface.
pub fn router(core: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/whatsapp", post(messages::relay_message))
        .with_state(core)
}
