//! The localhost HTTP surface.

mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::service::Engram;

pub use error::ApiError;

/// Build the full router. Ingest and recall enforce their per-request
/// timeouts inside the handlers.
pub fn router(engram: Arc<Engram>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        .route(
            "/api/memories",
            get(handlers::list_memories).post(handlers::create_memory),
        )
        .route(
            "/api/memories/:id",
            get(handlers::get_memory).delete(handlers::delete_memory),
        )
        .route("/api/memories/bulk-delete", post(handlers::bulk_delete))
        .route("/api/memories/search", post(handlers::search))
        .route("/api/consolidate", post(handlers::consolidate))
        .route("/api/contradictions", get(handlers::list_contradictions))
        .route(
            "/api/contradictions/:id/resolve",
            post(handlers::resolve_contradiction),
        )
        .route("/api/conflicts", get(handlers::list_conflicts))
        .layer(CorsLayer::permissive())
        .with_state(engram)
}
