//! Health check route handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use sg_cache::CacheStatus;

use crate::context::AppContext;

/// Liveness of the service and its cache store.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub cache: CacheStatus,
}

/// GET /health
///
/// Always 200: a disconnected cache only degrades the gallery.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        cache: ctx.cache.status(),
    })
}
