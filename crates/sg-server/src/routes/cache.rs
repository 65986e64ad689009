//! Cache invalidation route handler.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use sg_core::GALLERY_CACHE_KEY;

use crate::context::AppContext;
use crate::error::{AppError, ErrorBody};
use crate::middleware::request_id::RequestId;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: String,
}

/// POST /clear-cache
#[utoipa::path(
    post,
    path = "/clear-cache",
    responses(
        (status = 200, description = "Gallery cache entry removed", body = ClearCacheResponse),
        (status = 400, description = "Cache store not available", body = ErrorBody)
    )
)]
pub async fn clear_cache(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ClearCacheResponse>, AppError> {
    ctx.gallery
        .clear(GALLERY_CACHE_KEY)
        .await
        .map_err(|e| AppError::new(e).with_request_id(request_id.0))?;

    Ok(Json(ClearCacheResponse {
        success: true,
        message: "Cache cleared".into(),
    }))
}
