//! Gallery route handler.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use sg_core::{GallerySnapshot, ImageDescriptor, GALLERY_CACHE_KEY, GALLERY_CACHE_TTL};

use crate::context::AppContext;
use crate::error::{AppError, ErrorBody};
use crate::middleware::request_id::RequestId;

/// Successful gallery response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImagesResponse {
    pub success: bool,
    /// Whether `data` was served from the cache.
    pub cached: bool,
    #[schema(value_type = Vec<ImageDescriptor>)]
    pub data: GallerySnapshot,
}

/// GET /images
#[utoipa::path(
    get,
    path = "/images",
    responses(
        (status = 200, description = "Gallery snapshot", body = ImagesResponse),
        (status = 500, description = "Media host failure", body = ErrorBody)
    )
)]
pub async fn list_images(
    State(ctx): State<AppContext>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ImagesResponse>, AppError> {
    let (data, cached) = ctx
        .gallery
        .get_or_fetch(GALLERY_CACHE_KEY, GALLERY_CACHE_TTL)
        .await
        .map_err(|e| AppError::new(e).with_request_id(request_id.0))?;

    Ok(Json(ImagesResponse {
        success: true,
        cached,
        data,
    }))
}
