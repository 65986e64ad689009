//! Axum router construction.
//!
//! Builds the gallery API routes, middleware layers, the OpenAPI document,
//! and optional static file serving for the grid UI.

use std::path::PathBuf;

use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::images::list_images,
        routes::health::health_check,
        routes::cache::clear_cache,
    ),
    components(schemas(
        routes::images::ImagesResponse,
        routes::health::HealthResponse,
        routes::cache::ClearCacheResponse,
        crate::error::ErrorBody,
        sg_core::ImageDescriptor,
        sg_cache::CacheStatus,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/images", get(routes::images::list_images))
        .route("/health", get(routes::health::health_check))
        .route("/clear-cache", post(routes::cache::clear_cache))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving for the grid UI build.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                tower_http::services::ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(tower_http::services::ServeFile::new(index_path)),
            );
        } else {
            tracing::warn!("Static directory {:?} does not exist; UI not served", dir);
        }
    }

    app
}
