//! Request ID middleware.
//!
//! Accepts a well-formed incoming `x-request-id` or mints a UUID, runs the
//! rest of the stack inside a span carrying it, and echoes it back on the
//! response.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Header name used for the request identifier.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied id we pass through.
const MAX_ID_LEN: usize = 128;

/// Request identifier stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn accept_client_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let well_formed = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    well_formed.then(|| id.to_string())
}

pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(accept_client_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!("request", request_id = %id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), val);
    }

    response
}
