//! API-key protection for alignment endpoints
//!
//! When a key is configured, requests must carry it in the `APIKEY` header.
//! With no key configured the check is skipped.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::error_response;
use crate::AppState;

/// Header carrying the client's key (header names are case-insensitive)
pub const API_KEY_HEADER: &str = "apikey";

/// Reject requests whose `APIKEY` header is missing or wrong
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.api_key.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    match provided.as_deref() {
        None => {
            tracing::debug!(path = %request.uri().path(), "api_key_missing");
            error_response(StatusCode::UNAUTHORIZED, "APIKEY header required")
        }
        Some(key) if key != expected => {
            tracing::warn!(path = %request.uri().path(), "api_key_invalid");
            error_response(StatusCode::UNAUTHORIZED, "Invalid API key")
        }
        Some(_) => next.run(request).await,
    }
}
