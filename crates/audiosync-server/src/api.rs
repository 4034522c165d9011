//! HTTP endpoints
//!
//! JSON in, JSON out. Alignment failures map to 500 responses carrying the
//! failure message; malformed requests map to 400.

use std::path::PathBuf;

use audiosync_core::SyncOutcome;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// POST /sync request body
#[derive(Deserialize, Debug)]
pub struct SyncRequest {
    pub reference_file: Option<String>,
    pub target_file: Option<String>,
}

/// Successful sync response
#[derive(Serialize, Deserialize, Debug)]
pub struct SyncResponse {
    /// Offset of the target relative to the reference, in seconds
    pub offset: f64,
}

/// Error body shared by all endpoints
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    /// Present (and false) only when the alignment itself failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

/// Build a JSON error response
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: None,
            error: message.into(),
        }),
    )
        .into_response()
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: audiosync_core::SERVICE_NAME.to_string(),
    })
}

/// GET /
///
/// Describes the service and how to call it.
pub async fn index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Audio Sync API",
        "version": audiosync_core::VERSION,
        "build_date": audiosync_core::BUILD_DATE,
        "endpoints": {
            "POST /sync": "Sync two audio files using file paths (requires APIKEY header)",
            "GET /health": "Health check",
        },
        "supported_formats": state.processor.supported_formats(),
        "authentication": "Required: APIKEY header for /sync endpoint",
        "usage": {
            "sync": {
                "method": "POST",
                "content_type": "application/json",
                "headers": { "APIKEY": "your-api-key" },
                "payload": {
                    "reference_file": "/path/to/reference.wav",
                    "target_file": "/path/to/target.wav",
                },
            },
        },
    }))
}

/// POST /sync
///
/// Decodes both files and returns the offset of `target_file` relative to
/// `reference_file`.
pub async fn sync_audio(
    State(state): State<AppState>,
    payload: Result<Json<SyncRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "sync_payload_rejected");
            return error_response(StatusCode::BAD_REQUEST, "JSON payload required");
        }
    };

    let non_empty = |field: Option<String>| field.filter(|s| !s.trim().is_empty());
    let (reference, target) = match (
        non_empty(request.reference_file),
        non_empty(request.target_file),
    ) {
        (Some(reference), Some(target)) => (PathBuf::from(reference), PathBuf::from(target)),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Both reference_file and target_file are required",
            )
        }
    };

    let processor = state.processor.clone();
    let result =
        tokio::task::spawn_blocking(move || processor.sync_files(&reference, &target)).await;

    match result {
        Ok(Ok(SyncOutcome::Success { offset_seconds })) => {
            Json(SyncResponse {
                offset: offset_seconds,
            })
            .into_response()
        }
        Ok(Ok(SyncOutcome::Failure { message })) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: Some(false),
                error: message,
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "sync_validation_failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "sync_task_failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
