use axum::Json;
use axum::http::Uri;

use crate::error::ApiError;
use crate::handlers::MessageResponse;

// ── GET /api/v1 ──────────────────────────────────────────────────────────────

pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse::new("Adoptly API is up and running!"))
}

/// Router fallback.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
