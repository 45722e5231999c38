use axum::http::StatusCode;

/// `GET /healthz`: process is alive.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: process is ready to take traffic.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
