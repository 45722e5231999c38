use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use adoptly_auth_types::token::AuthError;
use adoptly_domain::application::{AlreadyDecided, ApplicationStatus};

/// Service error variants. Rendered as `{"kind", "message"}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password reset token is invalid or has expired")]
    InvalidResetToken,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("user not found")]
    UserNotFound,
    #[error("pet not found")]
    PetNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("not found - {0}")]
    RouteNotFound(String),
    #[error("user already exists")]
    EmailTaken,
    #[error("you have already applied for this pet")]
    AlreadyApplied,
    #[error("pet is not available for adoption")]
    PetUnavailable,
    #[error("pet has already been adopted")]
    PetAlreadyAdopted,
    #[error("application already {0}")]
    AlreadyDecided(ApplicationStatus),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::PetNotFound => "PET_NOT_FOUND",
            Self::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Self::RouteNotFound(_) => "ROUTE_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::AlreadyApplied => "ALREADY_APPLIED",
            Self::PetUnavailable => "PET_UNAVAILABLE",
            Self::PetAlreadyAdopted => "PET_ALREADY_ADOPTED",
            Self::AlreadyDecided(_) => "ALREADY_DECIDED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidResetToken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::PetNotFound
            | Self::ApplicationNotFound
            | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken
            | Self::AlreadyApplied
            | Self::PetUnavailable
            | Self::PetAlreadyAdopted
            | Self::AlreadyDecided(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 4xx are already visible in the TraceLayer span; only 500s carry a cause worth logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Missing => Self::Unauthenticated(err.to_string()),
            AuthError::Signing(msg) => Self::Internal(anyhow::anyhow!("sign token: {msg}")),
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed => {
                Self::Unauthenticated("not authorized, token failed".into())
            }
        }
    }
}

impl From<AlreadyDecided> for ApiError {
    fn from(err: AlreadyDecided) -> Self {
        Self::AlreadyDecided(err.0)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(err.body_text())
    }
}
