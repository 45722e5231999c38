//! Session extractor: `Authorization: Bearer` first, then the `token` cookie.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::cookie::TOKEN_COOKIE;
use crate::token::{AuthError, TokenInfo, validate_token};

/// Router state that can hand out the JWT signing secret.
pub trait JwtSecretProvider {
    fn jwt_secret(&self) -> &str;
}

/// Identity of the caller, taken from a valid session token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub TokenInfo);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|s| !s.is_empty())
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: JwtSecretProvider + Send + Sync,
{
    type Rejection = AuthError;

    // Values are pulled out synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AuthError::Missing)
            .and_then(|token| validate_token(&token, state.jwt_secret()));

        async move { result.map(Self) }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::Missing => self.to_string(),
            _ => {
                tracing::debug!(error = %self, "rejected session token");
                "not authorized, token failed".to_string()
            }
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "kind": "UNAUTHENTICATED", "message": message })),
        )
            .into_response()
    }
}
