//! JWT session tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use adoptly_domain::profile::ProfileType;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifetime in seconds (1 day). Shared by the JWT `exp` and the cookie Max-Age.
pub const TOKEN_TTL_SECS: u64 = 86_400;

/// Identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub profile_type: ProfileType,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("not authorized, no token")]
    Missing,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims payload.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `id` | user id (UUID string) |
/// | `profile_type` | `adopter` or `seller` at issue time |
/// | `iat` | issued-at, seconds since epoch |
/// | `exp` | expiry, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub profile_type: ProfileType,
    pub iat: u64,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign a session token for `user_id`. Returns the token and its `exp`.
pub fn issue_token(
    user_id: Uuid,
    profile_type: ProfileType,
    secret: &str,
) -> Result<(String, u64), AuthError> {
    let iat = now_secs();
    let exp = iat + TOKEN_TTL_SECS;
    let claims = Claims {
        id: user_id.to_string(),
        profile_type,
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok((token, exp))
}

/// Validate a token and return the identity it carries.
///
/// HS256 with `exp` required. Default 60s leeway applies.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let user_id = data
        .claims
        .id
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        profile_type: data.claims.profile_type,
        exp: data.claims.exp,
    })
}
