//! Session helpers for HTTP tests.
//!
//! Signs a real JWT with the test secret so requests pass through the same
//! `Authenticated` extractor production traffic does.

use adoptly_auth_types::cookie::TOKEN_COOKIE;
use adoptly_auth_types::token::issue_token;
use adoptly_domain::profile::ProfileType;
use axum::http::{HeaderName, HeaderValue, header};
use uuid::Uuid;

pub struct TestSession {
    pub user_id: Uuid,
    pub profile_type: ProfileType,
    pub token: String,
}

impl TestSession {
    /// Panics if signing fails; test-only.
    pub fn new(user_id: Uuid, profile_type: ProfileType, secret: &str) -> Self {
        let (token, _) = issue_token(user_id, profile_type, secret).expect("sign test token");
        Self {
            user_id,
            profile_type,
            token,
        }
    }

    pub fn seller(secret: &str) -> Self {
        Self::new(Uuid::now_v7(), ProfileType::Seller, secret)
    }

    pub fn adopter(secret: &str) -> Self {
        Self::new(Uuid::now_v7(), ProfileType::Adopter, secret)
    }

    /// `Cookie: token=<jwt>`
    pub fn cookie(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("{TOKEN_COOKIE}={}", self.token))
            .expect("cookie header value");
        (header::COOKIE, value)
    }

    /// `Authorization: Bearer <jwt>`
    pub fn bearer(&self) -> (HeaderName, HeaderValue) {
        let value =
            HeaderValue::from_str(&format!("Bearer {}", self.token)).expect("bearer header value");
        (header::AUTHORIZATION, value)
    }
}
