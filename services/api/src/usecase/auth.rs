use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use adoptly_auth_types::token::issue_token;
use adoptly_domain::profile::ProfileType;

use crate::domain::email::password_reset;
use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::{Address, DEFAULT_PICTURE, User};
use crate::domain::validate;
use crate::error::ApiError;
use crate::infra::password::{hash_password, verify_password};

/// Reset links stay valid for one hour.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// A signed-in user and the JWT for their session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub fn start_session(user: User, jwt_secret: &str) -> Result<Session, ApiError> {
    let (token, _exp) = issue_token(user.id, user.profile_type, jwt_secret)?;
    Ok(Session { user, token })
}

/// Reset tokens are stored as their SHA-256 hex digest only.
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_type: Option<String>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<Session, ApiError> {
        let profile_type = input
            .profile_type
            .as_deref()
            .and_then(|p| p.parse::<ProfileType>().ok())
            .ok_or_else(|| ApiError::validation("profile_type must be 'adopter' or 'seller'"))?;
        let name = validate::required_text("name", &input.name)?;
        let email = validate::normalize_email(&input.email)?;
        validate::password(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash: hash_password(input.password).await?,
            contact: validate::optional_text(input.contact),
            picture: DEFAULT_PICTURE.to_string(),
            profile_type,
            address: Address {
                city: validate::optional_text(input.city),
                state: validate::optional_text(input.state),
                country: validate::optional_text(input.country),
                pincode: None,
            },
            bio: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, profile_type = %user.profile_type, "user registered");

        start_session(user, &self.jwt_secret)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn execute(&self, email: &str, password: String) -> Result<Session, ApiError> {
        let email = validate::normalize_email(email).map_err(|_| ApiError::InvalidCredentials)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(password, user.password_hash.clone()).await? {
            return Err(ApiError::InvalidCredentials);
        }
        start_session(user, &self.jwt_secret)
    }
}

// ── Forgot / reset password ──────────────────────────────────────────────────

pub struct ForgotPasswordUseCase<R: UserRepository, M: Mailer> {
    pub users: R,
    pub mailer: M,
    pub frontend_url: String,
}

impl<R: UserRepository, M: Mailer> ForgotPasswordUseCase<R, M> {
    /// Always succeeds for well-formed requests so callers cannot probe for accounts.
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let Ok(email) = validate::normalize_email(email) else {
            return Ok(());
        };
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(());
        };

        let token = hex::encode(rand::random::<[u8; 32]>());
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.users
            .set_reset_token(user.id, &hash_reset_token(&token), expires_at)
            .await?;

        let url = format!(
            "{}/reset-password/{token}",
            self.frontend_url.trim_end_matches('/')
        );
        if let Err(e) = self.mailer.send(password_reset(&user.email, &url)).await {
            tracing::warn!(user_id = %user.id, error = %e, "failed to send password reset email");
        }
        Ok(())
    }
}

pub struct ResetPasswordUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> ResetPasswordUseCase<R> {
    pub async fn execute(&self, token: &str, password: String) -> Result<(), ApiError> {
        validate::password(&password)?;
        let user = self
            .users
            .find_by_reset_token(&hash_reset_token(token.trim()), Utc::now())
            .await?
            .ok_or(ApiError::InvalidResetToken)?;

        let hash = hash_password(password).await?;
        self.users.update_password(user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
