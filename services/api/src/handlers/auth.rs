use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use adoptly_auth_types::cookie::{clear_token_cookie, set_token_cookie};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::handlers::MessageResponse;
use crate::handlers::user::UserSummary;
use crate::state::AppState;
use crate::usecase::auth::{
    ForgotPasswordUseCase, LoginUseCase, RegisterInput, RegisterUseCase, ResetPasswordUseCase,
    Session,
};

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserSummary,
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub contact: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_type: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let Session { user, token } = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            contact: body.contact,
            city: body.city,
            state: body.state,
            country: body.country,
            profile_type: body.profile_type,
        })
        .await?;

    let jar = set_token_cookie(jar, token, state.cookie_secure);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "user registered successfully",
            token: None,
            user: UserSummary::from(&user),
        }),
    ))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let Session { user, token } = usecase.execute(&body.email, body.password).await?;

    let jar = set_token_cookie(jar, token.clone(), state.cookie_secure);
    Ok((
        jar,
        Json(AuthResponse {
            message: "login successful",
            token: Some(token),
            user: UserSummary::from(&user),
        }),
    ))
}

// ── POST /auth/logout ────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        clear_token_cookie(jar, state.cookie_secure),
        Json(MessageResponse::new("logged out successfully")),
    )
}

// ── POST /auth/forgot-password ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
        frontend_url: state.frontend_url.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(Json(MessageResponse::new(
        "if that email is registered, a reset link has been sent",
    )))
}

// ── POST /auth/reset-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
    };
    usecase.execute(&body.token, body.password).await?;
    Ok(Json(MessageResponse::new("password has been reset")))
}
