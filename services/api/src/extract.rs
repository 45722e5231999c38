//! Request extractors that reject with [`ApiError`].

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;

use adoptly_auth_types::identity::Authenticated;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;

/// `axum::Json` with malformed bodies reported as `VALIDATION` errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with bad segments reported as `VALIDATION` errors.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// The signed-in user, loaded fresh from the database.
///
/// 401 when the token is missing or invalid, or when its user no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    // Same shape as `Authenticated`: borrow nothing from `parts` past this point.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let authenticated = Authenticated::from_request_parts(parts, state);
        let users = state.user_repo();

        async move {
            let Authenticated(info) = authenticated.await?;
            let user = users
                .find_by_id(info.user_id)
                .await?
                .ok_or_else(|| ApiError::Unauthenticated("not authorized, user not found".into()))?;
            Ok(Self(user))
        }
    }
}
