use axum::Json;
use axum::extract::State;
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use adoptly_auth_types::cookie::set_token_cookie;
use adoptly_domain::profile::ProfileType;

use crate::domain::types::{Address, User};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};
use crate::infra::db::{DbPetRepository, DbUserRepository};
use crate::state::AppState;
use crate::usecase::auth::Session;
use crate::usecase::user::{
    AddressInput, GetProfileUseCase, ListUsersUseCase, Profile, SwitchProfileUseCase,
    UpdateAvatarUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

/// The short form of a user embedded in auth responses and user lists.
#[derive(Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_type: ProfileType,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_type: user.profile_type,
        }
    }
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            city: a.city,
            state: a.state,
            country: a.country,
            pincode: a.pincode,
        }
    }
}

/// The caller's own profile. Never carries the password hash.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub picture: String,
    pub profile_type: ProfileType,
    pub address: AddressResponse,
    pub bio: Option<String>,
    pub listed_pets: Vec<Uuid>,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(Profile { user, listed_pets }: Profile) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            contact: user.contact,
            picture: user.picture,
            profile_type: user.profile_type,
            address: user.address.into(),
            bio: user.bio,
            listed_pets,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct PublicProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub picture: String,
    pub profile_type: ProfileType,
    pub address: AddressResponse,
    pub bio: Option<String>,
    pub listed_pets: Vec<Uuid>,
}

impl From<Profile> for PublicProfileResponse {
    fn from(Profile { user, listed_pets }: Profile) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            picture: user.picture,
            profile_type: user.profile_type,
            address: user.address.into(),
            bio: user.bio,
            listed_pets,
        }
    }
}

fn profile_usecase(state: &AppState) -> GetProfileUseCase<DbUserRepository, DbPetRepository> {
    GetProfileUseCase {
        users: state.user_repo(),
        pets: state.pet_repo(),
    }
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = profile_usecase(&state).for_user(user).await?;
    Ok(Json(profile.into()))
}

// ── PUT /users/me ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddressRequest {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub bio: Option<String>,
    pub address: Option<AddressRequest>,
}

pub async fn update_me(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateMeRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let updated = usecase
        .execute(
            user.id,
            UpdateProfileInput {
                name: body.name,
                contact: body.contact,
                bio: body.bio,
                address: body.address.map(|a| AddressInput {
                    city: a.city,
                    state: a.state,
                    country: a.country,
                    pincode: a.pincode,
                }),
            },
        )
        .await?;
    let profile = profile_usecase(&state).for_user(updated).await?;
    Ok(Json(profile.into()))
}

// ── PUT /users/me/switch-profile ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct SwitchProfileResponse {
    pub message: String,
    pub user: UserSummary,
}

pub async fn switch_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SwitchProfileResponse>), ApiError> {
    let usecase = SwitchProfileUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let Session { user, token } = usecase.execute(&user).await?;

    let jar = set_token_cookie(jar, token, state.cookie_secure);
    Ok((
        jar,
        Json(SwitchProfileResponse {
            message: format!("profile switched to {}", user.profile_type),
            user: UserSummary::from(&user),
        }),
    ))
}

// ── PUT /users/me/avatar ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAvatarRequest {
    #[serde(default)]
    pub picture: String,
}

pub async fn update_avatar(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateAvatarRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = UpdateAvatarUseCase {
        users: state.user_repo(),
    };
    let updated = usecase.execute(user.id, &body.picture).await?;
    let profile = profile_usecase(&state).for_user(updated).await?;
    Ok(Json(profile.into()))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    _: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.iter().map(UserSummary::from).collect()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    _: CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PublicProfileResponse>, ApiError> {
    let profile = profile_usecase(&state).execute(id).await?;
    Ok(Json(profile.into()))
}
