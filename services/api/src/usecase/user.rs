use uuid::Uuid;

use crate::domain::repository::{PetRepository, UserRepository};
use crate::domain::types::{Address, ProfileUpdate, User};
use crate::domain::validate::{self, MAX_BIO_LEN};
use crate::error::ApiError;
use crate::usecase::auth::{Session, start_session};

/// A user together with the ids of the pets they list.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub listed_pets: Vec<Uuid>,
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository, P: PetRepository> {
    pub users: U,
    pub pets: P,
}

impl<U: UserRepository, P: PetRepository> GetProfileUseCase<U, P> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        self.for_user(user).await
    }

    /// Attach listed pets to an already loaded user.
    pub async fn for_user(&self, user: User) -> Result<Profile, ApiError> {
        let listed_pets = self
            .pets
            .list_by_owner(user.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        Ok(Profile { user, listed_pets })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<User>, ApiError> {
        self.users.list().await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub bio: Option<String>,
    pub address: Option<AddressInput>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, ApiError> {
        let update = profile_update(input)?;
        self.users.update_profile(user_id, &update).await
    }
}

fn profile_update(input: UpdateProfileInput) -> Result<ProfileUpdate, ApiError> {
    let name = input
        .name
        .map(|n| validate::required_text("name", &n))
        .transpose()?;
    let bio = input.bio.map(|b| b.trim().to_string());
    if let Some(bio) = &bio {
        validate::max_chars("bio", bio, MAX_BIO_LEN)?;
    }
    Ok(ProfileUpdate {
        name,
        contact: input.contact.map(|c| validate::optional_text(Some(c))),
        bio,
        address: input.address.map(|a| Address {
            city: validate::optional_text(a.city),
            state: validate::optional_text(a.state),
            country: validate::optional_text(a.country),
            pincode: validate::optional_text(a.pincode),
        }),
    })
}

// ── SwitchProfile ────────────────────────────────────────────────────────────

pub struct SwitchProfileUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> SwitchProfileUseCase<U> {
    /// Toggle adopter⇄seller and start a session carrying the new role.
    pub async fn execute(&self, user: &User) -> Result<Session, ApiError> {
        let next = user.profile_type.toggled();
        let updated = self.users.set_profile_type(user.id, next).await?;
        tracing::info!(user_id = %user.id, profile_type = %next, "profile switched");
        start_session(updated, &self.jwt_secret)
    }
}

// ── UpdateAvatar ─────────────────────────────────────────────────────────────

pub struct UpdateAvatarUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateAvatarUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, picture: &str) -> Result<User, ApiError> {
        let picture = validate::required_text("picture", picture)?;
        self.users.set_picture(user_id, &picture).await
    }
}
