#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use adoptly_domain::pagination::PageRequest;
use adoptly_domain::pet::PetStatus;
use adoptly_domain::profile::ProfileType;

use crate::domain::email::OutgoingEmail;
use crate::domain::types::{Application, Pet, PetFilter, PetPage, ProfileUpdate, User};
use crate::domain::workflow::DecisionPlan;
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    /// `email` must already be normalized (trimmed, lowercased).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError>;
    async fn list(&self) -> Result<Vec<User>, ApiError>;

    /// Insert a new user. A duplicate email yields [`ApiError::EmailTaken`].
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn set_profile_type(&self, id: Uuid, profile_type: ProfileType)
    -> Result<User, ApiError>;
    async fn set_picture(&self, id: Uuid, picture: &str) -> Result<User, ApiError>;

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError>;
    /// Find the user holding an unexpired reset token with this hash.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, ApiError>;
    /// Replace the password hash and clear any outstanding reset token.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError>;
}

/// Repository for pet listings.
pub trait PetRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, ApiError>;
    async fn list(&self, filter: &PetFilter, page: PageRequest) -> Result<PetPage, ApiError>;
    /// All pets listed by `owner`, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Pet>, ApiError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Pet>, ApiError>;
    async fn create(&self, pet: &Pet) -> Result<(), ApiError>;
    /// Write back an edited pet. `read_status` is the status it was loaded
    /// with; the status column is written only when `pet.status` differs.
    /// If the pet was adopted after it was read, nothing is written and
    /// [`ApiError::PetAlreadyAdopted`] is returned.
    async fn update(&self, pet: &Pet, read_status: PetStatus) -> Result<(), ApiError>;
    /// Delete a pet. Its applications go with it.
    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Repository for adoption applications.
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApiError>;
    async fn exists_for(&self, applicant_id: Uuid, pet_id: Uuid) -> Result<bool, ApiError>;
    /// Insert a new application. A second one for the same (applicant, pet)
    /// yields [`ApiError::AlreadyApplied`].
    async fn create(&self, application: &Application) -> Result<(), ApiError>;
    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>, ApiError>;
    async fn list_by_pet(&self, pet_id: Uuid) -> Result<Vec<Application>, ApiError>;

    /// Apply a decision atomically.
    ///
    /// The target application moves only while still `pending`. On approval
    /// the pet becomes `adopted` and every other `pending` application for
    /// it becomes `rejected`. Returns the ids of those auto-rejected siblings.
    async fn apply_decision(&self, plan: &DecisionPlan) -> Result<Vec<Uuid>, ApiError>;
}

/// Outbound email.
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError>;
}

/// Storage for uploaded pet images.
pub trait ImageStore: Send + Sync {
    /// Persist the bytes under a fresh name ending in `extension` (with dot,
    /// possibly empty) and return the public URL path.
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ApiError>;
}
