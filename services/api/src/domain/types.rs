use chrono::{DateTime, Utc};
use uuid::Uuid;

use adoptly_domain::application::ApplicationStatus;
use adoptly_domain::pet::{Gender, PetStatus, SearchField, Species};
use adoptly_domain::profile::ProfileType;

pub const DEFAULT_PICTURE: &str = "default-user-avatar.png";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

/// Registered account. `password_hash` never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: Option<String>,
    pub picture: String,
    pub profile_type: ProfileType,
    pub address: Address,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user may change on their own profile. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the contact number.
    pub contact: Option<Option<String>>,
    pub bio: Option<String>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PetSize {
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PetLocation {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<Gender>,
    pub size: PetSize,
    pub description: String,
    pub vaccinated: bool,
    pub special_needs: bool,
    pub adoption_fee: f64,
    pub location: PetLocation,
    pub images: Vec<String>,
    pub listed_by: Uuid,
    pub status: PetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn is_listed_by(&self, user_id: Uuid) -> bool {
        self.listed_by == user_id
    }
}

#[derive(Debug, Clone)]
pub struct Application {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub pet_id: Uuid,
    pub adoption_intent: String,
    pub pet_location_plan: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Browse-listing filter. Every `None` means "no restriction".
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub species: Option<Species>,
    /// Case-insensitive substring of `breed`.
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub status: Option<PetStatus>,
    pub vaccinated_only: bool,
    /// Case-insensitive substring search on one field.
    pub search: Option<(SearchField, String)>,
}

/// A page of pets together with the listing seller, newest first.
#[derive(Debug, Clone)]
pub struct PetPage {
    pub pets: Vec<(Pet, Option<User>)>,
    pub total: u64,
}

/// Image received through a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: bytes::Bytes,
}
