use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use adoptly_api::domain::email::OutgoingEmail;
use adoptly_api::domain::repository::{
    ApplicationRepository, ImageStore, Mailer, PetRepository, UserRepository,
};
use adoptly_api::domain::types::{
    Address, Application, DEFAULT_PICTURE, Pet, PetFilter, PetLocation, PetPage, PetSize,
    ProfileUpdate, User,
};
use adoptly_api::domain::workflow::DecisionPlan;
use adoptly_api::error::ApiError;
use adoptly_api::infra::password::hash_password;
use adoptly_domain::application::ApplicationStatus;
use adoptly_domain::pagination::PageRequest;
use adoptly_domain::pet::{PetStatus, SearchField, Species};
use adoptly_domain::profile::ProfileType;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// Reset tokens are kept beside the users they belong to.
#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub reset_tokens: Arc<Mutex<Vec<(Uuid, String, DateTime<Utc>)>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut User)) -> Result<User, ApiError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.modify(id, |u| {
            if let Some(name) = &update.name {
                u.name = name.clone();
            }
            if let Some(contact) = &update.contact {
                u.contact = contact.clone();
            }
            if let Some(bio) = &update.bio {
                u.bio = Some(bio.clone());
            }
            if let Some(address) = &update.address {
                u.address = address.clone();
            }
        })
    }

    async fn set_profile_type(
        &self,
        id: Uuid,
        profile_type: ProfileType,
    ) -> Result<User, ApiError> {
        self.modify(id, |u| u.profile_type = profile_type)
    }

    async fn set_picture(&self, id: Uuid, picture: &str) -> Result<User, ApiError> {
        self.modify(id, |u| u.picture = picture.to_string())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut tokens = self.reset_tokens.lock().unwrap();
        tokens.retain(|(user_id, _, _)| *user_id != id);
        tokens.push((id, token_hash.to_string(), expires_at));
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, ApiError> {
        let user_id = self
            .reset_tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(_, hash, expires_at)| hash == token_hash && *expires_at > now)
            .map(|(id, _, _)| *id);
        Ok(user_id.and_then(|id| self.get(id)))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        self.modify(id, |u| u.password_hash = password_hash.to_string())?;
        self.reset_tokens
            .lock()
            .unwrap()
            .retain(|(user_id, _, _)| *user_id != id);
        Ok(())
    }
}

// ── MockPetRepo ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPetRepo {
    pub pets: Arc<Mutex<Vec<Pet>>>,
}

impl MockPetRepo {
    pub fn new(pets: Vec<Pet>) -> Self {
        Self {
            pets: Arc::new(Mutex::new(pets)),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Pet> {
        self.pets.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(pet: &Pet, filter: &PetFilter) -> bool {
    filter.species.is_none_or(|s| pet.species == s)
        && filter.gender.is_none_or(|g| pet.gender == Some(g))
        && filter.status.is_none_or(|s| pet.status == s)
        && (!filter.vaccinated_only || pet.vaccinated)
        && filter
            .breed
            .as_deref()
            .is_none_or(|b| pet.breed.as_deref().is_some_and(|pb| contains_ci(pb, b)))
        && filter.search.as_ref().is_none_or(|(field, q)| match field {
            SearchField::Name => contains_ci(&pet.name, q),
            SearchField::Breed => pet.breed.as_deref().is_some_and(|b| contains_ci(b, q)),
        })
}

impl PetRepository for MockPetRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, ApiError> {
        Ok(self.get(id))
    }

    async fn list(&self, filter: &PetFilter, page: PageRequest) -> Result<PetPage, ApiError> {
        let mut matching: Vec<Pet> = self
            .pets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;
        let pets = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|p| (p, None))
            .collect();
        Ok(PetPage { pets, total })
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Pet>, ApiError> {
        Ok(self
            .pets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.listed_by == owner)
            .cloned()
            .collect())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Pet>, ApiError> {
        Ok(self
            .pets
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, pet: &Pet) -> Result<(), ApiError> {
        self.pets.lock().unwrap().push(pet.clone());
        Ok(())
    }

    async fn update(&self, pet: &Pet, read_status: PetStatus) -> Result<(), ApiError> {
        let mut pets = self.pets.lock().unwrap();
        let slot = pets
            .iter_mut()
            .find(|p| p.id == pet.id)
            .ok_or(ApiError::PetNotFound)?;
        if slot.status == PetStatus::Adopted && read_status != PetStatus::Adopted {
            return Err(ApiError::PetAlreadyAdopted);
        }
        let status = if pet.status == read_status {
            slot.status
        } else {
            pet.status
        };
        *slot = Pet {
            status,
            ..pet.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.pets.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}

// ── MockApplicationRepo ──────────────────────────────────────────────────────

/// Shares the pet list with a [`MockPetRepo`] so decisions can adopt pets.
#[derive(Clone, Default)]
pub struct MockApplicationRepo {
    pub applications: Arc<Mutex<Vec<Application>>>,
    pub pets: Arc<Mutex<Vec<Pet>>>,
}

impl MockApplicationRepo {
    pub fn new(applications: Vec<Application>, pets: &MockPetRepo) -> Self {
        Self {
            applications: Arc::new(Mutex::new(applications)),
            pets: Arc::clone(&pets.pets),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Application> {
        self.applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }
}

impl ApplicationRepository for MockApplicationRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApiError> {
        Ok(self.get(id))
    }

    async fn exists_for(&self, applicant_id: Uuid, pet_id: Uuid) -> Result<bool, ApiError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.applicant_id == applicant_id && a.pet_id == pet_id))
    }

    async fn create(&self, application: &Application) -> Result<(), ApiError> {
        let pet_status = self
            .pets
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == application.pet_id)
            .map(|p| p.status)
            .ok_or(ApiError::PetNotFound)?;
        if pet_status != PetStatus::Available {
            return Err(ApiError::PetUnavailable);
        }
        let mut applications = self.applications.lock().unwrap();
        if applications
            .iter()
            .any(|a| a.applicant_id == application.applicant_id && a.pet_id == application.pet_id)
        {
            return Err(ApiError::AlreadyApplied);
        }
        applications.push(application.clone());
        Ok(())
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    async fn list_by_pet(&self, pet_id: Uuid) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.pet_id == pet_id)
            .cloned()
            .collect())
    }

    async fn apply_decision(&self, plan: &DecisionPlan) -> Result<Vec<Uuid>, ApiError> {
        let mut applications = self.applications.lock().unwrap();
        let target = applications
            .iter_mut()
            .find(|a| a.id == plan.application_id)
            .ok_or(ApiError::ApplicationNotFound)?;
        if target.status.is_decided() {
            return Err(ApiError::AlreadyDecided(target.status));
        }
        target.status = plan.status;

        if !plan.adopt_pet {
            return Ok(vec![]);
        }
        let mut pets = self.pets.lock().unwrap();
        let pet = pets
            .iter_mut()
            .find(|p| p.id == plan.pet_id)
            .ok_or(ApiError::PetNotFound)?;
        if pet.status == PetStatus::Adopted {
            return Err(ApiError::PetAlreadyAdopted);
        }
        pet.status = PetStatus::Adopted;

        let mut rejected = Vec::new();
        for sibling in applications.iter_mut().filter(|a| {
            a.pet_id == plan.pet_id
                && a.id != plan.application_id
                && a.status == ApplicationStatus::Pending
        }) {
            sibling.status = ApplicationStatus::Rejected;
            rejected.push(sibling.id);
        }
        Ok(rejected)
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for MockMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError> {
        if self.fail {
            return Err(ApiError::Internal(anyhow::anyhow!("smtp unavailable")));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

// ── MockImageStore ───────────────────────────────────────────────────────────

/// Records `(extension, size)` per saved file.
#[derive(Clone, Default)]
pub struct MockImageStore {
    pub saved: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockImageStore {
    pub fn saved(&self) -> Vec<(String, usize)> {
        self.saved.lock().unwrap().clone()
    }
}

impl ImageStore for MockImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let mut saved = self.saved.lock().unwrap();
        saved.push((extension.to_string(), bytes.len()));
        Ok(format!("/images/pets/{:032x}{extension}", saved.len()))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(profile_type: ProfileType) -> User {
    let id = Uuid::now_v7();
    let now = Utc::now();
    User {
        id,
        name: "Test User".into(),
        email: format!("{}@example.com", id.simple()),
        password_hash: String::new(),
        contact: Some("555-0100".into()),
        picture: DEFAULT_PICTURE.into(),
        profile_type,
        address: Address {
            city: Some("Pune".into()),
            ..Default::default()
        },
        bio: None,
        created_at: now,
        updated_at: now,
    }
}

pub async fn test_user_with_password(profile_type: ProfileType, password: &str) -> User {
    User {
        password_hash: hash_password(password.to_string()).await.unwrap(),
        ..test_user(profile_type)
    }
}

pub fn test_pet(owner: Uuid, species: Species) -> Pet {
    let now = Utc::now();
    Pet {
        id: Uuid::now_v7(),
        name: "Rex".into(),
        species,
        breed: Some("Labrador".into()),
        age: Some(2.0),
        gender: None,
        size: PetSize::default(),
        description: "Friendly and house trained".into(),
        vaccinated: true,
        special_needs: false,
        adoption_fee: 50.0,
        location: PetLocation {
            city: "Pune".into(),
            state: Some("MH".into()),
            country: "India".into(),
        },
        images: vec![],
        listed_by: owner,
        status: PetStatus::Available,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_application(
    applicant_id: Uuid,
    pet_id: Uuid,
    status: ApplicationStatus,
) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::now_v7(),
        applicant_id,
        pet_id,
        adoption_intent: "A loving home".into(),
        pet_location_plan: "Indoors with a garden".into(),
        status,
        created_at: now,
        updated_at: now,
    }
}
