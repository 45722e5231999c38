use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use adoptly_domain::UnknownVariant;
use adoptly_domain::pagination::PageRequest;
use adoptly_domain::pet::{Gender, PetStatus, SearchField, Species, parse_filter};
use adoptly_domain::profile::ProfileType;

use crate::domain::repository::{PetRepository, UserRepository};
use crate::domain::types::{Pet, PetFilter, PetLocation, PetPage, PetSize, User};
use crate::domain::validate::{self, MAX_DESCRIPTION_LEN};
use crate::error::ApiError;

fn invalid(e: UnknownVariant) -> ApiError {
    ApiError::validation(e.to_string())
}

// ── Browse ───────────────────────────────────────────────────────────────────

/// Raw browse-page query. Enum values are parsed in [`build_filter`] so a
/// bad value yields a validation error naming the field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListPetsQuery {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    pub vaccinated: Option<String>,
    pub search_by: Option<String>,
    pub search_query: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListPetsQuery {
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            limit: self.limit.unwrap_or(defaults.limit),
            page: self.page.unwrap_or(defaults.page),
        }
        .clamped()
    }
}

pub fn build_filter(query: &ListPetsQuery) -> Result<PetFilter, ApiError> {
    let search = match (query.search_by.as_deref(), query.search_query.as_deref()) {
        (Some(by), Some(q)) if !q.trim().is_empty() => {
            let field = by.parse::<SearchField>().map_err(invalid)?;
            Some((field, q.trim().to_string()))
        }
        _ => None,
    };

    Ok(PetFilter {
        species: parse_filter::<Species>(query.species.as_deref()).map_err(invalid)?,
        breed: validate::optional_text(query.breed.clone()),
        gender: parse_filter::<Gender>(query.gender.as_deref()).map_err(invalid)?,
        status: parse_filter::<PetStatus>(query.status.as_deref()).map_err(invalid)?,
        vaccinated_only: query
            .vaccinated
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
        search,
    })
}

pub struct ListPetsUseCase<P: PetRepository> {
    pub pets: P,
}

impl<P: PetRepository> ListPetsUseCase<P> {
    pub async fn execute(&self, query: &ListPetsQuery) -> Result<PetPage, ApiError> {
        let filter = build_filter(query)?;
        self.pets.list(&filter, query.page_request()).await
    }
}

pub struct GetPetUseCase<P: PetRepository, U: UserRepository> {
    pub pets: P,
    pub users: U,
}

impl<P: PetRepository, U: UserRepository> GetPetUseCase<P, U> {
    /// The pet and its seller, if the seller still exists.
    pub async fn execute(&self, id: Uuid) -> Result<(Pet, Option<User>), ApiError> {
        let pet = self.pets.find_by_id(id).await?.ok_or(ApiError::PetNotFound)?;
        let owner = self.users.find_by_id(pet.listed_by).await?;
        Ok((pet, owner))
    }
}

pub struct ListMyPetsUseCase<P: PetRepository> {
    pub pets: P,
}

impl<P: PetRepository> ListMyPetsUseCase<P> {
    pub async fn execute(&self, owner: Uuid) -> Result<Vec<Pet>, ApiError> {
        self.pets.list_by_owner(owner).await
    }
}

// ── Create / update / delete ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SizeFields {
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthFields {
    pub vaccinated: Option<bool>,
    pub special_needs: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationFields {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Listing fields as sent by the client. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PetFields {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub size: Option<SizeFields>,
    pub description: Option<String>,
    pub health_status: Option<HealthFields>,
    pub adoption_fee: Option<f64>,
    pub location: Option<LocationFields>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
}

fn apply_fields(pet: &mut Pet, fields: PetFields) -> Result<(), ApiError> {
    if let Some(name) = fields.name {
        pet.name = name.trim().to_string();
    }
    if let Some(species) = fields.species {
        pet.species = species.parse().map_err(invalid)?;
    }
    if fields.breed.is_some() {
        pet.breed = validate::optional_text(fields.breed);
    }
    if fields.age.is_some() {
        pet.age = fields.age;
    }
    if let Some(gender) = validate::optional_text(fields.gender) {
        pet.gender = Some(gender.parse().map_err(invalid)?);
    }
    if let Some(size) = fields.size {
        pet.size = PetSize {
            height: size.height.or(pet.size.height),
            weight: size.weight.or(pet.size.weight),
        };
    }
    if let Some(description) = fields.description {
        pet.description = description.trim().to_string();
    }
    if let Some(health) = fields.health_status {
        pet.vaccinated = health.vaccinated.unwrap_or(pet.vaccinated);
        pet.special_needs = health.special_needs.unwrap_or(pet.special_needs);
    }
    if let Some(fee) = fields.adoption_fee {
        pet.adoption_fee = fee;
    }
    if let Some(location) = fields.location {
        if let Some(city) = location.city {
            pet.location.city = city.trim().to_string();
        }
        if location.state.is_some() {
            pet.location.state = validate::optional_text(location.state);
        }
        if let Some(country) = location.country {
            pet.location.country = country.trim().to_string();
        }
    }
    if let Some(images) = fields.images {
        pet.images = images
            .into_iter()
            .filter_map(|url| validate::optional_text(Some(url)))
            .collect();
    }
    if let Some(status) = fields.status {
        let status: PetStatus = status.parse().map_err(invalid)?;
        // `adopted` is set by an approval and is final.
        if pet.status == PetStatus::Adopted {
            if status != PetStatus::Adopted {
                return Err(ApiError::PetAlreadyAdopted);
            }
        } else if status == PetStatus::Adopted {
            return Err(ApiError::validation(
                "status can only be set to available or pending",
            ));
        }
        pet.status = status;
    }
    Ok(())
}

fn validate_pet(pet: &Pet) -> Result<(), ApiError> {
    validate::required_text("name", &pet.name)?;
    validate::required_text("description", &pet.description)?;
    validate::max_chars("description", &pet.description, MAX_DESCRIPTION_LEN)?;
    validate::required_text("location.city", &pet.location.city)?;
    validate::required_text("location.country", &pet.location.country)?;
    validate::non_negative("age", pet.age)?;
    validate::non_negative("size.height", pet.size.height)?;
    validate::non_negative("size.weight", pet.size.weight)?;
    validate::non_negative("adoption_fee", Some(pet.adoption_fee))?;
    Ok(())
}

pub struct CreatePetUseCase<P: PetRepository> {
    pub pets: P,
}

impl<P: PetRepository> CreatePetUseCase<P> {
    pub async fn execute(&self, seller: &User, fields: PetFields) -> Result<Pet, ApiError> {
        if seller.profile_type != ProfileType::Seller {
            return Err(ApiError::Forbidden("only sellers can list pets"));
        }
        let species = fields
            .species
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::validation("species is required"))?
            .parse::<Species>()
            .map_err(invalid)?;

        let now = Utc::now();
        let mut pet = Pet {
            id: Uuid::now_v7(),
            name: String::new(),
            species,
            breed: None,
            age: None,
            gender: None,
            size: PetSize::default(),
            description: String::new(),
            vaccinated: false,
            special_needs: false,
            adoption_fee: 0.0,
            location: PetLocation {
                city: String::new(),
                state: None,
                country: String::new(),
            },
            images: Vec::new(),
            listed_by: seller.id,
            status: PetStatus::Available,
            created_at: now,
            updated_at: now,
        };
        apply_fields(&mut pet, fields)?;
        validate_pet(&pet)?;

        self.pets.create(&pet).await?;
        tracing::info!(pet_id = %pet.id, seller_id = %seller.id, "pet listed");
        Ok(pet)
    }
}

/// Load a pet and make sure `user_id` listed it.
async fn owned_pet<P: PetRepository>(pets: &P, id: Uuid, user_id: Uuid) -> Result<Pet, ApiError> {
    let pet = pets.find_by_id(id).await?.ok_or(ApiError::PetNotFound)?;
    if !pet.is_listed_by(user_id) {
        return Err(ApiError::Forbidden("you can only manage your own pets"));
    }
    Ok(pet)
}

pub struct UpdatePetUseCase<P: PetRepository> {
    pub pets: P,
}

impl<P: PetRepository> UpdatePetUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: PetFields,
    ) -> Result<Pet, ApiError> {
        let mut pet = owned_pet(&self.pets, id, user_id).await?;
        let read_status = pet.status;
        apply_fields(&mut pet, fields)?;
        validate_pet(&pet)?;
        pet.updated_at = Utc::now();
        self.pets.update(&pet, read_status).await?;
        Ok(pet)
    }
}

pub struct DeletePetUseCase<P: PetRepository> {
    pub pets: P,
}

impl<P: PetRepository> DeletePetUseCase<P> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let pet = owned_pet(&self.pets, id, user_id).await?;
        self.pets.delete(pet.id).await?;
        tracing::info!(pet_id = %pet.id, seller_id = %user_id, "pet deleted");
        Ok(())
    }
}
