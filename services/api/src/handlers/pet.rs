use axum::Json;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use adoptly_domain::pet::{Gender, PetStatus, Species};

use crate::domain::types::{Pet, User};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};
use crate::handlers::MessageResponse;
use crate::state::AppState;
use crate::usecase::pet::{
    CreatePetUseCase, DeletePetUseCase, GetPetUseCase, ListMyPetsUseCase, ListPetsQuery,
    ListPetsUseCase, PetFields, UpdatePetUseCase,
};

#[derive(Serialize)]
pub struct SizeResponse {
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub vaccinated: bool,
    pub special_needs: bool,
}

#[derive(Serialize)]
pub struct LocationResponse {
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

/// Seller as embedded in the browse listing.
#[derive(Serialize)]
pub struct SellerBrief {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
}

impl From<User> for SellerBrief {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            city: u.address.city,
        }
    }
}

/// Seller as embedded in the pet detail page.
#[derive(Serialize)]
pub struct SellerContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub city: Option<String>,
}

impl From<User> for SellerContact {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            contact: u.contact,
            city: u.address.city,
        }
    }
}

/// A pet on the wire. `L` is how `listed_by` is rendered: a bare id or an
/// embedded seller.
#[derive(Serialize)]
pub struct PetResponse<L> {
    pub id: Uuid,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub age: Option<f64>,
    pub gender: Option<Gender>,
    pub size: SizeResponse,
    pub description: String,
    pub health_status: HealthResponse,
    pub adoption_fee: f64,
    pub location: LocationResponse,
    pub images: Vec<String>,
    pub listed_by: L,
    pub status: PetStatus,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl<L> PetResponse<L> {
    pub fn new(pet: Pet, listed_by: L) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            gender: pet.gender,
            size: SizeResponse {
                height: pet.size.height,
                weight: pet.size.weight,
            },
            description: pet.description,
            health_status: HealthResponse {
                vaccinated: pet.vaccinated,
                special_needs: pet.special_needs,
            },
            adoption_fee: pet.adoption_fee,
            location: LocationResponse {
                city: pet.location.city,
                state: pet.location.state,
                country: pet.location.country,
            },
            images: pet.images,
            listed_by,
            status: pet.status,
            created_at: pet.created_at,
            updated_at: pet.updated_at,
        }
    }
}

impl From<Pet> for PetResponse<Uuid> {
    fn from(pet: Pet) -> Self {
        let listed_by = pet.listed_by;
        Self::new(pet, listed_by)
    }
}

// ── GET /pets ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PetListResponse {
    pub pets: Vec<PetResponse<Option<SellerBrief>>>,
    pub page: u32,
    pub pages: u64,
    pub total: u64,
}

pub async fn list_pets(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<PetListResponse>, ApiError> {
    let query: ListPetsQuery = serde_qs::from_str(raw.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::validation(format!("invalid query: {e}")))?;
    let page = query.page_request();

    let usecase = ListPetsUseCase {
        pets: state.pet_repo(),
    };
    let result = usecase.execute(&query).await?;

    Ok(Json(PetListResponse {
        pets: result
            .pets
            .into_iter()
            .map(|(pet, seller)| PetResponse::new(pet, seller.map(SellerBrief::from)))
            .collect(),
        page: page.page,
        pages: page.total_pages(result.total),
        total: result.total,
    }))
}

// ── GET /pets/{id} ───────────────────────────────────────────────────────────

pub async fn get_pet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PetResponse<Option<SellerContact>>>, ApiError> {
    let usecase = GetPetUseCase {
        pets: state.pet_repo(),
        users: state.user_repo(),
    };
    let (pet, seller) = usecase.execute(id).await?;
    Ok(Json(PetResponse::new(pet, seller.map(SellerContact::from))))
}

// ── GET /pets/me/my-listings ─────────────────────────────────────────────────

pub async fn my_listings(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PetResponse<Uuid>>>, ApiError> {
    let usecase = ListMyPetsUseCase {
        pets: state.pet_repo(),
    };
    let pets = usecase.execute(user.id).await?;
    Ok(Json(pets.into_iter().map(PetResponse::from).collect()))
}

// ── POST /pets ───────────────────────────────────────────────────────────────

pub async fn create_pet(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PetFields>,
) -> Result<(StatusCode, Json<PetResponse<Uuid>>), ApiError> {
    let usecase = CreatePetUseCase {
        pets: state.pet_repo(),
    };
    let pet = usecase.execute(&user, body).await?;
    Ok((StatusCode::CREATED, Json(pet.into())))
}

// ── PUT /pets/{id} ───────────────────────────────────────────────────────────

pub async fn update_pet(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PetFields>,
) -> Result<Json<PetResponse<Uuid>>, ApiError> {
    let usecase = UpdatePetUseCase {
        pets: state.pet_repo(),
    };
    let pet = usecase.execute(user.id, id, body).await?;
    Ok(Json(pet.into()))
}

// ── DELETE /pets/{id} ────────────────────────────────────────────────────────

pub async fn delete_pet(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = DeletePetUseCase {
        pets: state.pet_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(Json(MessageResponse::new("pet removed successfully")))
}
