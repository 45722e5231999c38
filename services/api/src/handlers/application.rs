use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use adoptly_domain::application::ApplicationStatus;

use crate::domain::types::{Application, User};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser};
use crate::handlers::pet::PetResponse;
use crate::state::AppState;
use crate::usecase::application::{
    CreateApplicationInput, CreateApplicationUseCase, DecideApplicationUseCase,
    ListMyApplicationsUseCase, ListPetApplicationsUseCase,
};

/// An application on the wire. `A` renders the applicant and `P` the pet,
/// either as bare ids or embedded records.
#[derive(Serialize)]
pub struct ApplicationResponse<A, P> {
    pub id: Uuid,
    pub applicant: A,
    pub pet: P,
    pub adoption_intent: String,
    pub pet_location_plan: String,
    pub status: ApplicationStatus,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "adoptly_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl<A, P> ApplicationResponse<A, P> {
    fn new(a: Application, applicant: A, pet: P) -> Self {
        Self {
            id: a.id,
            applicant,
            pet,
            adoption_intent: a.adoption_intent,
            pet_location_plan: a.pet_location_plan,
            status: a.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<Application> for ApplicationResponse<Uuid, Uuid> {
    fn from(a: Application) -> Self {
        let (applicant, pet) = (a.applicant_id, a.pet_id);
        Self::new(a, applicant, pet)
    }
}

#[derive(Serialize)]
pub struct ApplicantResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub picture: String,
}

impl From<User> for ApplicantResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            contact: u.contact,
            picture: u.picture,
        }
    }
}

// ── POST /applications ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateApplicationRequest {
    #[serde(rename = "petId")]
    pub pet_id: Uuid,
    #[serde(default)]
    pub adoption_intent: String,
    #[serde(default)]
    pub pet_location_plan: String,
}

#[derive(Serialize)]
pub struct CreateApplicationResponse {
    pub message: &'static str,
    pub application: ApplicationResponse<Uuid, Uuid>,
}

pub async fn create_application(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<CreateApplicationResponse>), ApiError> {
    let usecase = CreateApplicationUseCase {
        applications: state.application_repo(),
        pets: state.pet_repo(),
    };
    let application = usecase
        .execute(
            &user,
            CreateApplicationInput {
                pet_id: body.pet_id,
                adoption_intent: body.adoption_intent,
                pet_location_plan: body.pet_location_plan,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateApplicationResponse {
            message: "application submitted successfully",
            application: application.into(),
        }),
    ))
}

// ── GET /applications/mine ───────────────────────────────────────────────────

pub async fn my_applications(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationResponse<Uuid, Option<PetResponse<Uuid>>>>>, ApiError> {
    let usecase = ListMyApplicationsUseCase {
        applications: state.application_repo(),
        pets: state.pet_repo(),
    };
    let applications = usecase.execute(user.id).await?;
    Ok(Json(
        applications
            .into_iter()
            .map(|(a, pet)| {
                let applicant = a.applicant_id;
                ApplicationResponse::new(a, applicant, pet.map(PetResponse::from))
            })
            .collect(),
    ))
}

// ── GET /applications/pet/{petId} ────────────────────────────────────────────

pub async fn pet_applications(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(pet_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ApplicationResponse<Option<ApplicantResponse>, Uuid>>>, ApiError> {
    let usecase = ListPetApplicationsUseCase {
        applications: state.application_repo(),
        pets: state.pet_repo(),
        users: state.user_repo(),
    };
    let applications = usecase.execute(user.id, pet_id).await?;
    Ok(Json(
        applications
            .into_iter()
            .map(|(a, applicant)| {
                let pet = a.pet_id;
                ApplicationResponse::new(a, applicant.map(ApplicantResponse::from), pet)
            })
            .collect(),
    ))
}

// ── PUT /applications/{id}/status ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DecideRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
pub struct DecideResponse {
    pub message: String,
    pub application: ApplicationResponse<Uuid, Uuid>,
    pub rejected: Vec<Uuid>,
}

pub async fn decide_application(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<DecideRequest>,
) -> Result<Json<DecideResponse>, ApiError> {
    let usecase = DecideApplicationUseCase {
        applications: state.application_repo(),
        pets: state.pet_repo(),
        users: state.user_repo(),
        mailer: state.mailer.clone(),
    };
    let outcome = usecase.execute(user.id, id, &body.status).await?;
    Ok(Json(DecideResponse {
        message: format!("application {}", outcome.application.status),
        application: outcome.application.into(),
        rejected: outcome.rejected,
    }))
}
