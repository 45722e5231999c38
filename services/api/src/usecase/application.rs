use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use adoptly_domain::application::{ApplicationStatus, Decision};

use crate::domain::email::decision_notice;
use crate::domain::repository::{ApplicationRepository, Mailer, PetRepository, UserRepository};
use crate::domain::types::{Application, Pet, User};
use crate::domain::validate;
use crate::domain::workflow::{check_can_apply, ensure_pet_owner, plan_decision};
use crate::error::ApiError;

// ── Apply ────────────────────────────────────────────────────────────────────

pub struct CreateApplicationInput {
    pub pet_id: Uuid,
    pub adoption_intent: String,
    pub pet_location_plan: String,
}

pub struct CreateApplicationUseCase<A: ApplicationRepository, P: PetRepository> {
    pub applications: A,
    pub pets: P,
}

impl<A: ApplicationRepository, P: PetRepository> CreateApplicationUseCase<A, P> {
    pub async fn execute(
        &self,
        applicant: &User,
        input: CreateApplicationInput,
    ) -> Result<Application, ApiError> {
        let adoption_intent = validate::required_text("adoption_intent", &input.adoption_intent)?;
        let pet_location_plan =
            validate::required_text("pet_location_plan", &input.pet_location_plan)?;

        let pet = self
            .pets
            .find_by_id(input.pet_id)
            .await?
            .ok_or(ApiError::PetNotFound)?;
        check_can_apply(applicant, &pet)?;

        if self.applications.exists_for(applicant.id, pet.id).await? {
            return Err(ApiError::AlreadyApplied);
        }

        let now = Utc::now();
        let application = Application {
            id: Uuid::now_v7(),
            applicant_id: applicant.id,
            pet_id: pet.id,
            adoption_intent,
            pet_location_plan,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.applications.create(&application).await?;
        tracing::info!(
            application_id = %application.id,
            pet_id = %pet.id,
            applicant_id = %applicant.id,
            "application submitted"
        );
        Ok(application)
    }
}

// ── Lists ────────────────────────────────────────────────────────────────────

pub struct ListMyApplicationsUseCase<A: ApplicationRepository, P: PetRepository> {
    pub applications: A,
    pub pets: P,
}

impl<A: ApplicationRepository, P: PetRepository> ListMyApplicationsUseCase<A, P> {
    /// The caller's applications, each with its pet when it still exists.
    pub async fn execute(
        &self,
        applicant_id: Uuid,
    ) -> Result<Vec<(Application, Option<Pet>)>, ApiError> {
        let applications = self.applications.list_by_applicant(applicant_id).await?;
        let pet_ids: Vec<Uuid> = applications.iter().map(|a| a.pet_id).collect();
        let mut pets: HashMap<Uuid, Pet> = self
            .pets
            .find_many(&pet_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        // One application per (applicant, pet), so each pet is taken once.
        Ok(applications
            .into_iter()
            .map(|a| {
                let pet = pets.remove(&a.pet_id);
                (a, pet)
            })
            .collect())
    }
}

pub struct ListPetApplicationsUseCase<A, P, U>
where
    A: ApplicationRepository,
    P: PetRepository,
    U: UserRepository,
{
    pub applications: A,
    pub pets: P,
    pub users: U,
}

impl<A, P, U> ListPetApplicationsUseCase<A, P, U>
where
    A: ApplicationRepository,
    P: PetRepository,
    U: UserRepository,
{
    /// Applications for one of the caller's pets, each with its applicant.
    pub async fn execute(
        &self,
        owner_id: Uuid,
        pet_id: Uuid,
    ) -> Result<Vec<(Application, Option<User>)>, ApiError> {
        let pet = self
            .pets
            .find_by_id(pet_id)
            .await?
            .ok_or(ApiError::PetNotFound)?;
        ensure_pet_owner(owner_id, &pet)?;
        let applications = self.applications.list_by_pet(pet_id).await?;

        let applicant_ids: Vec<Uuid> = applications.iter().map(|a| a.applicant_id).collect();
        let applicants = users_by_id(self.users.find_many(&applicant_ids).await?);

        Ok(applications
            .into_iter()
            .map(|a| {
                let applicant = applicants.get(&a.applicant_id).cloned();
                (a, applicant)
            })
            .collect())
    }
}

fn users_by_id(users: Vec<User>) -> HashMap<Uuid, User> {
    users.into_iter().map(|u| (u.id, u)).collect()
}

// ── Decide ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub application: Application,
    /// Pending siblings rejected by an approval.
    pub rejected: Vec<Uuid>,
}

pub struct DecideApplicationUseCase<A, P, U, M>
where
    A: ApplicationRepository,
    P: PetRepository,
    U: UserRepository,
    M: Mailer,
{
    pub applications: A,
    pub pets: P,
    pub users: U,
    pub mailer: M,
}

impl<A, P, U, M> DecideApplicationUseCase<A, P, U, M>
where
    A: ApplicationRepository,
    P: PetRepository,
    U: UserRepository,
    M: Mailer,
{
    pub async fn execute(
        &self,
        owner_id: Uuid,
        application_id: Uuid,
        status: &str,
    ) -> Result<DecisionOutcome, ApiError> {
        let mut application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or(ApiError::ApplicationNotFound)?;
        let pet = self
            .pets
            .find_by_id(application.pet_id)
            .await?
            .ok_or(ApiError::PetNotFound)?;
        ensure_pet_owner(owner_id, &pet)?;

        let decision: Decision = status
            .parse()
            .map_err(|_| ApiError::validation("status must be 'approved' or 'rejected'"))?;
        let plan = plan_decision(&application, &pet, decision)?;
        let rejected = self.applications.apply_decision(&plan).await?;

        application.status = plan.status;
        application.updated_at = Utc::now();
        tracing::info!(
            application_id = %application.id,
            pet_id = %pet.id,
            status = %application.status,
            auto_rejected = rejected.len(),
            "application decided"
        );

        self.notify(&application, &pet, &rejected).await;
        Ok(DecisionOutcome {
            application,
            rejected,
        })
    }

    /// Email the decided applicant and every auto-rejected one. Failures are
    /// logged and swallowed.
    async fn notify(&self, decided: &Application, pet: &Pet, rejected: &[Uuid]) {
        let mut recipients = vec![(decided.applicant_id, decided.status)];
        if !rejected.is_empty() {
            match self.applications.list_by_pet(pet.id).await {
                Ok(siblings) => recipients.extend(
                    siblings
                        .into_iter()
                        .filter(|a| rejected.contains(&a.id))
                        .map(|a| (a.applicant_id, ApplicationStatus::Rejected)),
                ),
                Err(e) => tracing::warn!(
                    pet_id = %pet.id,
                    error = %e,
                    "failed to load rejected applications"
                ),
            }
        }

        let ids: Vec<Uuid> = recipients.iter().map(|(id, _)| *id).collect();
        let users = match self.users.find_many(&ids).await {
            Ok(users) => users_by_id(users),
            Err(e) => {
                tracing::warn!(
                    pet_id = %pet.id,
                    error = %e,
                    "failed to load applicants for notification"
                );
                return;
            }
        };

        for (user_id, status) in recipients {
            let Some(user) = users.get(&user_id) else {
                continue;
            };
            if let Err(e) = self
                .mailer
                .send(decision_notice(&user.email, &pet.name, status))
                .await
            {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "failed to send application status email"
                );
            }
        }
    }
}
