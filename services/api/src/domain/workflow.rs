//! Adoption workflow rules: who may apply, and what a decision does.
//!
//! These are pure checks over already-loaded records. The repository applies
//! the resulting [`DecisionPlan`] in one transaction.

use uuid::Uuid;

use adoptly_domain::application::{ApplicationStatus, Decision};
use adoptly_domain::pet::PetStatus;
use adoptly_domain::profile::ProfileType;

use crate::domain::types::{Application, Pet, User};
use crate::error::ApiError;

/// Writes needed to record an owner's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionPlan {
    pub application_id: Uuid,
    pub pet_id: Uuid,
    pub status: ApplicationStatus,
    /// Approval: flip the pet to `adopted` and reject pending siblings.
    pub adopt_pet: bool,
}

/// Only adopters may apply, never to their own listing, and only while the pet is available.
pub fn check_can_apply(applicant: &User, pet: &Pet) -> Result<(), ApiError> {
    if applicant.profile_type != ProfileType::Adopter {
        return Err(ApiError::Forbidden("only adopters can apply for pets"));
    }
    if pet.is_listed_by(applicant.id) {
        return Err(ApiError::Forbidden("you cannot apply for your own pet"));
    }
    if pet.status != PetStatus::Available {
        return Err(ApiError::PetUnavailable);
    }
    Ok(())
}

/// Only the seller who listed a pet may see or decide its applications.
pub fn ensure_pet_owner(owner_id: Uuid, pet: &Pet) -> Result<(), ApiError> {
    if !pet.is_listed_by(owner_id) {
        return Err(ApiError::Forbidden(
            "you can only manage applications for your own pets",
        ));
    }
    Ok(())
}

/// Decide `application` for `pet`. The caller has already checked ownership
/// with [`ensure_pet_owner`].
pub fn plan_decision(
    application: &Application,
    pet: &Pet,
    decision: Decision,
) -> Result<DecisionPlan, ApiError> {
    let status = application.status.decide(decision)?;
    let adopt_pet = decision == Decision::Approve;
    if adopt_pet && pet.status == PetStatus::Adopted {
        return Err(ApiError::PetAlreadyAdopted);
    }
    Ok(DecisionPlan {
        application_id: application.id,
        pet_id: pet.id,
        status,
        adopt_pet,
    })
}
