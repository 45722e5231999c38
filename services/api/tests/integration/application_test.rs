use uuid::Uuid;

use adoptly_api::domain::repository::{ApplicationRepository, PetRepository};
use adoptly_api::domain::types::Pet;
use adoptly_api::error::ApiError;
use adoptly_api::usecase::application::{
    CreateApplicationInput, CreateApplicationUseCase, DecideApplicationUseCase,
    ListMyApplicationsUseCase, ListPetApplicationsUseCase,
};
use adoptly_api::usecase::pet::{PetFields, UpdatePetUseCase};
use adoptly_domain::application::ApplicationStatus;
use adoptly_domain::pet::{PetStatus, Species};
use adoptly_domain::profile::ProfileType;

use crate::helpers::{
    MockApplicationRepo, MockMailer, MockPetRepo, MockUserRepo, test_application, test_pet,
    test_user,
};

fn apply_input(pet_id: Uuid) -> CreateApplicationInput {
    CreateApplicationInput {
        pet_id,
        adoption_intent: "We have a big garden".into(),
        pet_location_plan: "Living room and garden".into(),
    }
}

// ── CreateApplicationUseCase ─────────────────────────────────────────────────

#[tokio::test]
async fn should_submit_pending_application() {
    let adopter = test_user(ProfileType::Adopter);
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let applications = MockApplicationRepo::new(vec![], &pets);
    let usecase = CreateApplicationUseCase {
        applications: applications.clone(),
        pets,
    };

    let application = usecase.execute(&adopter, apply_input(pet.id)).await.unwrap();

    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.applicant_id, adopter.id);
    assert!(applications.get(application.id).is_some());
}

#[tokio::test]
async fn should_reject_duplicate_application() {
    let adopter = test_user(ProfileType::Adopter);
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![], &pets),
        pets,
    };

    usecase.execute(&adopter, apply_input(pet.id)).await.unwrap();
    let second = usecase.execute(&adopter, apply_input(pet.id)).await;

    assert!(
        matches!(second, Err(ApiError::AlreadyApplied)),
        "expected AlreadyApplied, got {second:?}"
    );
}

#[tokio::test]
async fn should_forbid_seller_and_owner_from_applying() {
    let seller = test_user(ProfileType::Seller);
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![], &pets),
        pets: pets.clone(),
    };
    assert!(matches!(
        usecase.execute(&seller, apply_input(pet.id)).await,
        Err(ApiError::Forbidden(_))
    ));

    let owner = test_user(ProfileType::Adopter);
    let own_pet = test_pet(owner.id, Species::Cat);
    pets.pets.lock().unwrap().push(own_pet.clone());
    assert!(matches!(
        usecase.execute(&owner, apply_input(own_pet.id)).await,
        Err(ApiError::Forbidden(_))
    ));
}

#[tokio::test]
async fn should_validate_before_looking_up_pet() {
    let adopter = test_user(ProfileType::Adopter);
    let pets = MockPetRepo::default();
    let usecase = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![], &pets),
        pets,
    };

    let blank = CreateApplicationInput {
        adoption_intent: "   ".into(),
        ..apply_input(Uuid::now_v7())
    };
    assert!(matches!(
        usecase.execute(&adopter, blank).await,
        Err(ApiError::Validation(_))
    ));
    assert!(matches!(
        usecase.execute(&adopter, apply_input(Uuid::now_v7())).await,
        Err(ApiError::PetNotFound)
    ));
}

#[tokio::test]
async fn should_reject_application_for_unavailable_pet() {
    let adopter = test_user(ProfileType::Adopter);
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pet = Pet {
        status: PetStatus::Adopted,
        ..pet
    };
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![], &pets),
        pets,
    };

    let result = usecase.execute(&adopter, apply_input(pet.id)).await;
    assert!(matches!(result, Err(ApiError::PetUnavailable)));
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_embed_pets_in_my_applications() {
    let adopter = test_user(ProfileType::Adopter);
    let pet = test_pet(Uuid::now_v7(), Species::Rabbit);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let applications = MockApplicationRepo::new(
        vec![test_application(adopter.id, pet.id, ApplicationStatus::Pending)],
        &pets,
    );

    let listed = ListMyApplicationsUseCase { applications, pets }
        .execute(adopter.id)
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1.as_ref().map(|p| p.id), Some(pet.id));
}

#[tokio::test]
async fn should_list_pet_applications_for_owner_only() {
    let owner = test_user(ProfileType::Seller);
    let applicant = test_user(ProfileType::Adopter);
    let pet = test_pet(owner.id, Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let applications = MockApplicationRepo::new(
        vec![test_application(applicant.id, pet.id, ApplicationStatus::Pending)],
        &pets,
    );
    let usecase = ListPetApplicationsUseCase {
        applications,
        pets,
        users: MockUserRepo::new(vec![owner.clone(), applicant.clone()]),
    };

    let listed = usecase.execute(owner.id, pet.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1.as_ref().map(|u| u.id), Some(applicant.id));

    assert!(matches!(
        usecase.execute(applicant.id, pet.id).await,
        Err(ApiError::Forbidden(_))
    ));
    assert!(matches!(
        usecase.execute(owner.id, Uuid::now_v7()).await,
        Err(ApiError::PetNotFound)
    ));
}

// ── DecideApplicationUseCase ─────────────────────────────────────────────────

struct Fixture {
    owner: Uuid,
    pet: Uuid,
    pets: MockPetRepo,
    applications: MockApplicationRepo,
    users: MockUserRepo,
}

/// A pet with three pending applications and one already rejected.
fn decision_fixture() -> (Fixture, Vec<Uuid>) {
    let owner = test_user(ProfileType::Seller);
    let pet = test_pet(owner.id, Species::Dog);
    let applicants: Vec<_> = (0..4).map(|_| test_user(ProfileType::Adopter)).collect();
    let mut apps: Vec<_> = applicants[..3]
        .iter()
        .map(|a| test_application(a.id, pet.id, ApplicationStatus::Pending))
        .collect();
    apps.push(test_application(
        applicants[3].id,
        pet.id,
        ApplicationStatus::Rejected,
    ));
    let ids = apps.iter().map(|a| a.id).collect();

    let pets = MockPetRepo::new(vec![pet.clone()]);
    let applications = MockApplicationRepo::new(apps, &pets);
    let mut all_users = applicants;
    all_users.push(owner.clone());
    (
        Fixture {
            owner: owner.id,
            pet: pet.id,
            pets,
            applications,
            users: MockUserRepo::new(all_users),
        },
        ids,
    )
}

fn decide(
    f: &Fixture,
    mailer: &MockMailer,
) -> DecideApplicationUseCase<MockApplicationRepo, MockPetRepo, MockUserRepo, MockMailer> {
    DecideApplicationUseCase {
        applications: f.applications.clone(),
        pets: f.pets.clone(),
        users: f.users.clone(),
        mailer: mailer.clone(),
    }
}

#[tokio::test]
async fn should_cascade_approval_to_pending_siblings_only() {
    let (f, ids) = decision_fixture();
    let mailer = MockMailer::default();

    let outcome = decide(&f, &mailer)
        .execute(f.owner, ids[0], "approved")
        .await
        .unwrap();

    assert_eq!(outcome.application.status, ApplicationStatus::Approved);
    let mut rejected = outcome.rejected.clone();
    rejected.sort();
    let mut expected = vec![ids[1], ids[2]];
    expected.sort();
    assert_eq!(rejected, expected);

    assert_eq!(f.pets.get(f.pet).unwrap().status, PetStatus::Adopted);
    assert_eq!(f.applications.get(ids[0]).unwrap().status, ApplicationStatus::Approved);
    assert_eq!(f.applications.get(ids[1]).unwrap().status, ApplicationStatus::Rejected);
    assert_eq!(f.applications.get(ids[2]).unwrap().status, ApplicationStatus::Rejected);
    assert_eq!(f.applications.get(ids[3]).unwrap().status, ApplicationStatus::Rejected);

    // Approved applicant plus two auto-rejected; the earlier rejection is not re-notified.
    assert_eq!(mailer.sent().len(), 3);
}

#[tokio::test]
async fn should_reject_without_touching_pet_or_siblings() {
    let (f, ids) = decision_fixture();
    let mailer = MockMailer::default();

    let outcome = decide(&f, &mailer)
        .execute(f.owner, ids[0], "rejected")
        .await
        .unwrap();

    assert!(outcome.rejected.is_empty());
    assert_eq!(f.pets.get(f.pet).unwrap().status, PetStatus::Available);
    assert_eq!(f.applications.get(ids[1]).unwrap().status, ApplicationStatus::Pending);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn should_forbid_non_owner_decision() {
    let (f, ids) = decision_fixture();
    let result = decide(&f, &MockMailer::default())
        .execute(Uuid::now_v7(), ids[0], "approved")
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
    assert_eq!(f.applications.get(ids[0]).unwrap().status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn should_reject_invalid_status_and_redecision() {
    let (f, ids) = decision_fixture();
    let usecase = decide(&f, &MockMailer::default());

    assert!(matches!(
        usecase.execute(f.owner, ids[0], "pending").await,
        Err(ApiError::Validation(_))
    ));
    assert!(matches!(
        usecase.execute(f.owner, ids[3], "approved").await,
        Err(ApiError::AlreadyDecided(ApplicationStatus::Rejected))
    ));
    assert!(matches!(
        usecase.execute(f.owner, Uuid::now_v7(), "approved").await,
        Err(ApiError::ApplicationNotFound)
    ));
}

#[tokio::test]
async fn should_not_approve_second_application_after_adoption() {
    let (f, ids) = decision_fixture();
    let usecase = decide(&f, &MockMailer::default());

    usecase.execute(f.owner, ids[0], "rejected").await.unwrap();
    usecase.execute(f.owner, ids[1], "approved").await.unwrap();

    // ids[2] was auto-rejected by the approval.
    assert!(matches!(
        usecase.execute(f.owner, ids[2], "approved").await,
        Err(ApiError::AlreadyDecided(ApplicationStatus::Rejected))
    ));
}

#[tokio::test]
async fn should_succeed_when_notification_email_fails() {
    let (f, ids) = decision_fixture();

    let outcome = decide(&f, &MockMailer::failing())
        .execute(f.owner, ids[0], "approved")
        .await
        .unwrap();

    assert_eq!(outcome.application.status, ApplicationStatus::Approved);
    assert_eq!(outcome.rejected.len(), 2);
}

#[tokio::test]
async fn should_keep_adoption_final_when_owner_edits_status() {
    let (f, ids) = decision_fixture();
    decide(&f, &MockMailer::default())
        .execute(f.owner, ids[0], "approved")
        .await
        .unwrap();

    let result = UpdatePetUseCase {
        pets: f.pets.clone(),
    }
    .execute(
        f.owner,
        f.pet,
        PetFields {
            status: Some("available".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(ApiError::PetAlreadyAdopted)));
    assert_eq!(f.pets.get(f.pet).unwrap().status, PetStatus::Adopted);

    let late = CreateApplicationUseCase {
        applications: f.applications.clone(),
        pets: f.pets.clone(),
    }
    .execute(&test_user(ProfileType::Adopter), apply_input(f.pet))
    .await;
    assert!(matches!(late, Err(ApiError::PetUnavailable)));
}

#[tokio::test]
async fn should_not_overwrite_adoption_with_stale_pet_edit() {
    let (f, ids) = decision_fixture();
    let read_before_approval = f.pets.get(f.pet).unwrap();

    decide(&f, &MockMailer::default())
        .execute(f.owner, ids[0], "approved")
        .await
        .unwrap();

    let edited = Pet {
        description: "Now with a new collar".into(),
        ..read_before_approval.clone()
    };
    let result = f.pets.update(&edited, read_before_approval.status).await;
    assert!(matches!(result, Err(ApiError::PetAlreadyAdopted)));
    assert_eq!(f.pets.get(f.pet).unwrap().status, PetStatus::Adopted);

    // A submit that read the pet before approval does not land either.
    let stale = test_application(Uuid::now_v7(), f.pet, ApplicationStatus::Pending);
    assert!(matches!(
        f.applications.create(&stale).await,
        Err(ApiError::PetUnavailable)
    ));
}
