use uuid::Uuid;

use adoptly_api::domain::types::Pet;
use adoptly_api::error::ApiError;
use adoptly_api::usecase::pet::{
    CreatePetUseCase, DeletePetUseCase, ListPetsQuery, ListPetsUseCase, LocationFields,
    PetFields, UpdatePetUseCase,
};
use adoptly_domain::pet::{PetStatus, Species};
use adoptly_domain::profile::ProfileType;

use crate::helpers::{MockPetRepo, test_pet, test_user};

fn new_pet_fields() -> PetFields {
    PetFields {
        name: Some("Milo".into()),
        species: Some("Cat".into()),
        description: Some("Calm lap cat".into()),
        location: Some(LocationFields {
            city: Some("Pune".into()),
            state: None,
            country: Some("India".into()),
        }),
        ..Default::default()
    }
}

// ── ListPetsUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_every_species_for_all_and_exact_match_otherwise() {
    let owner = Uuid::now_v7();
    let pets = MockPetRepo::new(vec![
        test_pet(owner, Species::Dog),
        test_pet(owner, Species::Cat),
        test_pet(owner, Species::Cat),
    ]);
    let usecase = ListPetsUseCase { pets };

    let all = usecase
        .execute(&ListPetsQuery {
            species: Some("all".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    let cats = usecase
        .execute(&ListPetsQuery {
            species: Some("cat".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(cats.total, 2);
    assert!(cats.pets.iter().all(|(p, _)| p.species == Species::Cat));
}

#[tokio::test]
async fn should_paginate_listing() {
    let owner = Uuid::now_v7();
    let pets = MockPetRepo::new((0..5).map(|_| test_pet(owner, Species::Dog)).collect());
    let usecase = ListPetsUseCase { pets };

    let page = usecase
        .execute(&ListPetsQuery {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.pets.len(), 2);
}

#[tokio::test]
async fn should_reject_unknown_species_filter() {
    let usecase = ListPetsUseCase {
        pets: MockPetRepo::default(),
    };
    let result = usecase
        .execute(&ListPetsQuery {
            species: Some("dragon".into()),
            ..Default::default()
        })
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

// ── CreatePetUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pet_for_seller() {
    let seller = test_user(ProfileType::Seller);
    let pets = MockPetRepo::default();
    let usecase = CreatePetUseCase { pets: pets.clone() };

    let pet = usecase.execute(&seller, new_pet_fields()).await.unwrap();

    assert_eq!(pet.listed_by, seller.id);
    assert_eq!(pet.species, Species::Cat);
    assert_eq!(pet.status, PetStatus::Available);
    assert_eq!(pet.adoption_fee, 0.0);
    assert!(pets.get(pet.id).is_some());
}

#[tokio::test]
async fn should_forbid_adopter_from_listing_pet() {
    let adopter = test_user(ProfileType::Adopter);
    let usecase = CreatePetUseCase {
        pets: MockPetRepo::default(),
    };
    let result = usecase.execute(&adopter, new_pet_fields()).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn should_require_species_and_location() {
    let seller = test_user(ProfileType::Seller);
    let usecase = CreatePetUseCase {
        pets: MockPetRepo::default(),
    };

    let no_species = PetFields {
        species: None,
        ..new_pet_fields()
    };
    assert!(matches!(
        usecase.execute(&seller, no_species).await,
        Err(ApiError::Validation(m)) if m == "species is required"
    ));

    let no_location = PetFields {
        location: None,
        ..new_pet_fields()
    };
    assert!(matches!(
        usecase.execute(&seller, no_location).await,
        Err(ApiError::Validation(_))
    ));
}

// ── UpdatePetUseCase / DeletePetUseCase ──────────────────────────────────────

#[tokio::test]
async fn should_forbid_non_owner_update() {
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let usecase = UpdatePetUseCase {
        pets: MockPetRepo::new(vec![pet.clone()]),
    };

    let result = usecase
        .execute(Uuid::now_v7(), pet.id, PetFields::default())
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
async fn should_update_own_pet_partially() {
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = UpdatePetUseCase { pets: pets.clone() };

    let updated = usecase
        .execute(
            pet.listed_by,
            pet.id,
            PetFields {
                adoption_fee: Some(0.0),
                status: Some("pending".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.adoption_fee, 0.0);
    assert_eq!(updated.status, PetStatus::Pending);
    assert_eq!(updated.name, pet.name);
    assert_eq!(pets.get(pet.id).unwrap().status, PetStatus::Pending);
}

#[tokio::test]
async fn should_edit_adopted_pet_without_reopening_it() {
    let pet = Pet {
        status: PetStatus::Adopted,
        ..test_pet(Uuid::now_v7(), Species::Dog)
    };
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = UpdatePetUseCase { pets: pets.clone() };

    let updated = usecase
        .execute(
            pet.listed_by,
            pet.id,
            PetFields {
                description: Some("Settled into a new home".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, PetStatus::Adopted);
    assert_eq!(pets.get(pet.id).unwrap().description, "Settled into a new home");

    for status in ["available", "pending"] {
        let result = usecase
            .execute(
                pet.listed_by,
                pet.id,
                PetFields {
                    status: Some(status.into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::PetAlreadyAdopted)));
    }
    assert_eq!(pets.get(pet.id).unwrap().status, PetStatus::Adopted);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_pet() {
    let usecase = DeletePetUseCase {
        pets: MockPetRepo::default(),
    };
    let result = usecase.execute(Uuid::now_v7(), Uuid::now_v7()).await;
    assert!(matches!(result, Err(ApiError::PetNotFound)));
}

#[tokio::test]
async fn should_delete_only_own_pet() {
    let pet = test_pet(Uuid::now_v7(), Species::Dog);
    let pets = MockPetRepo::new(vec![pet.clone()]);
    let usecase = DeletePetUseCase { pets: pets.clone() };

    assert!(matches!(
        usecase.execute(Uuid::now_v7(), pet.id).await,
        Err(ApiError::Forbidden(_))
    ));
    usecase.execute(pet.listed_by, pet.id).await.unwrap();
    assert!(pets.get(pet.id).is_none());
}
