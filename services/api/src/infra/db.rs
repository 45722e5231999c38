use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionError, TransactionTrait,
    sea_query::Expr,
};
use uuid::Uuid;

use adoptly_api_schema::{applications, pets, users};
use adoptly_core::sea_ext::contains_ignore_case;
use adoptly_domain::application::ApplicationStatus;
use adoptly_domain::pagination::PageRequest;
use adoptly_domain::pet::{PetStatus, SearchField};
use adoptly_domain::profile::ProfileType;

use crate::domain::repository::{ApplicationRepository, PetRepository, UserRepository};
use crate::domain::types::{
    Address, Application, Pet, PetFilter, PetLocation, PetPage, PetSize, ProfileUpdate, User,
};
use crate::domain::workflow::DecisionPlan;
use crate::error::ApiError;

fn db_err(context: &'static str) -> impl FnOnce(DbErr) -> ApiError {
    move |e| ApiError::Internal(anyhow::Error::new(e).context(context))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn transaction_err(
    context: &'static str,
) -> impl FnOnce(TransactionError<ApiError>) -> ApiError {
    move |e| match e {
        TransactionError::Connection(err) => db_err(context)(err),
        TransactionError::Transaction(err) => err,
    }
}

/// `update()` on a missing row surfaces as `RecordNotUpdated`.
fn update_err(not_found: ApiError, context: &'static str) -> impl FnOnce(DbErr) -> ApiError {
    move |e| match e {
        DbErr::RecordNotUpdated => not_found,
        other => db_err(context)(other),
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find users by ids")?
            .into_iter()
            .map(user_from_model)
            .collect()
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?
            .into_iter()
            .map(user_from_model)
            .collect()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            contact: Set(user.contact.clone()),
            picture: Set(user.picture.clone()),
            profile_type: Set(user.profile_type.as_str().to_owned()),
            address_city: Set(user.address.city.clone()),
            address_state: Set(user.address.state.clone()),
            address_country: Set(user.address.country.clone()),
            address_pincode: Set(user.address.pincode.clone()),
            bio: Set(user.bio.clone()),
            reset_token_hash: Set(None),
            reset_token_expires_at: Set(None),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(db_err("create user")(e)),
        }
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = &update.name {
            am.name = Set(name.clone());
        }
        if let Some(contact) = &update.contact {
            am.contact = Set(contact.clone());
        }
        if let Some(bio) = &update.bio {
            am.bio = Set(Some(bio.clone()));
        }
        if let Some(address) = &update.address {
            am.address_city = Set(address.city.clone());
            am.address_state = Set(address.state.clone());
            am.address_country = Set(address.country.clone());
            am.address_pincode = Set(address.pincode.clone());
        }
        let model = am
            .update(&self.db)
            .await
            .map_err(update_err(ApiError::UserNotFound, "update user profile"))?;
        user_from_model(model)
    }

    async fn set_profile_type(
        &self,
        id: Uuid,
        profile_type: ProfileType,
    ) -> Result<User, ApiError> {
        let model = users::ActiveModel {
            id: Set(id),
            profile_type: Set(profile_type.as_str().to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err(ApiError::UserNotFound, "set profile type"))?;
        user_from_model(model)
    }

    async fn set_picture(&self, id: Uuid, picture: &str) -> Result<User, ApiError> {
        let model = users::ActiveModel {
            id: Set(id),
            picture: Set(picture.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err(ApiError::UserNotFound, "set picture"))?;
        user_from_model(model)
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            reset_token_hash: Set(Some(token_hash.to_owned())),
            reset_token_expires_at: Set(Some(expires_at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err(ApiError::UserNotFound, "set reset token"))?;
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::ResetTokenHash.eq(token_hash))
            .filter(users::Column::ResetTokenExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find user by reset token")?;
        model.map(user_from_model).transpose()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            reset_token_hash: Set(None),
            reset_token_expires_at: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(update_err(ApiError::UserNotFound, "update password"))?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        contact: model.contact,
        picture: model.picture,
        profile_type: model
            .profile_type
            .parse()
            .context("decode users.profile_type")?,
        address: Address {
            city: model.address_city,
            state: model.address_state,
            country: model.address_country,
            pincode: model.address_pincode,
        },
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Pet repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPetRepository {
    pub db: DatabaseConnection,
}

fn pet_condition(filter: &PetFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(species) = filter.species {
        cond = cond.add(pets::Column::Species.eq(species.as_str()));
    }
    if let Some(breed) = &filter.breed {
        cond = cond.add(contains_ignore_case(
            (pets::Entity, pets::Column::Breed),
            breed,
        ));
    }
    if let Some(gender) = filter.gender {
        cond = cond.add(pets::Column::Gender.eq(gender.as_str()));
    }
    if let Some(status) = filter.status {
        cond = cond.add(pets::Column::Status.eq(status.as_str()));
    }
    if filter.vaccinated_only {
        cond = cond.add(pets::Column::Vaccinated.eq(true));
    }
    if let Some((field, query)) = &filter.search {
        let column = match field {
            SearchField::Name => pets::Column::Name,
            SearchField::Breed => pets::Column::Breed,
        };
        cond = cond.add(contains_ignore_case((pets::Entity, column), query));
    }
    cond
}

impl PetRepository for DbPetRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pet>, ApiError> {
        let model = pets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find pet by id")?;
        model.map(pet_from_model).transpose()
    }

    async fn list(&self, filter: &PetFilter, page: PageRequest) -> Result<PetPage, ApiError> {
        let page = page.clamped();
        let cond = pet_condition(filter);

        let total = pets::Entity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .context("count pets")?;

        let rows = pets::Entity::find()
            .filter(cond)
            .find_also_related(users::Entity)
            .order_by_desc(pets::Column::CreatedAt)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list pets")?;

        let pets = rows
            .into_iter()
            .map(|(pet, seller)| {
                Ok((
                    pet_from_model(pet)?,
                    seller.map(user_from_model).transpose()?,
                ))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(PetPage { pets, total })
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Pet>, ApiError> {
        pets::Entity::find()
            .filter(pets::Column::ListedBy.eq(owner))
            .order_by_desc(pets::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list pets by owner")?
            .into_iter()
            .map(pet_from_model)
            .collect()
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Pet>, ApiError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        pets::Entity::find()
            .filter(pets::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find pets by ids")?
            .into_iter()
            .map(pet_from_model)
            .collect()
    }

    async fn create(&self, pet: &Pet) -> Result<(), ApiError> {
        pet_to_active_model(pet)
            .insert(&self.db)
            .await
            .context("create pet")?;
        Ok(())
    }

    async fn update(&self, pet: &Pet, read_status: PetStatus) -> Result<(), ApiError> {
        let mut update = pets::Entity::update(pet_update_model(pet, read_status));
        if read_status != PetStatus::Adopted {
            update = update.filter(pets::Column::Status.ne(PetStatus::Adopted.as_str()));
        }
        match update.exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => {
                let still_there = pets::Entity::find_by_id(pet.id)
                    .one(&self.db)
                    .await
                    .context("reload pet")?;
                Err(match still_there {
                    Some(_) => ApiError::PetAlreadyAdopted,
                    None => ApiError::PetNotFound,
                })
            }
            Err(e) => Err(db_err("update pet")(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        pets::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete pet")?;
        Ok(())
    }
}

fn pet_from_model(model: pets::Model) -> Result<Pet, ApiError> {
    Ok(Pet {
        id: model.id,
        name: model.name,
        species: model.species.parse().context("decode pets.species")?,
        breed: model.breed,
        age: model.age,
        gender: model
            .gender
            .as_deref()
            .map(str::parse)
            .transpose()
            .context("decode pets.gender")?,
        size: PetSize {
            height: model.size_height,
            weight: model.size_weight,
        },
        description: model.description,
        vaccinated: model.vaccinated,
        special_needs: model.special_needs,
        adoption_fee: model.adoption_fee,
        location: PetLocation {
            city: model.location_city,
            state: model.location_state,
            country: model.location_country,
        },
        images: serde_json::from_value(model.images).context("decode pets.images")?,
        listed_by: model.listed_by,
        status: model.status.parse().context("decode pets.status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn pet_to_active_model(pet: &Pet) -> pets::ActiveModel {
    pets::ActiveModel {
        id: Set(pet.id),
        name: Set(pet.name.clone()),
        species: Set(pet.species.as_str().to_owned()),
        breed: Set(pet.breed.clone()),
        age: Set(pet.age),
        gender: Set(pet.gender.map(|g| g.as_str().to_owned())),
        size_height: Set(pet.size.height),
        size_weight: Set(pet.size.weight),
        description: Set(pet.description.clone()),
        vaccinated: Set(pet.vaccinated),
        special_needs: Set(pet.special_needs),
        adoption_fee: Set(pet.adoption_fee),
        location_city: Set(pet.location.city.clone()),
        location_state: Set(pet.location.state.clone()),
        location_country: Set(pet.location.country.clone()),
        images: Set(serde_json::json!(pet.images)),
        listed_by: Set(pet.listed_by),
        status: Set(pet.status.as_str().to_owned()),
        created_at: Set(pet.created_at),
        updated_at: Set(pet.updated_at),
    }
}

/// `status` is written only when the edit changed it. `created_at` never is.
fn pet_update_model(pet: &Pet, read_status: PetStatus) -> pets::ActiveModel {
    let mut model = pet_to_active_model(pet);
    model.created_at = NotSet;
    if pet.status == read_status {
        model.status = NotSet;
    }
    model
}

// ── Application repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApplicationRepository {
    pub db: DatabaseConnection,
}

impl ApplicationRepository for DbApplicationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApiError> {
        let model = applications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find application by id")?;
        model.map(application_from_model).transpose()
    }

    async fn exists_for(&self, applicant_id: Uuid, pet_id: Uuid) -> Result<bool, ApiError> {
        let count = applications::Entity::find()
            .filter(applications::Column::ApplicantId.eq(applicant_id))
            .filter(applications::Column::PetId.eq(pet_id))
            .count(&self.db)
            .await
            .context("check existing application")?;
        Ok(count > 0)
    }

    async fn create(&self, application: &Application) -> Result<(), ApiError> {
        let application = application.clone();
        self.db
            .transaction::<_, (), ApiError>(|txn| {
                Box::pin(async move {
                    // Shares the pet row lock an approval takes exclusively, so
                    // no pending application lands on a pet adopted meanwhile.
                    let pet = pets::Entity::find_by_id(application.pet_id)
                        .lock_shared()
                        .one(txn)
                        .await
                        .map_err(db_err("lock pet for application"))?
                        .ok_or(ApiError::PetNotFound)?;
                    if pet.status != PetStatus::Available.as_str() {
                        return Err(ApiError::PetUnavailable);
                    }

                    let result = applications::ActiveModel {
                        id: Set(application.id),
                        applicant_id: Set(application.applicant_id),
                        pet_id: Set(application.pet_id),
                        adoption_intent: Set(application.adoption_intent),
                        pet_location_plan: Set(application.pet_location_plan),
                        status: Set(application.status.as_str().to_owned()),
                        created_at: Set(application.created_at),
                        updated_at: Set(application.updated_at),
                    }
                    .insert(txn)
                    .await;

                    match result {
                        Ok(_) => Ok(()),
                        // applications_applicant_pet_key: a concurrent submit won the race.
                        Err(e) if is_unique_violation(&e) => Err(ApiError::AlreadyApplied),
                        Err(e) => Err(db_err("create application")(e)),
                    }
                })
            })
            .await
            .map_err(transaction_err("application transaction"))
    }

    async fn list_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>, ApiError> {
        applications::Entity::find()
            .filter(applications::Column::ApplicantId.eq(applicant_id))
            .order_by_desc(applications::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list applications by applicant")?
            .into_iter()
            .map(application_from_model)
            .collect()
    }

    async fn list_by_pet(&self, pet_id: Uuid) -> Result<Vec<Application>, ApiError> {
        applications::Entity::find()
            .filter(applications::Column::PetId.eq(pet_id))
            .order_by_desc(applications::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list applications by pet")?
            .into_iter()
            .map(application_from_model)
            .collect()
    }

    async fn apply_decision(&self, plan: &DecisionPlan) -> Result<Vec<Uuid>, ApiError> {
        let plan = plan.clone();
        self.db
            .transaction::<_, Vec<Uuid>, ApiError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let pending = ApplicationStatus::Pending.as_str();

                    // Pet row first: every writer to this pet's applications
                    // queues here, so concurrent decisions serialize.
                    let pet = pets::Entity::find_by_id(plan.pet_id)
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .map_err(db_err("lock pet"))?
                        .ok_or(ApiError::PetNotFound)?;

                    // Guarded on `pending` so two owners' tabs cannot both decide.
                    let decided = applications::Entity::update_many()
                        .col_expr(applications::Column::Status, Expr::value(plan.status.as_str()))
                        .col_expr(applications::Column::UpdatedAt, Expr::value(now))
                        .filter(applications::Column::Id.eq(plan.application_id))
                        .filter(applications::Column::Status.eq(pending))
                        .exec(txn)
                        .await
                        .map_err(db_err("decide application"))?;
                    if decided.rows_affected == 0 {
                        let current = applications::Entity::find_by_id(plan.application_id)
                            .one(txn)
                            .await
                            .map_err(db_err("reload application"))?;
                        return Err(match current {
                            Some(model) => {
                                ApiError::AlreadyDecided(application_from_model(model)?.status)
                            }
                            None => ApiError::ApplicationNotFound,
                        });
                    }

                    if !plan.adopt_pet {
                        return Ok(vec![]);
                    }
                    if pet.status == PetStatus::Adopted.as_str() {
                        return Err(ApiError::PetAlreadyAdopted);
                    }

                    pets::Entity::update_many()
                        .col_expr(pets::Column::Status, Expr::value(PetStatus::Adopted.as_str()))
                        .col_expr(pets::Column::UpdatedAt, Expr::value(now))
                        .filter(pets::Column::Id.eq(plan.pet_id))
                        .exec(txn)
                        .await
                        .map_err(db_err("mark pet adopted"))?;

                    let siblings: Vec<Uuid> = applications::Entity::find()
                        .select_only()
                        .column(applications::Column::Id)
                        .filter(applications::Column::PetId.eq(plan.pet_id))
                        .filter(applications::Column::Status.eq(pending))
                        .filter(applications::Column::Id.ne(plan.application_id))
                        .lock_exclusive()
                        .into_tuple()
                        .all(txn)
                        .await
                        .map_err(db_err("lock pending siblings"))?;

                    if !siblings.is_empty() {
                        applications::Entity::update_many()
                            .col_expr(
                                applications::Column::Status,
                                Expr::value(ApplicationStatus::Rejected.as_str()),
                            )
                            .col_expr(applications::Column::UpdatedAt, Expr::value(now))
                            .filter(applications::Column::Id.is_in(siblings.iter().copied()))
                            .filter(applications::Column::Status.eq(pending))
                            .exec(txn)
                            .await
                            .map_err(db_err("reject pending siblings"))?;
                    }

                    Ok(siblings)
                })
            })
            .await
            .map_err(transaction_err("decision transaction"))
    }
}

fn application_from_model(model: applications::Model) -> Result<Application, ApiError> {
    Ok(Application {
        id: model.id,
        applicant_id: model.applicant_id,
        pet_id: model.pet_id,
        adoption_intent: model.adoption_intent,
        pet_location_plan: model.pet_location_plan,
        status: model.status.parse().context("decode applications.status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
