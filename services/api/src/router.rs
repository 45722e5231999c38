use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use adoptly_core::health::{healthz, readyz};
use adoptly_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    application::{create_application, decide_application, my_applications, pet_applications},
    auth::{forgot_password, login, logout, register, reset_password},
    contact::contact_user,
    pet::{create_pet, delete_pet, get_pet, list_pets, my_listings, update_pet},
    root::{index, not_found},
    upload::{sign_upload, upload_images},
    user::{get_me, get_user, list_users, switch_profile, update_avatar, update_me},
};
use crate::state::AppState;
use crate::usecase::upload::{MAX_FILE_BYTES, MAX_FILES};

/// Room for a full batch of images plus multipart framing.
const UPLOAD_BODY_LIMIT: usize = MAX_FILES * MAX_FILE_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(state.upload_dir.join("images"));

    let api = Router::new()
        .route("/", get(index))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        // Users
        .route("/users", get(list_users))
        .route("/users/me", get(get_me).put(update_me))
        .route("/users/me/switch-profile", put(switch_profile))
        .route("/users/me/avatar", put(update_avatar))
        .route("/users/{id}", get(get_user))
        // Pets
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/me/my-listings", get(my_listings))
        .route("/pets/{id}", get(get_pet).put(update_pet).delete(delete_pet))
        // Applications
        .route("/applications", post(create_application))
        .route("/applications/mine", get(my_applications))
        .route("/applications/pet/{pet_id}", get(pet_applications))
        .route("/applications/{id}/status", put(decide_application))
        // Uploads
        .route(
            "/upload",
            post(upload_images).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/upload/sign", post(sign_upload))
        // Contact
        .route("/contact", post(contact_user));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api/v1", api)
        .nest_service("/images", images)
        .fallback(not_found)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
