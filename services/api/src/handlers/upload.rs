use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::domain::types::UploadedImage;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::infra::cloudinary::SignedUpload;
use crate::state::AppState;
use crate::usecase::upload::{MAX_FILES, UPLOAD_FIELD, UploadImagesUseCase};

// ── POST /upload ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub urls: Vec<String>,
}

pub async fn upload_images(
    _: CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if images.len() == MAX_FILES {
            return Err(ApiError::validation(format!(
                "at most {MAX_FILES} images can be uploaded at once"
            )));
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        images.push(UploadedImage {
            file_name,
            content_type,
            bytes,
        });
    }

    let usecase = UploadImagesUseCase {
        store: state.image_store(),
    };
    let urls = usecase.execute(images).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "images uploaded successfully",
            urls,
        }),
    ))
}

// ── POST /upload/sign ────────────────────────────────────────────────────────

pub async fn sign_upload(_: CurrentUser, State(state): State<AppState>) -> Json<SignedUpload> {
    Json(state.cloudinary.sign(Utc::now().timestamp()))
}
