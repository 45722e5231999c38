use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::handlers::MessageResponse;
use crate::state::AppState;
use crate::usecase::contact::{ContactInput, ContactUserUseCase};

// ── POST /contact ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContactRequest {
    #[serde(rename = "recipientId")]
    pub recipient_id: Uuid,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

pub async fn contact_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = ContactUserUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
    };
    usecase
        .execute(
            &user,
            ContactInput {
                recipient_id: body.recipient_id,
                subject: body.subject,
                message: body.message,
            },
        )
        .await?;
    Ok(Json(MessageResponse::new("message sent successfully")))
}
