use uuid::Uuid;

use crate::domain::email::contact_message;
use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::User;
use crate::domain::validate;
use crate::error::ApiError;

pub struct ContactInput {
    pub recipient_id: Uuid,
    pub subject: String,
    pub message: String,
}

pub struct ContactUserUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
}

impl<U: UserRepository, M: Mailer> ContactUserUseCase<U, M> {
    /// Relay a message to another user. Unlike notifications, a delivery
    /// failure is returned to the sender.
    pub async fn execute(&self, sender: &User, input: ContactInput) -> Result<(), ApiError> {
        let subject = validate::required_text("subject", &input.subject)?;
        let message = validate::required_text("message", &input.message)?;

        let recipient = self
            .users
            .find_by_id(input.recipient_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        self.mailer
            .send(contact_message(
                &recipient.email,
                &sender.name,
                &sender.email,
                &subject,
                &message,
            ))
            .await?;
        tracing::info!(
            sender_id = %sender.id,
            recipient_id = %recipient.id,
            "contact message sent"
        );
        Ok(())
    }
}
