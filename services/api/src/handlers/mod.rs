pub mod application;
pub mod auth;
pub mod contact;
pub mod pet;
pub mod root;
pub mod upload;
pub mod user;

use serde::Serialize;

/// Body of endpoints that only report success.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
