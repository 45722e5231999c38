use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use adoptly_auth_types::identity::JwtSecretProvider;

use crate::infra::cloudinary::CloudinarySigner;
use crate::infra::db::{DbApplicationRepository, DbPetRepository, DbUserRepository};
use crate::infra::mailer::SmtpMailer;
use crate::infra::storage::LocalImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub cookie_secure: bool,
    pub frontend_url: String,
    pub upload_dir: PathBuf,
    pub mailer: SmtpMailer,
    pub cloudinary: CloudinarySigner,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn pet_repo(&self) -> DbPetRepository {
        DbPetRepository {
            db: self.db.clone(),
        }
    }

    pub fn application_repo(&self) -> DbApplicationRepository {
        DbApplicationRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> LocalImageStore {
        LocalImageStore {
            root: self.upload_dir.clone(),
        }
    }
}

impl JwtSecretProvider for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
