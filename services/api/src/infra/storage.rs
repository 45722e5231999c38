use std::path::PathBuf;

use anyhow::Context as _;

use crate::domain::repository::ImageStore;
use crate::error::ApiError;

/// URL prefix (and subdirectory of the upload root) for pet images.
pub const PET_IMAGE_PREFIX: &str = "images/pets";

/// Writes uploads under `{root}/images/pets/` with random 32-hex names.
/// The router serves `{root}/images` at `/images`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    pub root: PathBuf,
}

impl ImageStore for LocalImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let dir = self.root.join(PET_IMAGE_PREFIX);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create upload dir {}", dir.display()))?;

        let name = format!("{}{extension}", hex::encode(rand::random::<[u8; 16]>()));
        let path = dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        Ok(format!("/{PET_IMAGE_PREFIX}/{name}"))
    }
}
