use crate::domain::repository::ImageStore;
use crate::domain::types::UploadedImage;
use crate::error::ApiError;

/// Multipart field carrying the images.
pub const UPLOAD_FIELD: &str = "petImages";
pub const MAX_FILES: usize = 5;
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Lowercased `.ext` from the client file name, or empty when it has none
/// or it is not plain alphanumerics.
pub fn extension_of(file_name: Option<&str>) -> String {
    let Some((_, ext)) = file_name.and_then(|n| n.rsplit_once('.')) else {
        return String::new();
    };
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return String::new();
    }
    format!(".{}", ext.to_ascii_lowercase())
}

fn check_image(image: &UploadedImage) -> Result<(), ApiError> {
    let is_image = image
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"));
    if !is_image {
        return Err(ApiError::validation("only image files are allowed"));
    }
    if image.bytes.len() > MAX_FILE_BYTES {
        return Err(ApiError::validation("each image must be 5MB or smaller"));
    }
    Ok(())
}

pub struct UploadImagesUseCase<S: ImageStore> {
    pub store: S,
}

impl<S: ImageStore> UploadImagesUseCase<S> {
    /// Store every image and return their public URLs in upload order.
    /// Nothing is written unless the whole batch is valid.
    pub async fn execute(&self, images: Vec<UploadedImage>) -> Result<Vec<String>, ApiError> {
        if images.is_empty() {
            return Err(ApiError::validation("no files uploaded"));
        }
        if images.len() > MAX_FILES {
            return Err(ApiError::validation(format!(
                "at most {MAX_FILES} images can be uploaded at once"
            )));
        }
        images.iter().try_for_each(check_image)?;

        let mut urls = Vec::with_capacity(images.len());
        for image in &images {
            let ext = extension_of(image.file_name.as_deref());
            urls.push(self.store.save(&ext, &image.bytes).await?);
        }
        tracing::info!(count = urls.len(), "pet images uploaded");
        Ok(urls)
    }
}
