use bytes::Bytes;

use adoptly_api::domain::types::UploadedImage;
use adoptly_api::error::ApiError;
use adoptly_api::usecase::upload::{MAX_FILE_BYTES, MAX_FILES, UploadImagesUseCase};

use crate::helpers::MockImageStore;

fn image(file_name: &str, content_type: &str, len: usize) -> UploadedImage {
    UploadedImage {
        file_name: Some(file_name.into()),
        content_type: Some(content_type.into()),
        bytes: Bytes::from(vec![7u8; len]),
    }
}

fn upload(store: &MockImageStore) -> UploadImagesUseCase<MockImageStore> {
    UploadImagesUseCase {
        store: store.clone(),
    }
}

#[tokio::test]
async fn should_store_images_in_upload_order() {
    let store = MockImageStore::default();

    let urls = upload(&store)
        .execute(vec![
            image("Rex.JPG", "image/jpeg", 10),
            image("rex-garden.png", "image/png", 20),
        ])
        .await
        .unwrap();

    assert_eq!(urls.len(), 2);
    assert!(urls[0].ends_with(".jpg"));
    assert!(urls[1].ends_with(".png"));
    assert_eq!(
        store.saved(),
        vec![(".jpg".to_string(), 10), (".png".to_string(), 20)]
    );
}

#[tokio::test]
async fn should_reject_empty_batch() {
    let store = MockImageStore::default();
    let result = upload(&store).execute(vec![]).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_reject_more_than_max_files() {
    let store = MockImageStore::default();
    let batch = (0..=MAX_FILES)
        .map(|i| image(&format!("rex-{i}.png"), "image/png", 1))
        .collect();

    let result = upload(&store).execute(batch).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
    assert!(store.saved().is_empty());
}

#[tokio::test]
async fn should_reject_non_image_file() {
    let store = MockImageStore::default();
    let result = upload(&store)
        .execute(vec![image("notes.txt", "text/plain", 5)])
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_write_nothing_when_one_file_in_batch_is_invalid() {
    let store = MockImageStore::default();

    let result = upload(&store)
        .execute(vec![
            image("rex.png", "image/png", 10),
            image("rex.gif", "image/gif", 10),
            image("huge.png", "image/png", MAX_FILE_BYTES + 1),
        ])
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));

    let result = upload(&store)
        .execute(vec![
            image("rex.png", "image/png", 10),
            image("resume.pdf", "application/pdf", 10),
        ])
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));

    assert!(store.saved().is_empty());
}
