use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::auth::models::Session;
use crate::error::AppError;
use crate::storage::client::StorageClient;

/// Key prefix of uploaded recipe and post images.
const IMAGE_PREFIX: &str = "images/";

/// Response from a successful image upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Path the image is served from; stored in recipe `images` / `steps`.
    pub url: String,
}

/// Storage key for an upload: `images/<millis>_<sanitized name>`.
pub fn image_key(file_name: &str, timestamp_millis: i64) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{IMAGE_PREFIX}{timestamp_millis}_{sanitized}")
}

/// Content type to serve an image with, from its extension. Anything that is
/// not a raster image is served as opaque bytes.
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Store an uploaded image and return the URL it is served from.
pub async fn process_upload(
    storage: &dyn StorageClient,
    session: &Session,
    file_name: &str,
    content_type: &str,
    data: Vec<u8>,
) -> Result<UploadResponse, AppError> {
    let user = session.require("upload images")?;

    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Only image files are allowed".into()));
    }
    // SVG can carry scripts that would run on this origin.
    if content_type.starts_with("image/svg") || file_name.to_ascii_lowercase().ends_with(".svg") {
        return Err(AppError::BadRequest("SVG images are not allowed".into()));
    }

    let key = image_key(file_name, chrono::Utc::now().timestamp_millis());
    storage.put_object(&key, data).await?;
    tracing::info!(key = %key, user_id = %user.user_id, "Image uploaded");

    Ok(UploadResponse {
        url: format!("/api/v1/image/{}", key.trim_start_matches(IMAGE_PREFIX)),
    })
}

/// `POST /api/v1/upload-image`
///
/// Accepts a multipart form with a single file field named "file".
pub async fn upload_image_handler(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    // Reject before reading the body.
    session.require("upload images")?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

        let response = process_upload(
            state.storage_client.as_ref(),
            &session,
            &file_name,
            &content_type,
            data.to_vec(),
        )
        .await?;

        return Ok(Json(response));
    }

    Err(AppError::BadRequest("No file field found in request".into()))
}

/// `GET /api/v1/image/{filename}`
pub async fn serve_image_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let data = state
        .storage_client
        .get_object(&format!("{IMAGE_PREFIX}{filename}"))
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename)),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::SessionUser;
    use crate::storage::client::MemoryStorageClient;

    fn session() -> Session {
        Session::signed_in(SessionUser {
            user_id: "demo-cook".to_string(),
            email: "cook@demo.potluck.dev".to_string(),
        })
    }

    #[test]
    fn test_image_key_sanitizes_name() {
        assert_eq!(
            image_key("my dish (final).JPG", 1700000000000),
            "images/1700000000000_my_dish__final_.JPG"
        );
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("1_a.png"), "image/png");
        assert_eq!(content_type_for("1_a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("1_a.svg"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let storage = MemoryStorageClient::new();
        let response = process_upload(&storage, &session(), "kimchi.png", "image/png", vec![7, 7])
            .await
            .unwrap();

        let filename = response.url.trim_start_matches("/api/v1/image/");
        assert!(filename.ends_with("_kimchi.png"));
        assert_eq!(
            storage.get_object(&format!("images/{filename}")).await.unwrap(),
            Some(vec![7, 7])
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let storage = MemoryStorageClient::new();
        let result = process_upload(&storage, &session(), "notes.txt", "text/plain", vec![1]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_svg() {
        let storage = MemoryStorageClient::new();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;

        let result =
            process_upload(&storage, &session(), "logo.svg", "image/svg+xml", svg.to_vec()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let renamed = process_upload(&storage, &session(), "logo.SVG", "image/png", svg.to_vec()).await;
        assert!(matches!(renamed, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_requires_session() {
        let storage = MemoryStorageClient::new();
        let result =
            process_upload(&storage, &Session::anonymous(), "a.png", "image/png", vec![1]).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
