use axum::{
    extract::{Multipart, Path},
    http::StatusCode,
    response::{Json, Response},
};
use std::path::Path as StdPath;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::errors::{AppError, Result};

pub(crate) const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "gif", "webp"];

pub async fn upload_image(mut multipart: Multipart) -> Result<Json<serde_json::Value>> {
    let mut saved: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let data = field.bytes().await?;
        if data.is_empty() {
            continue;
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::ImageTooLarge);
        }

        // Sniff the real content type; the client-supplied one is ignored
        let kind = infer::get(&data).ok_or(AppError::InvalidImageFormat)?;
        let extension = kind.extension();
        if !ALLOWED_EXTENSIONS.contains(&extension) {
            return Err(AppError::InvalidImageFormat);
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = format!("uploads/images/{}", file_name);
        tokio::fs::write(&file_path, &data).await?;

        saved = Some(file_name);
        break;
    }

    let file_name = saved.ok_or(AppError::NoImageProvided)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "file_name": file_name,
        "url": format!("/api/images/{}", file_name),
    })))
}

pub async fn serve_image(Path(file_name): Path<String>) -> Result<Response> {
    // Security: prevent path traversal
    if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
        return Err(AppError::ImageNotFound);
    }

    let file_path = format!("uploads/images/{}", file_name);

    if !StdPath::new(&file_path).is_file() {
        return Err(AppError::ImageNotFound);
    }

    let file = tokio::fs::File::open(&file_path)
        .await
        .map_err(|_| AppError::ImageNotFound)?;

    let stream = ReaderStream::new(file);

    let content_type = if file_path.ends_with(".png") {
        "image/png"
    } else if file_path.ends_with(".jpg") || file_path.ends_with(".jpeg") {
        "image/jpeg"
    } else if file_path.ends_with(".gif") {
        "image/gif"
    } else if file_path.ends_with(".webp") {
        "image/webp"
    } else {
        "application/octet-stream"
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", content_type)
        .header("cache-control", "public, max-age=31536000")
        .body(axum::body::Body::from_stream(stream))
        .map_err(|e| AppError::service(format!("Response build failed: {}", e)))?;

    Ok(response)
}
