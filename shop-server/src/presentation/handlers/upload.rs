use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, post, web};
use futures_util::StreamExt;
use tracing::info;

use crate::domain::error::DomainError;
use crate::infrastructure::storage::ImageStore;
use crate::presentation::dto::UploadResponse;
use crate::presentation::utils::request_id;

/// Multipart field carrying the product image.
pub const UPLOAD_FIELD: &str = "product";

#[post("/upload")]
pub async fn upload_image(
    req: HttpRequest,
    images: web::Data<ImageStore>,
    mut payload: Multipart,
) -> Result<HttpResponse, DomainError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));
    if !is_multipart {
        return Err(DomainError::NoFileUploaded);
    }

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| DomainError::Upload(e.to_string()))?;

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let wanted = field.name() == Some(UPLOAD_FIELD) && filename.is_some();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| DomainError::Upload(e.to_string()))?;
            if !wanted {
                continue;
            }
            if bytes.len() + chunk.len() > images.max_bytes() {
                return Err(DomainError::Upload(format!(
                    "file exceeds {} bytes",
                    images.max_bytes()
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        if !wanted {
            continue;
        }

        let stored = images
            .save(UPLOAD_FIELD, filename.as_deref(), &bytes)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(request_id = %request_id(&req), filename = %stored.filename, "image uploaded");

        return Ok(HttpResponse::Ok().json(UploadResponse {
            success: true,
            image_url: stored.url,
        }));
    }

    Err(DomainError::NoFileUploaded)
}
