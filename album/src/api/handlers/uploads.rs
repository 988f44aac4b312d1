use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use bytes::BytesMut;
use metrics::counter;

use crate::AppState;
use crate::api::models::uploads::UploadResponse;
use crate::config::UploadConfig;
use crate::errors::{Error, ErrorBody, Result};
use crate::media::{DerivedUrlKind, ResourceType, UploadOptions, UploadSource};
use crate::payload::{EncodedPayload, UploadedFile, resolve_mime_type};

fn no_file() -> Error {
    Error::BadRequest {
        message: "No file uploaded".to_string(),
    }
}

fn file_too_large(max_size: u64) -> Error {
    Error::PayloadTooLarge {
        message: format!(
            "File size exceeds maximum allowed size of {} bytes ({} MB)",
            max_size,
            max_size / (1024 * 1024)
        ),
    }
}

fn multipart_error(e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge { message: e.body_text() }
    } else {
        Error::BadRequest {
            message: format!("Failed to parse multipart data: {}", e.body_text()),
        }
    }
}

/// Pull the single upload part out of the form, enforcing the size ceiling while streaming.
///
/// Parts under other names are skipped, as are text parts under the upload name (no
/// `filename`). An empty file part counts as no file at all.
async fn read_upload(multipart: &mut Multipart, config: &UploadConfig) -> Result<Option<UploadedFile>> {
    let mut seen = false;
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(config.field_name.as_str()) || field.file_name().is_none() {
            continue;
        }
        if seen {
            return Err(Error::BadRequest {
                message: "Only one file may be uploaded".to_string(),
            });
        }
        seen = true;

        let mime_type = resolve_mime_type(field.content_type(), field.file_name());

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if (buffer.len() + chunk.len()) as u64 > config.max_file_size {
                return Err(file_too_large(config.max_file_size));
            }
            buffer.extend_from_slice(&chunk);
        }

        if !buffer.is_empty() {
            upload = Some(UploadedFile::new(buffer.freeze(), mime_type));
        }
    }

    Ok(upload)
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    summary = "Upload an image",
    description = "Accepts a single file in the `image` part of a multipart form, stores it in the album folder \
                   and returns the direct URL together with an automatically optimized delivery URL.",
    request_body(content_type = "multipart/form-data", description = "Form with one `image` file part"),
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "No file, or more than one file, in the request", body = ErrorBody),
        (status = 413, description = "File exceeds the configured size ceiling", body = ErrorBody),
        (status = 500, description = "Media service rejected or failed the upload", body = ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    // A request that is not multipart at all carries no file either.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Upload request is not a multipart form");
        no_file()
    })?;

    let file = read_upload(&mut multipart, &state.config.upload).await?.ok_or_else(no_file)?;
    tracing::debug!(size_bytes = file.size_bytes(), mime_type = %file.mime_type, "Received upload");

    let payload = EncodedPayload::encode(&file);
    let options = UploadOptions {
        folder: Some(state.config.upload.folder.clone()),
        public_id: None,
        resource_type: ResourceType::Image,
    };

    let asset = state
        .media
        .upload(UploadSource::DataUri(payload), &options)
        .await
        .map_err(|source| {
            counter!("album_uploads_total", "outcome" => "failure").increment(1);
            Error::Upstream {
                message: "Failed to upload image".to_string(),
                details: None,
                source,
            }
        })?;

    let optimized = state.urls.derive(&asset.public_id, DerivedUrlKind::Optimized);
    tracing::info!(public_id = %asset.public_id, url = %asset.secure_url, "Upload successful");
    counter!("album_uploads_total", "outcome" => "success").increment(1);

    Ok(Json(UploadResponse::new(asset, optimized)))
}
