use axum::{Json, extract::State};
use metrics::counter;

use crate::AppState;
use crate::api::models::diagnostics::ProbeResponse;
use crate::errors::{Error, ErrorBody, Result};
use crate::media::{DerivedUrlKind, ResourceType, UploadOptions, UploadSource};

#[utoipa::path(
    get,
    path = "/api/test-cloudinary",
    tag = "diagnostics",
    summary = "Probe media service connectivity",
    description = "Asks the media service to fetch a public sample image under a fixed ID, then returns the stored \
                   URL together with optimized and auto-cropped delivery URLs. Repeated calls overwrite the same asset.",
    responses(
        (status = 200, description = "Media service reachable and credentials accepted", body = ProbeResponse),
        (status = 500, description = "Probe failed; `details` carries the remote error text when enabled", body = ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn test_cloudinary(State(state): State<AppState>) -> Result<Json<ProbeResponse>> {
    let diagnostics = &state.config.diagnostics;
    let options = UploadOptions {
        folder: Some(state.config.upload.folder.clone()),
        public_id: Some(diagnostics.public_id.clone()),
        resource_type: ResourceType::Image,
    };

    let asset = state
        .media
        .upload(UploadSource::RemoteUrl(diagnostics.sample_url.clone()), &options)
        .await
        .map_err(|source| {
            counter!("album_probe_runs_total", "outcome" => "failure").increment(1);
            Error::Upstream {
                message: "Cloudinary connection failed".to_string(),
                details: diagnostics.expose_error_details.then(|| source.to_string()),
                source,
            }
        })?;

    let optimized = state.urls.derive(&asset.public_id, DerivedUrlKind::Optimized);
    let auto_cropped = state.urls.derive(
        &asset.public_id,
        DerivedUrlKind::AutoCropped {
            width: diagnostics.auto_crop_width,
            height: diagnostics.auto_crop_height,
        },
    );
    tracing::info!(public_id = %asset.public_id, "Connectivity probe succeeded");
    counter!("album_probe_runs_total", "outcome" => "success").increment(1);

    Ok(Json(ProbeResponse {
        message: "Cloudinary connection successful!".to_string(),
        original_url: asset.secure_url,
        optimized_url: optimized.url,
        auto_crop_url: auto_cropped.url,
        public_id: asset.public_id,
    }))
}
