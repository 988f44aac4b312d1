//! OpenAPI documentation for the album API.
//!
//! Served as JSON at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;
use crate::errors::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Photo album API",
        description = "Upload images to a managed media service and get back optimized delivery URLs."
    ),
    paths(
        api::handlers::status::root,
        api::handlers::uploads::upload_image,
        api::handlers::pictures::list_pictures,
        api::handlers::diagnostics::test_cloudinary,
    ),
    components(schemas(
        api::models::status::StatusResponse,
        api::models::uploads::UploadResponse,
        api::models::pictures::PictureSummary,
        api::models::diagnostics::ProbeResponse,
        ErrorBody,
    )),
    tags(
        (name = "status", description = "Liveness"),
        (name = "uploads", description = "Image uploads"),
        (name = "pictures", description = "Picture listing"),
        (name = "diagnostics", description = "Media service connectivity checks"),
    )
)]
pub struct ApiDoc;
