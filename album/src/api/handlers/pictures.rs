use axum::{Json, extract::State};

use crate::AppState;
use crate::api::models::pictures::PictureSummary;
use crate::errors::Result;

#[utoipa::path(
    get,
    path = "/api/pictures",
    tag = "pictures",
    summary = "List pictures",
    description = "Placeholder for picture listing. No picture catalog is kept yet, so the result is always empty.",
    responses(
        (status = 200, description = "Stored pictures (currently always empty)", body = [PictureSummary]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_pictures(State(state): State<AppState>) -> Result<Json<Vec<PictureSummary>>> {
    let pictures = state.catalog.list().await?;
    Ok(Json(pictures))
}
