use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored picture. Reserved for a future catalog; listings are currently always empty.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PictureSummary {
    pub public_id: String,
    pub url: String,
}
