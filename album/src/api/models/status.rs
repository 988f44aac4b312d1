use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of the liveness endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
}
