use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a successful connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProbeResponse {
    #[schema(example = "Cloudinary connection successful!")]
    pub message: String,
    /// Direct link to the stored sample
    pub original_url: String,
    /// Sample with automatic format and quality
    pub optimized_url: String,
    /// Sample cropped to a fixed size around its focal point
    pub auto_crop_url: String,
    #[schema(example = "photo-album/test-shoes")]
    pub public_id: String,
}
