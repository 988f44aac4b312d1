use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::media::{DerivedUrl, StoredAsset};

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Direct link to the stored original
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1712345/photo-album/abc123.jpg")]
    pub url: String,
    /// Delivery URL with automatic format and quality
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/f_auto,q_auto/v1/photo-album/abc123")]
    pub optimized_url: String,
    /// Handle for deriving further URLs
    #[schema(example = "photo-album/abc123")]
    pub public_id: String,
}

impl UploadResponse {
    pub fn new(asset: StoredAsset, optimized: DerivedUrl) -> Self {
        Self {
            url: asset.secure_url,
            optimized_url: optimized.url,
            public_id: asset.public_id,
        }
    }
}
