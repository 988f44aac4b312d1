//! Remote media storage abstraction layer
//!
//! This module defines the `MediaStore` trait which abstracts the cloud service that persists
//! uploads and serves them back, together with the pure [`url::DeliveryUrls`] builder that
//! derives transformed delivery URLs from a stored asset's public ID.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::CloudinaryConfig;
use crate::payload::EncodedPayload;

pub mod cloudinary;
pub mod url;

pub use self::url::{DeliveryUrls, DerivedUrl, DerivedUrlKind, Transformation};

/// Create the media store from configuration
pub fn create_store(config: &CloudinaryConfig) -> Result<Arc<dyn MediaStore>> {
    Ok(Arc::new(cloudinary::CloudinaryStore::new(config.clone())?))
}

/// Result type for media store operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors that can occur talking to the media service
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Request to media service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from media service: {0}")]
    InvalidResponse(String),
}

/// What the remote service should store.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// Inline file contents
    DataUri(EncodedPayload),
    /// A publicly reachable URL the service fetches itself
    RemoteUrl(String),
}

impl UploadSource {
    /// The value sent as the `file` parameter.
    pub fn into_string(self) -> String {
        match self {
            UploadSource::DataUri(payload) => payload.into_string(),
            UploadSource::RemoteUrl(url) => url,
        }
    }
}

/// Asset category, part of the upload and delivery URL paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceType {
    #[default]
    Image,
    Video,
    Raw,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Video => "video",
            ResourceType::Raw => "raw",
        }
    }
}

/// Per-upload options.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Folder the asset is stored under
    pub folder: Option<String>,
    /// Explicit public ID; the service generates one when absent
    pub public_id: Option<String>,
    pub resource_type: ResourceType,
}

/// An asset as acknowledged by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredAsset {
    /// Stable handle used for all further URL derivation
    pub public_id: String,
    /// Canonical direct link at upload time
    pub secure_url: String,
}

/// Abstract media store interface
///
/// Implementors persist an upload and report back the identifier and direct URL the remote
/// service assigned to it.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `source` and return the acknowledged asset.
    async fn upload(&self, source: UploadSource, options: &UploadOptions) -> Result<StoredAsset>;
}
