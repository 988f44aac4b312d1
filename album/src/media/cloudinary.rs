//! Cloudinary media store implementation
//!
//! Uploads go to the signed upload endpoint:
//!
//! ```text
//! POST {api_base}/v1_1/{cloud_name}/{resource_type}/upload
//! ```
//!
//! as a multipart form. The `file` field carries either a data URI or a remote URL that
//! Cloudinary fetches itself. Every parameter other than `file`, `api_key`, `cloud_name` and
//! `resource_type` is covered by the request signature.

use async_trait::async_trait;
use reqwest::{Client, multipart::Form};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::{MediaError, MediaStore, Result, StoredAsset, UploadOptions, UploadSource};
use crate::config::{CloudinaryConfig, SignatureAlgorithm};

/// Error envelope returned by the upload API on 4xx/5xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// Media store backed by a Cloudinary account
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    /// Create a new store with its own HTTP client.
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    fn upload_endpoint(&self, options: &UploadOptions) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            options.resource_type.as_str()
        )
    }

    /// Parameters covered by the signature, keyed by name in signing order.
    fn signed_params(&self, options: &UploadOptions, timestamp: i64) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        if let Some(folder) = &options.folder {
            params.insert("folder", folder.clone());
        }
        if let Some(public_id) = &options.public_id {
            params.insert("public_id", public_id.clone());
        }
        params.insert("timestamp", timestamp.to_string());
        params
    }
}

/// Build the string the signature is computed over: `k1=v1&k2=v2`, sorted by key, blanks dropped.
pub fn string_to_sign(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign upload parameters with the account's API secret.
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut payload = string_to_sign(params);
    payload.push_str(api_secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(payload.as_bytes())),
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    #[instrument(skip_all, fields(folder = ?options.folder, public_id = ?options.public_id))]
    async fn upload(&self, source: UploadSource, options: &UploadOptions) -> Result<StoredAsset> {
        let endpoint = self.upload_endpoint(options);
        let params = self.signed_params(options, chrono::Utc::now().timestamp());
        let signature = sign(&params, &self.config.api_secret, self.config.signature_algorithm);

        let mut form = Form::new().text("file", source.into_string());
        for (key, value) in params {
            form = form.text(key, value);
        }
        let form = form.text("api_key", self.config.api_key.clone()).text("signature", signature);

        debug!(endpoint = %endpoint, "Sending upload to media service");

        let response = self.client.post(&endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<StoredAsset>(&body).map_err(|e| MediaError::InvalidResponse(format!("{e}. Response body: {body}")))
    }
}
