//! Request-scoped upload values and the data URI encoding sent to the media service.
//!
//! An [`UploadedFile`] is what the upload handler assembles from the multipart body. It is
//! turned into an [`EncodedPayload`] - a `data:<mime>;base64,<bytes>` string - which the media
//! service accepts in place of a binary file part.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use bytes::Bytes;

/// MIME type used when neither the client nor the filename tells us better
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A file received in an upload request, held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Resolve the MIME type of a multipart part.
///
/// The declared `Content-Type` wins. Without one, guess from the filename extension, and fall
/// back to `application/octet-stream` so a type is always present.
pub fn resolve_mime_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|m| !m.is_empty()) {
        return declared.to_string();
    }

    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

/// Self-describing, base64 encoded form of an [`UploadedFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    data_uri: String,
}

impl EncodedPayload {
    pub fn encode(file: &UploadedFile) -> Self {
        let mut data_uri = String::with_capacity(file.mime_type.len() + 13 + base64::encoded_len(file.bytes.len(), true).unwrap_or(0));
        data_uri.push_str("data:");
        data_uri.push_str(&file.mime_type);
        data_uri.push_str(";base64,");
        BASE64_STANDARD.encode_string(&file.bytes, &mut data_uri);
        Self { data_uri }
    }

    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn into_string(self) -> String {
        self.data_uri
    }

    /// Split the data URI back into its MIME type and raw bytes.
    pub fn decode(&self) -> Option<UploadedFile> {
        let rest = self.data_uri.strip_prefix("data:")?;
        let (mime_type, encoded) = rest.split_once(";base64,")?;
        let bytes = BASE64_STANDARD.decode(encoded).ok()?;
        Some(UploadedFile::new(bytes, mime_type))
    }
}
