//! Delivery URL derivation.
//!
//! Cloudinary resolves transformations at fetch time from the URL itself:
//!
//! ```text
//! https://res.cloudinary.com/<cloud>/image/upload/<transformation>/<version>/<public_id>
//! ```
//!
//! so deriving an optimized or cropped variant of a stored asset is pure string building. No
//! network call is made here.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::ResourceType;
use crate::config::CloudinaryConfig;

/// Characters left unescaped in public IDs, matching the SDKs' `smart_escape`.
const PUBLIC_ID_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'/').remove(b':');

/// Named transformation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    pub crop: Option<String>,
    pub fetch_format: Option<String>,
    pub gravity: Option<String>,
    pub height: Option<u32>,
    pub quality: Option<String>,
    pub width: Option<u32>,
}

impl Transformation {
    /// Let the service pick the best format and compression for the requesting client.
    pub fn optimized() -> Self {
        Self {
            fetch_format: Some("auto".to_string()),
            quality: Some("auto".to_string()),
            ..Default::default()
        }
    }

    /// Crop to a fixed size around the automatically detected focal point.
    pub fn auto_crop(width: u32, height: u32) -> Self {
        Self {
            crop: Some("auto".to_string()),
            gravity: Some("auto".to_string()),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Render as a URL path component, e.g. `c_auto,g_auto,h_500,w_500`.
    ///
    /// Parameters are sorted the way the SDKs sort them so equal option sets always produce
    /// byte-identical URLs. Returns `None` when no parameter is set.
    pub fn to_component(&self) -> Option<String> {
        let mut params: Vec<String> = [
            ("c", self.crop.clone()),
            ("f", self.fetch_format.clone()),
            ("g", self.gravity.clone()),
            ("h", self.height.map(|h| h.to_string())),
            ("q", self.quality.clone()),
            ("w", self.width.map(|w| w.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| format!("{key}_{v}")))
        .collect();

        if params.is_empty() {
            return None;
        }
        params.sort();
        Some(params.join(","))
    }
}

/// The derived URL variants the API hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedUrlKind {
    /// Auto format, auto quality
    Optimized,
    /// Fixed size, automatic crop and gravity
    AutoCropped { width: u32, height: u32 },
}

impl DerivedUrlKind {
    pub fn transformation(&self) -> Transformation {
        match *self {
            DerivedUrlKind::Optimized => Transformation::optimized(),
            DerivedUrlKind::AutoCropped { width, height } => Transformation::auto_crop(width, height),
        }
    }
}

/// A URL computed from a public ID; it has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedUrl {
    pub kind: DerivedUrlKind,
    pub url: String,
}

/// Builds delivery URLs for one account.
#[derive(Debug, Clone)]
pub struct DeliveryUrls {
    cloud_name: String,
    host: String,
    secure: bool,
}

impl DeliveryUrls {
    pub fn new(cloud_name: impl Into<String>, host: impl Into<String>, secure: bool) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            host: host.into(),
            secure,
        }
    }

    pub fn from_config(config: &CloudinaryConfig) -> Self {
        Self::new(&config.cloud_name, &config.delivery_host, config.secure)
    }

    pub fn derive(&self, public_id: &str, kind: DerivedUrlKind) -> DerivedUrl {
        DerivedUrl {
            kind,
            url: self.url(public_id, ResourceType::Image, &kind.transformation()),
        }
    }

    pub fn url(&self, public_id: &str, resource_type: ResourceType, transformation: &Transformation) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let mut url = format!("{scheme}://{}/{}/{}/upload", self.host, self.cloud_name, resource_type.as_str());

        if let Some(component) = transformation.to_component() {
            url.push('/');
            url.push_str(&component);
        }

        // Assets in folders need a version segment or the folder is read as a transformation
        if needs_default_version(public_id) {
            url.push_str("/v1");
        }

        url.push('/');
        url.extend(utf8_percent_encode(public_id, PUBLIC_ID_ESCAPE));
        url
    }
}

fn needs_default_version(public_id: &str) -> bool {
    if !public_id.contains('/') || public_id.starts_with("http://") || public_id.starts_with("https://") {
        return false;
    }

    let explicit_version = public_id
        .strip_prefix('v')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()));
    !explicit_version
}
