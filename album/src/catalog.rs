//! Picture catalog.
//!
//! Nothing records uploads locally and the remote service is the system of record, so there is
//! no catalog to list from yet. [`UnimplementedCatalog`] makes that explicit: listing always
//! yields an empty collection and says so in the logs, rather than pretending a query ran.

use async_trait::async_trait;

use crate::api::models::pictures::PictureSummary;
use crate::errors::Result;

#[async_trait]
pub trait PictureCatalog: Send + Sync {
    /// List stored pictures, newest first.
    async fn list(&self) -> Result<Vec<PictureSummary>>;
}

/// Placeholder catalog used until picture metadata is persisted somewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedCatalog;

#[async_trait]
impl PictureCatalog for UnimplementedCatalog {
    async fn list(&self) -> Result<Vec<PictureSummary>> {
        tracing::debug!("Picture listing is not implemented, returning an empty collection");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unimplemented_catalog_is_empty() {
        assert!(UnimplementedCatalog.list().await.unwrap().is_empty());
    }
}
