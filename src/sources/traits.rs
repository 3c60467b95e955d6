//! Metadata provider trait definitions

use async_trait::async_trait;

use crate::errors::ProviderResult;
use crate::models::FetchedMetadata;

/// Remote source of video display metadata
///
/// Calls may be slow and rate limited; callers must not retry inline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch title and attribution for one external video id
    async fn fetch(&self, external_id: &str) -> ProviderResult<FetchedMetadata>;
}
