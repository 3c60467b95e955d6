//! Metadata cache service
//!
//! Wraps a [`MetadataProvider`] with a persistent, time-bounded cache keyed by
//! external video id. Resolution never fails: a provider failure falls back to
//! the last stored record, or to a placeholder when nothing is stored yet.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::MetadataConfig;
use crate::database::repositories::VideoMetadataSeaOrmRepository;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::{FetchedMetadata, VideoMetadata};
use crate::sources::MetadataProvider;

pub struct MetadataCache {
    repository: VideoMetadataSeaOrmRepository,
    provider: Arc<dyn MetadataProvider>,
    freshness_window: Duration,
    provider_timeout: Duration,
}

impl MetadataCache {
    pub fn new(
        repository: VideoMetadataSeaOrmRepository,
        provider: Arc<dyn MetadataProvider>,
        config: &MetadataConfig,
    ) -> Self {
        Self {
            repository,
            provider,
            freshness_window: config.freshness_window,
            provider_timeout: config.provider_timeout,
        }
    }

    /// Resolve display metadata for an external video id
    ///
    /// A fresh stored record is returned without calling the provider. A
    /// stale or missing one triggers a single provider call; on success the
    /// result is stored with the current time. On failure the stale record is
    /// returned unchanged, or a placeholder is stored and returned when there
    /// was none. Placeholders are never fresh, so the next call retries.
    pub async fn resolve(&self, external_id: &str) -> VideoMetadata {
        let stored = match self.repository.find_by_external_id(external_id).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read cached metadata for '{}': {}", external_id, e);
                None
            }
        };

        let now = Utc::now();
        if let Some(record) = stored.as_ref().filter(|r| r.is_fresh(now, self.freshness_window)) {
            debug!("Metadata cache hit for '{}'", external_id);
            return record.clone();
        }

        match self.fetch_with_timeout(external_id).await {
            Ok(fetched) => {
                let metadata = VideoMetadata::from_fetched(external_id, fetched, Utc::now());
                if let Err(e) = self.repository.upsert(&metadata).await {
                    warn!("Failed to store metadata for '{}': {}", external_id, e);
                }
                debug!("Refreshed metadata for '{}'", external_id);
                metadata
            }
            Err(e) => {
                warn!(
                    error_kind = e.kind(),
                    "Metadata provider failed for '{}': {}", external_id, e
                );
                match stored {
                    Some(record) => record,
                    None => self.store_placeholder(external_id).await,
                }
            }
        }
    }

    async fn fetch_with_timeout(&self, external_id: &str) -> ProviderResult<FetchedMetadata> {
        match tokio::time::timeout(self.provider_timeout, self.provider.fetch(external_id)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                external_id: external_id.to_string(),
                timeout: self.provider_timeout,
            }),
        }
    }

    /// Store a placeholder unless a concurrent resolve already stored something
    async fn store_placeholder(&self, external_id: &str) -> VideoMetadata {
        let sentinel = VideoMetadata::sentinel(external_id, Utc::now());
        match self.repository.insert_if_absent(&sentinel).await {
            Ok(true) => info!("Stored placeholder metadata for '{}'", external_id),
            Ok(false) => debug!("Metadata for '{}' was stored concurrently", external_id),
            Err(e) => warn!("Failed to store placeholder for '{}': {}", external_id, e),
        }
        sentinel
    }
}
