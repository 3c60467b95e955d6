//! Video pair service
//!
//! Pair submission (validation, storage, optional metadata warm-up) and the
//! read side used by listings: pairs joined with their resolved metadata and
//! similarity score.

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::repositories::VideoPairSeaOrmRepository;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ListPairsQuery, PairSort, ResolvedPair, VideoClip, VideoMetadata, VideoPair,
    VideoPairCreateRequest,
};
use crate::services::MetadataCache;

/// Upper bound on metadata resolutions in flight for one listing
const MAX_CONCURRENT_RESOLVES: usize = 8;

pub struct VideoPairService {
    pairs: VideoPairSeaOrmRepository,
    metadata: Arc<MetadataCache>,
    warm_up_on_submit: bool,
}

impl VideoPairService {
    pub fn new(
        pairs: VideoPairSeaOrmRepository,
        metadata: Arc<MetadataCache>,
        warm_up_on_submit: bool,
    ) -> Self {
        Self {
            pairs,
            metadata,
            warm_up_on_submit,
        }
    }

    /// Validate and store a new pair with zero votes
    ///
    /// When warm-up is enabled, both videos are resolved in a background
    /// task after the pair is stored. Warm-up never affects the result.
    pub async fn submit_pair(
        &self,
        submitter_label: &str,
        video_a: VideoClip,
        video_b: VideoClip,
    ) -> AppResult<Uuid> {
        let request = VideoPairCreateRequest {
            submitter_label: submitter_label.to_string(),
            video_a,
            video_b,
        };
        request.validate()?;

        let pair = self.pairs.create(request).await?;
        info!(
            "Created pair {} ({} vs {}) submitted by '{}'",
            pair.id, pair.video_a.external_id, pair.video_b.external_id, pair.submitter_label
        );

        if self.warm_up_on_submit {
            self.spawn_warm_up(&pair);
        }

        Ok(pair.id)
    }

    fn spawn_warm_up(&self, pair: &VideoPair) {
        let metadata = self.metadata.clone();
        let pair_id = pair.id;
        let ids = [
            pair.video_a.external_id.clone(),
            pair.video_b.external_id.clone(),
        ];

        tokio::spawn(async move {
            for external_id in ids {
                let resolved = metadata.resolve(&external_id).await;
                debug!(
                    "Warm-up for pair {} resolved '{}' (placeholder: {})",
                    pair_id, external_id, resolved.is_placeholder
                );
            }
        });
    }

    /// Fetch one pair with its metadata and score
    pub async fn get_pair(&self, pair_id: Uuid) -> AppResult<ResolvedPair> {
        let pair = self
            .pairs
            .find_by_id(pair_id)
            .await?
            .ok_or_else(|| AppError::not_found("video_pair", pair_id.to_string()))?;

        let (video_a, video_b) = futures::join!(
            self.metadata.resolve(&pair.video_a.external_id),
            self.metadata.resolve(&pair.video_b.external_id)
        );

        Ok(ResolvedPair::new(pair, video_a, video_b))
    }

    /// List pairs with resolved metadata, filtered and sorted per `query`
    ///
    /// Each distinct external id is resolved once per call.
    pub async fn list_pairs(&self, query: &ListPairsQuery) -> AppResult<Vec<ResolvedPair>> {
        let pairs = self.pairs.list_all().await?;

        let external_ids: HashSet<&str> = pairs
            .iter()
            .flat_map(|pair| [pair.video_a.external_id.as_str(), pair.video_b.external_id.as_str()])
            .collect();

        let resolved: HashMap<String, VideoMetadata> = stream::iter(external_ids)
            .map(|external_id| async move {
                (external_id.to_string(), self.metadata.resolve(external_id).await)
            })
            .buffer_unordered(MAX_CONCURRENT_RESOLVES)
            .collect()
            .await;

        // Every id in `pairs` was resolved above
        let lookup = |external_id: &str| resolved[external_id].clone();

        let mut listing: Vec<ResolvedPair> = pairs
            .iter()
            .map(|pair| {
                ResolvedPair::new(
                    pair.clone(),
                    lookup(&pair.video_a.external_id),
                    lookup(&pair.video_b.external_id),
                )
            })
            .collect();

        if let Some(term) = query.search.as_deref() {
            listing.retain(|pair| pair.matches_search(term));
        }

        Self::sort_listing(&mut listing, query.sort);

        debug!("Listed {} pairs ({} distinct videos)", listing.len(), resolved.len());
        Ok(listing)
    }

    fn sort_listing(listing: &mut [ResolvedPair], sort: PairSort) {
        match sort {
            PairSort::Newest => {
                listing.sort_by(|a, b| b.pair.created_at.cmp(&a.pair.created_at));
            }
            PairSort::Score => {
                listing.sort_by(|a, b| {
                    b.similarity_score
                        .total_cmp(&a.similarity_score)
                        .then_with(|| b.pair.created_at.cmp(&a.pair.created_at))
                });
            }
        }
    }
}
