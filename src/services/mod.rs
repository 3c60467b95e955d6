//! Service layer for business logic
//!
//! Services sit between callers (the CLI, tests) and the repository layer.
//! They own validation, in-process locking and logging; repositories own
//! transactions.
//!
//! - [`MetadataCache`]: time-bounded cache in front of a metadata provider
//! - [`VoteLedger`]: idempotent per-voter votes and counter maintenance
//! - [`VideoPairService`]: pair submission and resolved listings
//!
//! # Usage
//!
//! ```rust,ignore
//! let services = Services::new(&database, provider, &config.metadata);
//!
//! let pair_id = services.pairs.submit_pair("alice", video_a, video_b).await?;
//! services.votes.cast_vote(pair_id, "voter-1", VoteChoice::Similar).await?;
//! ```

pub mod metadata_cache;
pub mod pair_locks;
pub mod video_pair_service;
pub mod vote_ledger;

pub use metadata_cache::MetadataCache;
pub use pair_locks::PairLocks;
pub use video_pair_service::VideoPairService;
pub use vote_ledger::VoteLedger;

use std::sync::Arc;

use crate::config::MetadataConfig;
use crate::database::Database;
use crate::database::repositories::{
    VideoMetadataSeaOrmRepository, VideoPairSeaOrmRepository, VoteRecordSeaOrmRepository,
};
use crate::sources::MetadataProvider;

/// All services wired to one database and one metadata provider
pub struct Services {
    pub metadata: Arc<MetadataCache>,
    pub pairs: VideoPairService,
    pub votes: VoteLedger,
}

impl Services {
    pub fn new(
        database: &Database,
        provider: Arc<dyn MetadataProvider>,
        config: &MetadataConfig,
    ) -> Self {
        let connection = database.connection();

        let metadata = Arc::new(MetadataCache::new(
            VideoMetadataSeaOrmRepository::new(connection.clone()),
            provider,
            config,
        ));
        let pair_repository = VideoPairSeaOrmRepository::new(connection.clone());

        Self {
            pairs: VideoPairService::new(
                pair_repository.clone(),
                metadata.clone(),
                config.warm_up_on_submit,
            ),
            votes: VoteLedger::new(VoteRecordSeaOrmRepository::new(connection), pair_repository),
            metadata,
        }
    }
}
