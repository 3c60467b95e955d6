//! SeaORM repository implementations
//!
//! This module provides repository implementations using SeaORM that work across
//! SQLite, PostgreSQL, and MySQL databases.

pub mod video_metadata;
pub mod video_pair;
pub mod vote_record;

// Re-export for convenience
pub use video_metadata::VideoMetadataSeaOrmRepository;
pub use video_pair::VideoPairSeaOrmRepository;
pub use vote_record::VoteRecordSeaOrmRepository;
