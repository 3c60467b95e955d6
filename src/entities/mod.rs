//! SeaORM entity definitions

pub mod prelude;

pub mod video_metadata;
pub mod video_pairs;
pub mod vote_records;
