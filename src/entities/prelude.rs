pub use super::video_metadata::Entity as VideoMetadata;
pub use super::video_pairs::Entity as VideoPairs;
pub use super::vote_records::Entity as VoteRecords;
