//! Domain models shared by the repositories and services

pub mod video_metadata;
pub mod video_pair;
pub mod vote;

pub use video_metadata::*;
pub use video_pair::*;
pub use vote::*;
