//! Metadata providers
//!
//! A provider turns an external video id into display metadata. The
//! metadata cache is the only consumer; it bounds each call with a timeout
//! and absorbs every failure.

pub mod traits;
pub mod youtube;

pub use traits::*;
pub use youtube::YouTubeMetadataProvider;
