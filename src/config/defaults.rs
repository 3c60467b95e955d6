/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./clipvote.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Metadata cache defaults
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_WARM_UP_ON_SUBMIT: bool = true;

// YouTube Data API defaults
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

// Submission defaults (mirrors the clip window pre-filled by the submission form)
pub const DEFAULT_CLIP_START_SECONDS: i64 = 0;
pub const DEFAULT_CLIP_END_SECONDS: i64 = 15;

// Environment variable prefix for overrides, e.g. CLIPVOTE_YOUTUBE__API_KEY
pub const ENV_PREFIX: &str = "CLIPVOTE_";
