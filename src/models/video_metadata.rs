use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Title used when the provider never produced real metadata
pub const SENTINEL_TITLE: &str = "Unavailable";

/// Display metadata for an external video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub external_id: String,
    pub title: String,
    pub attribution: String,
    pub fetched_at: DateTime<Utc>,
    /// Placeholder values are never fresh
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_placeholder: bool,
}

/// What a provider returns for a single video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedMetadata {
    pub title: String,
    pub attribution: String,
}

impl VideoMetadata {
    /// Placeholder used when nothing real is known about a video
    pub fn sentinel(external_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            external_id: external_id.into(),
            title: SENTINEL_TITLE.to_string(),
            attribution: String::new(),
            fetched_at: now,
            is_placeholder: true,
        }
    }

    pub fn from_fetched(external_id: impl Into<String>, fetched: FetchedMetadata, now: DateTime<Utc>) -> Self {
        Self {
            external_id: external_id.into(),
            title: fetched.title,
            attribution: fetched.attribution,
            fetched_at: now,
            is_placeholder: false,
        }
    }

    /// Fresh while `now - fetched_at < window`; placeholders never are
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        if self.is_placeholder {
            return false;
        }
        let Ok(window) = chrono::Duration::from_std(window) else {
            // Window too large to represent: treat as never expiring
            return true;
        };
        now.signed_duration_since(self.fetched_at) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    fn fetched(title: &str) -> FetchedMetadata {
        FetchedMetadata {
            title: title.to_string(),
            attribution: "Channel".to_string(),
        }
    }

    #[test]
    fn test_freshness_window_boundary() {
        let now = Utc::now();
        let meta = VideoMetadata::from_fetched("abc", fetched("Song"), now);

        assert!(meta.is_fresh(now, WEEK));
        assert!(meta.is_fresh(now + chrono::Duration::days(6), WEEK));
        // Exactly at the window edge the record is stale
        assert!(!meta.is_fresh(now + chrono::Duration::days(7), WEEK));
        assert!(!meta.is_fresh(now + chrono::Duration::days(30), WEEK));
    }

    #[test]
    fn test_sentinel_is_never_fresh() {
        let now = Utc::now();
        let sentinel = VideoMetadata::sentinel("abc", now);
        assert_eq!(sentinel.title, SENTINEL_TITLE);
        assert_eq!(sentinel.attribution, "");
        assert!(!sentinel.is_fresh(now, WEEK));
    }
}
