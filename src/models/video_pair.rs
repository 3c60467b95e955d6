use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::defaults::{DEFAULT_CLIP_END_SECONDS, DEFAULT_CLIP_START_SECONDS};
use crate::errors::{AppError, AppResult};
use crate::models::{VideoMetadata, VoteCounters};

/// One side of a pair: an external video and the clip window to compare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoClip {
    pub external_id: String,
    pub clip_start_seconds: i64,
    pub clip_end_seconds: i64,
}

impl VideoClip {
    pub fn new(external_id: impl Into<String>, clip_start_seconds: i64, clip_end_seconds: i64) -> Self {
        Self {
            external_id: external_id.into(),
            clip_start_seconds,
            clip_end_seconds,
        }
    }

    /// Check the clip is well formed; `field` names it in the error
    pub fn validate(&self, field: &str) -> AppResult<()> {
        if self.external_id.trim().is_empty() {
            return Err(AppError::invalid_input(
                field,
                "video identifier must not be empty",
            ));
        }
        if self.clip_start_seconds < 0 || self.clip_end_seconds < 0 {
            return Err(AppError::invalid_input(
                field,
                format!(
                    "clip bounds must be non-negative (start={}, end={})",
                    self.clip_start_seconds, self.clip_end_seconds
                ),
            ));
        }
        if self.clip_start_seconds >= self.clip_end_seconds {
            return Err(AppError::invalid_input(
                field,
                format!(
                    "clip start ({}) must be before clip end ({})",
                    self.clip_start_seconds, self.clip_end_seconds
                ),
            ));
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed from the identifier
    pub fn normalized(&self) -> Self {
        Self {
            external_id: self.external_id.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Parses `ID`, `ID:START` or `ID:START:END`
///
/// Missing bounds fall back to the 0..15 second window.
impl FromStr for VideoClip {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let external_id = parts.next().unwrap_or_default().to_string();

        let parse_bound = |raw: Option<&str>, default: i64, name: &str| -> Result<i64, String> {
            match raw {
                Some(value) => value
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| format!("Invalid {name} '{value}': {e}")),
                None => Ok(default),
            }
        };

        let clip_start_seconds = parse_bound(parts.next(), DEFAULT_CLIP_START_SECONDS, "start")?;
        let clip_end_seconds = parse_bound(parts.next(), DEFAULT_CLIP_END_SECONDS, "end")?;

        if parts.next().is_some() {
            return Err(format!("Expected ID[:START[:END]], got '{s}'"));
        }

        Ok(Self {
            external_id,
            clip_start_seconds,
            clip_end_seconds,
        })
    }
}

/// A submitted comparison between two clips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPair {
    pub id: Uuid,
    pub submitter_label: String,
    pub video_a: VideoClip,
    pub video_b: VideoClip,
    pub created_at: DateTime<Utc>,
    pub counters: VoteCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPairCreateRequest {
    pub submitter_label: String,
    pub video_a: VideoClip,
    pub video_b: VideoClip,
}

impl VideoPairCreateRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.submitter_label.trim().is_empty() {
            return Err(AppError::invalid_input(
                "submitter_label",
                "submitter label must not be empty",
            ));
        }
        self.video_a.validate("video_a")?;
        self.video_b.validate("video_b")?;
        Ok(())
    }
}

/// A pair together with display metadata for both videos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPair {
    #[serde(flatten)]
    pub pair: VideoPair,
    pub video_a_metadata: VideoMetadata,
    pub video_b_metadata: VideoMetadata,
    pub similarity_score: f64,
}

impl ResolvedPair {
    pub fn new(pair: VideoPair, video_a_metadata: VideoMetadata, video_b_metadata: VideoMetadata) -> Self {
        let similarity_score = pair.counters.similarity_score();
        Self {
            pair,
            video_a_metadata,
            video_b_metadata,
            similarity_score,
        }
    }

    /// Case-insensitive match against both titles and the submitter label
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.video_a_metadata.title.as_str(),
            self.video_b_metadata.title.as_str(),
            self.pair.submitter_label.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PairSort {
    /// Most recently submitted first
    #[default]
    #[strum(to_string = "date", serialize = "newest")]
    Newest,
    /// Highest similarity score first
    Score,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPairsQuery {
    pub sort: PairSort,
    pub search: Option<String>,
}

impl ListPairsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: PairSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
