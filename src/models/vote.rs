use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A voter's verdict on a pair
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VoteChoice {
    Similar,
    #[strum(to_string = "not_similar", serialize = "not-similar", serialize = "notsimilar")]
    NotSimilar,
}

/// Aggregate counters stored on a pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounters {
    pub similar: i64,
    pub not_similar: i64,
}

impl VoteCounters {
    pub fn new(similar: i64, not_similar: i64) -> Self {
        Self {
            similar,
            not_similar,
        }
    }

    pub fn total(&self) -> i64 {
        self.similar + self.not_similar
    }

    /// Percentage of similar votes, `0.0` when nobody voted
    pub fn similarity_score(&self) -> f64 {
        let total = self.total();
        if total <= 0 {
            return 0.0;
        }
        self.similar as f64 / total as f64 * 100.0
    }
}

/// One voter's stored vote on one pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub pair_id: Uuid,
    pub voter_token: String,
    pub choice: VoteChoice,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a vote did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum VoteChange {
    /// First vote from this voter on the pair
    Created { choice: VoteChoice },
    /// Same choice as already recorded
    Unchanged { choice: VoteChoice },
    /// Voter changed their mind
    Flipped { from: VoteChoice, to: VoteChoice },
}

/// Result of casting a vote, with counters before and after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub pair_id: Uuid,
    pub change: VoteChange,
    pub before: VoteCounters,
    pub after: VoteCounters,
}

impl VoteOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self.change, VoteChange::Unchanged { .. })
    }
}

/// A pair whose stored counters disagreed with its vote records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRepair {
    pub pair_id: Uuid,
    pub stored: VoteCounters,
    pub recomputed: VoteCounters,
}
