//! Vote ledger service
//!
//! Records at most one vote per (pair, voter) and keeps each pair's counters
//! equal to its vote records grouped by choice. Repeating a vote is a no-op;
//! changing it moves exactly one vote between the two counters.
//!
//! Votes on one pair are serialized in-process by [`PairLocks`] and, across
//! processes, by the repository transaction. The pair lock is always taken
//! before a database connection is checked out.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::database::repositories::{VideoPairSeaOrmRepository, VoteRecordSeaOrmRepository};
use crate::errors::{AppError, AppResult};
use crate::models::{CounterRepair, VoteChange, VoteChoice, VoteOutcome};
use crate::services::PairLocks;

pub struct VoteLedger {
    votes: VoteRecordSeaOrmRepository,
    pairs: VideoPairSeaOrmRepository,
    locks: PairLocks,
}

impl VoteLedger {
    pub fn new(votes: VoteRecordSeaOrmRepository, pairs: VideoPairSeaOrmRepository) -> Self {
        Self {
            votes,
            pairs,
            locks: PairLocks::new(),
        }
    }

    /// Record `voter_token`'s choice for a pair
    ///
    /// Fails with `NotFound` for an unknown pair and `InvalidInput` for an
    /// empty voter token; neither changes any state.
    pub async fn cast_vote(
        &self,
        pair_id: Uuid,
        voter_token: &str,
        choice: VoteChoice,
    ) -> AppResult<VoteOutcome> {
        let voter_token = Self::normalize_token(voter_token)?;

        let _guard = self.locks.acquire(pair_id).await;
        let outcome = self.votes.apply_vote(pair_id, voter_token, choice).await?;

        match outcome.change {
            VoteChange::Created { choice } => {
                info!("New '{}' vote on pair {}", choice, pair_id);
            }
            VoteChange::Flipped { from, to } => {
                info!("Vote on pair {} changed from '{}' to '{}'", pair_id, from, to);
            }
            VoteChange::Unchanged { choice } => {
                debug!("Repeated '{}' vote on pair {} ignored", choice, pair_id);
            }
        }

        Ok(outcome)
    }

    /// The choice currently recorded for a voter on a pair, if any
    pub async fn voter_choice(&self, pair_id: Uuid, voter_token: &str) -> AppResult<Option<VoteChoice>> {
        let voter_token = Self::normalize_token(voter_token)?;

        if self.pairs.find_by_id(pair_id).await?.is_none() {
            return Err(AppError::not_found("video_pair", pair_id.to_string()));
        }

        Ok(self
            .votes
            .find(pair_id, voter_token)
            .await?
            .map(|record| record.choice))
    }

    /// Recompute every pair's counters from its vote records
    ///
    /// Returns one entry per pair whose stored counters had drifted. Each
    /// pair is repaired under its vote lock.
    pub async fn rebuild_counters(&self) -> AppResult<Vec<CounterRepair>> {
        let pairs = self.pairs.list_all().await?;
        let mut repairs = Vec::new();

        for pair in &pairs {
            let _guard = self.locks.acquire(pair.id).await;
            match self.votes.rebuild_counters(pair.id).await {
                Ok(Some(repair)) => {
                    warn!(
                        "Repaired counters for pair {}: {}/{} -> {}/{}",
                        repair.pair_id,
                        repair.stored.similar,
                        repair.stored.not_similar,
                        repair.recomputed.similar,
                        repair.recomputed.not_similar
                    );
                    repairs.push(repair);
                }
                Ok(None) => {}
                // Deleted between listing and locking
                Err(AppError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        info!(
            "Counter rebuild checked {} pairs, repaired {}",
            pairs.len(),
            repairs.len()
        );

        Ok(repairs)
    }

    fn normalize_token(voter_token: &str) -> AppResult<&str> {
        let token = voter_token.trim();
        if token.is_empty() {
            return Err(AppError::invalid_input(
                "voter_token",
                "voter token must not be empty",
            ));
        }
        Ok(token)
    }
}
