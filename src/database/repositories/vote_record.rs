//! SeaORM VoteRecord repository implementation
//!
//! Owns the transactional side of the vote ledger. Every mutation of a pair's
//! counters happens here, inside one transaction that also touches the
//! matching vote record, so counters always equal the vote records grouped
//! by choice once the transaction commits.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::database::repositories::VideoPairSeaOrmRepository;
use crate::entities::{
    prelude::{VideoPairs, VoteRecords},
    video_pairs, vote_records,
};
use crate::errors::{AppError, AppResult};
use crate::models::{CounterRepair, VoteChange, VoteChoice, VoteCounters, VoteOutcome, VoteRecord};

/// SeaORM-based repository for per-voter vote records
#[derive(Clone)]
pub struct VoteRecordSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl VoteRecordSeaOrmRepository {
    /// Create a new repository instance
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Find the vote a voter cast on a pair
    pub async fn find(&self, pair_id: Uuid, voter_token: &str) -> AppResult<Option<VoteRecord>> {
        let model = VoteRecords::find_by_id((pair_id, voter_token.to_string()))
            .one(&*self.connection)
            .await?;

        model.map(Self::model_to_domain).transpose()
    }

    /// All vote records for a pair
    pub async fn find_by_pair(&self, pair_id: Uuid) -> AppResult<Vec<VoteRecord>> {
        let models = VoteRecords::find()
            .filter(vote_records::Column::PairId.eq(pair_id))
            .all(&*self.connection)
            .await?;

        models.into_iter().map(Self::model_to_domain).collect()
    }

    /// Counters derived from the vote records of one pair
    pub async fn tally(&self, pair_id: Uuid) -> AppResult<VoteCounters> {
        Self::tally_on(&*self.connection, pair_id).await
    }

    /// Record a vote and adjust the pair's counters in one transaction
    ///
    /// - no record yet: insert it and increment the chosen counter
    /// - same choice: nothing changes
    /// - different choice: update the record, then move one vote from the
    ///   old counter to the new one in a single `UPDATE`
    pub async fn apply_vote(
        &self,
        pair_id: Uuid,
        voter_token: &str,
        choice: VoteChoice,
    ) -> AppResult<VoteOutcome> {
        let txn = self.connection.begin().await?;

        let before = Self::lock_pair(&txn, pair_id).await?;

        let existing = VoteRecords::find_by_id((pair_id, voter_token.to_string()))
            .one(&txn)
            .await?;
        let now = chrono::Utc::now();

        let change = match existing {
            None => {
                let record = vote_records::ActiveModel {
                    pair_id: Set(pair_id),
                    voter_token: Set(voter_token.to_string()),
                    choice: Set(choice.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                record.insert(&txn).await?;

                let column = Self::counter_column(choice);
                VideoPairs::update_many()
                    .col_expr(column, Expr::col(column).add(1))
                    .filter(video_pairs::Column::Id.eq(pair_id))
                    .exec(&txn)
                    .await?;

                VoteChange::Created { choice }
            }
            Some(model) => {
                let previous = Self::parse_choice(&model.choice)?;
                if previous == choice {
                    VoteChange::Unchanged { choice }
                } else {
                    let mut active_model: vote_records::ActiveModel = model.into();
                    active_model.choice = Set(choice.to_string());
                    active_model.updated_at = Set(now);
                    active_model.update(&txn).await?;

                    let added = Self::counter_column(choice);
                    let removed = Self::counter_column(previous);
                    VideoPairs::update_many()
                        .col_expr(added, Expr::col(added).add(1))
                        .col_expr(removed, Expr::col(removed).sub(1))
                        .filter(video_pairs::Column::Id.eq(pair_id))
                        .exec(&txn)
                        .await?;

                    VoteChange::Flipped {
                        from: previous,
                        to: choice,
                    }
                }
            }
        };

        let after = match change {
            VoteChange::Unchanged { .. } => before,
            _ => Self::read_counters(&txn, pair_id).await?,
        };

        txn.commit().await?;

        debug!(
            "Vote on pair {}: {:?} ({}/{} -> {}/{})",
            pair_id, change, before.similar, before.not_similar, after.similar, after.not_similar
        );

        Ok(VoteOutcome {
            pair_id,
            change,
            before,
            after,
        })
    }

    /// Recompute one pair's counters from its vote records
    ///
    /// Returns the repair applied, or `None` when the stored counters were
    /// already correct.
    pub async fn rebuild_counters(&self, pair_id: Uuid) -> AppResult<Option<CounterRepair>> {
        let txn = self.connection.begin().await?;

        let stored = Self::lock_pair(&txn, pair_id).await?;
        let recomputed = Self::tally_on(&txn, pair_id).await?;

        if stored == recomputed {
            txn.commit().await?;
            return Ok(None);
        }

        VideoPairs::update_many()
            .col_expr(video_pairs::Column::SimilarCount, Expr::value(recomputed.similar))
            .col_expr(
                video_pairs::Column::NotSimilarCount,
                Expr::value(recomputed.not_similar),
            )
            .filter(video_pairs::Column::Id.eq(pair_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(Some(CounterRepair {
            pair_id,
            stored,
            recomputed,
        }))
    }

    /// Take the write lock on a pair row and return its current counters
    ///
    /// The no-op `UPDATE` runs before any read so the transaction holds the
    /// row (PostgreSQL, MySQL) or the database write lock (SQLite) for the
    /// whole read-modify-write sequence.
    async fn lock_pair(txn: &DatabaseTransaction, pair_id: Uuid) -> AppResult<VoteCounters> {
        VideoPairs::update_many()
            .col_expr(
                video_pairs::Column::SimilarCount,
                Expr::col(video_pairs::Column::SimilarCount).into(),
            )
            .filter(video_pairs::Column::Id.eq(pair_id))
            .exec(txn)
            .await?;

        Self::read_counters(txn, pair_id).await
    }

    async fn read_counters<C: ConnectionTrait>(conn: &C, pair_id: Uuid) -> AppResult<VoteCounters> {
        VideoPairSeaOrmRepository::find_by_id_on(conn, pair_id)
            .await?
            .map(|pair| pair.counters)
            .ok_or_else(|| AppError::not_found("video_pair", pair_id.to_string()))
    }

    async fn tally_on<C: ConnectionTrait>(conn: &C, pair_id: Uuid) -> AppResult<VoteCounters> {
        let rows: Vec<(String, i64)> = VoteRecords::find()
            .select_only()
            .column(vote_records::Column::Choice)
            .column_as(Expr::col(vote_records::Column::VoterToken).count(), "votes")
            .filter(vote_records::Column::PairId.eq(pair_id))
            .group_by(vote_records::Column::Choice)
            .into_tuple()
            .all(conn)
            .await?;

        let mut by_choice: HashMap<VoteChoice, i64> = HashMap::new();
        for (choice, votes) in rows {
            *by_choice.entry(Self::parse_choice(&choice)?).or_default() += votes;
        }

        Ok(VoteCounters::new(
            by_choice.get(&VoteChoice::Similar).copied().unwrap_or(0),
            by_choice.get(&VoteChoice::NotSimilar).copied().unwrap_or(0),
        ))
    }

    fn counter_column(choice: VoteChoice) -> video_pairs::Column {
        match choice {
            VoteChoice::Similar => video_pairs::Column::SimilarCount,
            VoteChoice::NotSimilar => video_pairs::Column::NotSimilarCount,
        }
    }

    fn parse_choice(raw: &str) -> AppResult<VoteChoice> {
        VoteChoice::from_str(raw)
            .map_err(|e| AppError::internal(format!("Invalid stored vote choice '{raw}': {e}")))
    }

    fn model_to_domain(model: vote_records::Model) -> AppResult<VoteRecord> {
        Ok(VoteRecord {
            choice: Self::parse_choice(&model.choice)?,
            pair_id: model.pair_id,
            voter_token: model.voter_token,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
