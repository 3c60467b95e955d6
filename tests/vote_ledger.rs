//! Vote ledger integration tests
//!
//! Exercise the per-voter idempotence and the counters-equal-records
//! guarantee against a real (in-memory SQLite) database.

mod common;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use std::sync::Arc;
use uuid::Uuid;

use clipvote::{
    database::repositories::{VideoPairSeaOrmRepository, VoteRecordSeaOrmRepository},
    entities::{prelude::VideoPairs, video_pairs},
    errors::AppError,
    models::{VideoClip, VoteChange, VoteChoice, VoteCounters},
};
use common::{ScriptedProvider, create_test_services};

async fn submit(services: &clipvote::services::Services) -> Uuid {
    services
        .pairs
        .submit_pair(
            "tester",
            VideoClip::new("videoA", 0, 15),
            VideoClip::new("videoB", 5, 20),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_vote_flip_and_second_voter() {
    let (database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let pair_id = submit(&services).await;
    let votes = VoteRecordSeaOrmRepository::new(database.connection());

    let first = services
        .votes
        .cast_vote(pair_id, "v1", VoteChoice::Similar)
        .await
        .unwrap();
    assert_eq!(first.change, VoteChange::Created { choice: VoteChoice::Similar });
    assert_eq!(first.before, VoteCounters::new(0, 0));
    assert_eq!(first.after, VoteCounters::new(1, 0));

    let flipped = services
        .votes
        .cast_vote(pair_id, "v1", VoteChoice::NotSimilar)
        .await
        .unwrap();
    assert_eq!(
        flipped.change,
        VoteChange::Flipped {
            from: VoteChoice::Similar,
            to: VoteChoice::NotSimilar
        }
    );
    assert_eq!(flipped.after, VoteCounters::new(0, 1));

    let records = votes.find_by_pair(pair_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].choice, VoteChoice::NotSimilar);

    let second_voter = services
        .votes
        .cast_vote(pair_id, "v2", VoteChoice::Similar)
        .await
        .unwrap();
    assert_eq!(second_voter.after, VoteCounters::new(1, 1));
    assert_eq!(votes.tally(pair_id).await.unwrap(), VoteCounters::new(1, 1));
}

#[tokio::test]
async fn test_repeated_vote_is_noop() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let pair_id = submit(&services).await;

    services
        .votes
        .cast_vote(pair_id, "v1", VoteChoice::Similar)
        .await
        .unwrap();
    let repeated = services
        .votes
        .cast_vote(pair_id, "v1", VoteChoice::Similar)
        .await
        .unwrap();

    assert!(repeated.is_noop());
    assert_eq!(repeated.before, repeated.after);
    assert_eq!(repeated.after, VoteCounters::new(1, 0));

    let pair = services.pairs.get_pair(pair_id).await.unwrap();
    assert_eq!(pair.pair.counters, VoteCounters::new(1, 0));
    assert_eq!(pair.similarity_score, 100.0);
}

#[tokio::test]
async fn test_voter_token_is_trimmed() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let pair_id = submit(&services).await;

    services
        .votes
        .cast_vote(pair_id, "  v1 ", VoteChoice::Similar)
        .await
        .unwrap();
    let again = services
        .votes
        .cast_vote(pair_id, "v1", VoteChoice::Similar)
        .await
        .unwrap();

    assert!(again.is_noop());
    assert_eq!(
        services.votes.voter_choice(pair_id, "v1").await.unwrap(),
        Some(VoteChoice::Similar)
    );
    assert_eq!(services.votes.voter_choice(pair_id, "v9").await.unwrap(), None);
}

#[tokio::test]
async fn test_unknown_pair_and_empty_token_change_nothing() {
    let (database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let pair_id = submit(&services).await;

    let missing = services
        .votes
        .cast_vote(Uuid::new_v4(), "v1", VoteChoice::Similar)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));

    let empty = services
        .votes
        .cast_vote(pair_id, "   ", VoteChoice::Similar)
        .await;
    assert!(matches!(empty, Err(AppError::InvalidInput { .. })));

    let pairs = VideoPairSeaOrmRepository::new(database.connection());
    let pair = pairs.find_by_id(pair_id).await.unwrap().unwrap();
    assert_eq!(pair.counters, VoteCounters::new(0, 0));

    let votes = VoteRecordSeaOrmRepository::new(database.connection());
    assert!(votes.find_by_pair(pair_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_votes_keep_counters_consistent() {
    let (database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let services = Arc::new(services);
    let pair_id = submit(&services).await;

    let mut handles = Vec::new();
    for voter in 0..8 {
        for round in 0..5 {
            let services = services.clone();
            handles.push(tokio::spawn(async move {
                let choice = if (voter + round) % 2 == 0 {
                    VoteChoice::Similar
                } else {
                    VoteChoice::NotSimilar
                };
                services
                    .votes
                    .cast_vote(pair_id, &format!("voter-{voter}"), choice)
                    .await
                    .unwrap();
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let pairs = VideoPairSeaOrmRepository::new(database.connection());
    let votes = VoteRecordSeaOrmRepository::new(database.connection());

    let stored = pairs.find_by_id(pair_id).await.unwrap().unwrap().counters;
    let tally = votes.tally(pair_id).await.unwrap();

    assert_eq!(stored, tally);
    assert_eq!(stored.total(), 8);
    assert_eq!(votes.find_by_pair(pair_id).await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_votes_on_different_pairs_are_independent() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let first = submit(&services).await;
    let second = submit(&services).await;

    services
        .votes
        .cast_vote(first, "v1", VoteChoice::Similar)
        .await
        .unwrap();
    let other = services
        .votes
        .cast_vote(second, "v1", VoteChoice::NotSimilar)
        .await
        .unwrap();

    assert_eq!(other.change, VoteChange::Created { choice: VoteChoice::NotSimilar });
    assert_eq!(
        services.pairs.get_pair(first).await.unwrap().pair.counters,
        VoteCounters::new(1, 0)
    );
}

#[tokio::test]
async fn test_rebuild_counters_repairs_drift() {
    let (database, services) = create_test_services(ScriptedProvider::new(), false).await;
    let drifted = submit(&services).await;
    let healthy = submit(&services).await;

    for (voter, choice) in [
        ("v1", VoteChoice::Similar),
        ("v2", VoteChoice::Similar),
        ("v3", VoteChoice::NotSimilar),
    ] {
        services.votes.cast_vote(drifted, voter, choice).await.unwrap();
    }
    services
        .votes
        .cast_vote(healthy, "v1", VoteChoice::Similar)
        .await
        .unwrap();

    // Corrupt the stored counters behind the ledger's back
    VideoPairs::update_many()
        .col_expr(video_pairs::Column::SimilarCount, Expr::value(10i64))
        .col_expr(video_pairs::Column::NotSimilarCount, Expr::value(0i64))
        .filter(video_pairs::Column::Id.eq(drifted))
        .exec(&*database.connection())
        .await
        .unwrap();

    let repairs = services.votes.rebuild_counters().await.unwrap();
    assert_eq!(repairs.len(), 1);
    assert_eq!(repairs[0].pair_id, drifted);
    assert_eq!(repairs[0].stored, VoteCounters::new(10, 0));
    assert_eq!(repairs[0].recomputed, VoteCounters::new(2, 1));

    let pair = services.pairs.get_pair(drifted).await.unwrap();
    assert_eq!(pair.pair.counters, VoteCounters::new(2, 1));

    // A second run finds nothing to fix
    assert!(services.votes.rebuild_counters().await.unwrap().is_empty());
}
