//! Pair submission and listing integration tests

mod common;

use rstest::rstest;
use std::time::Duration;

use clipvote::{
    database::repositories::{VideoMetadataSeaOrmRepository, VideoPairSeaOrmRepository},
    errors::AppError,
    models::{ListPairsQuery, PairSort, SENTINEL_TITLE, VideoClip, VoteChoice, VoteCounters},
};
use common::{ScriptedProvider, create_test_services, wait_for};

#[rstest]
#[case::empty_id(VideoClip::new("   ", 0, 15), "video_a")]
#[case::negative_start(VideoClip::new("abc", -1, 15), "video_a")]
#[case::start_after_end(VideoClip::new("abc", 20, 10), "video_a")]
#[case::empty_window(VideoClip::new("abc", 10, 10), "video_a")]
#[tokio::test]
async fn test_invalid_clip_is_rejected(#[case] video_a: VideoClip, #[case] expected_field: &str) {
    let (database, services) = create_test_services(ScriptedProvider::new(), false).await;

    let result = services
        .pairs
        .submit_pair("tester", video_a, VideoClip::new("other", 0, 15))
        .await;

    match result {
        Err(AppError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    let pairs = VideoPairSeaOrmRepository::new(database.connection());
    assert!(pairs.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_label_is_rejected() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;

    let result = services
        .pairs
        .submit_pair("  ", VideoClip::new("a", 0, 15), VideoClip::new("b", 0, 15))
        .await;

    assert!(matches!(
        result,
        Err(AppError::InvalidInput { ref field, .. }) if field == "submitter_label"
    ));
}

#[tokio::test]
async fn test_submit_stores_trimmed_pair_with_zero_votes() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;

    let pair_id = services
        .pairs
        .submit_pair(
            " alice ",
            VideoClip::new(" dQw4w9WgXcQ ", 0, 15),
            VideoClip::new("9bZkp7q19f0", 30, 45),
        )
        .await
        .unwrap();

    let resolved = services.pairs.get_pair(pair_id).await.unwrap();
    assert_eq!(resolved.pair.submitter_label, "alice");
    assert_eq!(resolved.pair.video_a.external_id, "dQw4w9WgXcQ");
    assert_eq!(resolved.pair.video_b.clip_start_seconds, 30);
    assert_eq!(resolved.pair.video_b.clip_end_seconds, 45);
    assert_eq!(resolved.pair.counters, VoteCounters::new(0, 0));
    assert_eq!(resolved.similarity_score, 0.0);
    assert_eq!(resolved.video_a_metadata.title, "Title dQw4w9WgXcQ");
}

#[tokio::test]
async fn test_warm_up_populates_cache() {
    let provider = ScriptedProvider::new();
    let (database, services) = create_test_services(provider.clone(), true).await;

    services
        .pairs
        .submit_pair("tester", VideoClip::new("a1", 0, 15), VideoClip::new("b1", 0, 15))
        .await
        .unwrap();

    wait_for(|| provider.calls() >= 2).await;

    let metadata = VideoMetadataSeaOrmRepository::new(database.connection());
    wait_for_record(&metadata, "a1").await;
    wait_for_record(&metadata, "b1").await;

    // Listing is served from the warmed cache
    services.pairs.list_pairs(&ListPairsQuery::new()).await.unwrap();
    assert_eq!(provider.calls(), 2);
}

async fn wait_for_record(repository: &VideoMetadataSeaOrmRepository, external_id: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while repository.find_by_external_id(external_id).await.unwrap().is_none() {
        assert!(tokio::time::Instant::now() < deadline, "{external_id} never cached");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_warm_up_failure_does_not_fail_submission() {
    let provider = ScriptedProvider::new();
    provider.set_failing(true);
    let (_database, services) = create_test_services(provider.clone(), true).await;

    let pair_id = services
        .pairs
        .submit_pair("tester", VideoClip::new("a1", 0, 15), VideoClip::new("b1", 0, 15))
        .await
        .unwrap();

    wait_for(|| provider.calls() >= 2).await;

    let resolved = services.pairs.get_pair(pair_id).await.unwrap();
    assert_eq!(resolved.video_a_metadata.title, SENTINEL_TITLE);
    assert_eq!(resolved.video_b_metadata.title, SENTINEL_TITLE);
}

#[tokio::test]
async fn test_listing_survives_failing_provider() {
    let provider = ScriptedProvider::new();
    provider.set_failing(true);
    let (_database, services) = create_test_services(provider.clone(), false).await;

    let first = services
        .pairs
        .submit_pair("alice", VideoClip::new("shared", 0, 15), VideoClip::new("x1", 0, 15))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = services
        .pairs
        .submit_pair("bob", VideoClip::new("shared", 0, 15), VideoClip::new("x2", 0, 15))
        .await
        .unwrap();
    services.votes.cast_vote(first, "v1", VoteChoice::Similar).await.unwrap();

    let listing = services
        .pairs
        .list_pairs(&ListPairsQuery::new())
        .await
        .expect("listing must not fail when the provider does");

    assert_eq!(listing.len(), 2);
    // "shared" is resolved once for both pairs
    assert_eq!(provider.calls(), 3);
    for resolved in &listing {
        for metadata in [&resolved.video_a_metadata, &resolved.video_b_metadata] {
            assert_eq!(metadata.title, SENTINEL_TITLE);
            assert_eq!(metadata.attribution, "");
            assert!(metadata.is_placeholder);
        }
    }

    let by_score = services
        .pairs
        .list_pairs(&ListPairsQuery::new().sort(PairSort::Score))
        .await
        .unwrap();
    let ids: Vec<_> = by_score.iter().map(|p| p.pair.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(by_score[0].similarity_score, 100.0);
    assert_eq!(by_score[1].video_b_metadata.title, SENTINEL_TITLE);
}

#[tokio::test]
async fn test_get_unknown_pair() {
    let (_database, services) = create_test_services(ScriptedProvider::new(), false).await;

    let result = services.pairs.get_pair(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn test_list_sorting_and_search() {
    let provider = ScriptedProvider::new();
    provider.set_title("cat1", "Funny Cat compilation");
    provider.set_title("cat2", "Another cat video");
    provider.set_title("dog1", "Dog at the beach");
    let (_database, services) = create_test_services(provider.clone(), false).await;

    let cats = services
        .pairs
        .submit_pair("alice", VideoClip::new("cat1", 0, 15), VideoClip::new("cat2", 0, 15))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let mixed = services
        .pairs
        .submit_pair("bob", VideoClip::new("cat1", 0, 15), VideoClip::new("dog1", 0, 15))
        .await
        .unwrap();

    services.votes.cast_vote(cats, "v1", VoteChoice::Similar).await.unwrap();
    services.votes.cast_vote(mixed, "v1", VoteChoice::NotSimilar).await.unwrap();

    let newest: Vec<_> = services
        .pairs
        .list_pairs(&ListPairsQuery::new())
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.pair.id)
        .collect();
    assert_eq!(newest, vec![mixed, cats]);

    // Three distinct ids across two pairs
    assert_eq!(provider.calls(), 3);

    let by_score = services
        .pairs
        .list_pairs(&ListPairsQuery::new().sort(PairSort::Score))
        .await
        .unwrap();
    assert_eq!(by_score[0].pair.id, cats);
    assert_eq!(by_score[0].similarity_score, 100.0);
    assert_eq!(by_score[1].similarity_score, 0.0);

    let dogs = services
        .pairs
        .list_pairs(&ListPairsQuery::new().search("DOG"))
        .await
        .unwrap();
    assert_eq!(dogs.len(), 1);
    assert_eq!(dogs[0].pair.id, mixed);

    let by_label = services
        .pairs
        .list_pairs(&ListPairsQuery::new().search("alice"))
        .await
        .unwrap();
    assert_eq!(by_label.len(), 1);
    assert_eq!(by_label[0].pair.id, cats);

    let cat_pairs = services
        .pairs
        .list_pairs(&ListPairsQuery::new().search("cat"))
        .await
        .unwrap();
    assert_eq!(cat_pairs.len(), 2);
}
