//! End-to-end session flows over the mock collaborators: pool bootstrap,
//! rounds, scoring, and the lifetime-stats merge. No network, no filesystem.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use panoguess_common::{GeoPoint, LifetimeStats};
use panoguess_engine::testing::{loc, region, MockLookup, MockStatsStore, MockViewer, LONDON, PARIS};
use panoguess_engine::{
    build_pool, EngineConfig, GameEngine, LocationPool, RoundStart, StatsStore,
};

fn test_config(min_pool_size: usize) -> EngineConfig {
    EngineConfig {
        min_pool_size,
        asset_timeout: Duration::from_millis(50),
        ..EngineConfig::default()
    }
}

#[tokio::test]
async fn two_round_session_persists_lifetime_stats() {
    // Region bootstrap with one failing region mixed in.
    let lookup = MockLookup::new()
        .on_region("France", vec![loc("paris", PARIS.0, PARIS.1, "France")])
        .on_region("Japan", vec![loc("tokyo", 35.6762, 139.6503, "Japan")])
        .failing_region("Atlantis");
    let regions = vec![region("France"), region("Atlantis"), region("Japan")];

    let mut rng = StdRng::seed_from_u64(11);
    let pool = build_pool(&lookup, &regions, 100, 2, &mut rng)
        .await
        .expect("two good regions should satisfy the minimum");
    assert_eq!(pool.len(), 2);

    let viewer = Arc::new(MockViewer::new().ready("paris").ready("tokyo"));
    let mut engine =
        GameEngine::with_rng(pool, viewer.clone(), test_config(2), StdRng::seed_from_u64(11))
            .unwrap();

    // Round 1: guess London against whichever target came up.
    engine.start_round().await.unwrap();
    let first_target = engine.current_round().unwrap().target.clone();
    let first = engine
        .submit_guess(GeoPoint { lat: LONDON.0, lng: LONDON.1 })
        .unwrap();
    if first_target.id == "paris" {
        assert!((first.distance_km - 343.6).abs() < 1.0);
        assert_eq!(first.score, 4656);
    }

    // Round 2: guess the antipode-ish, scoring zero.
    engine.start_round().await.unwrap();
    let second = engine
        .submit_guess(GeoPoint { lat: -40.0, lng: -170.0 })
        .unwrap();
    assert_eq!(second.score, 0);

    let expected_total = first.score;
    assert_eq!(second.session_total, expected_total);
    assert_eq!(engine.rounds_played(), 2);

    // Session end: merge into lifetime stats through the store.
    let summary = engine.end_session();
    assert_eq!(summary.rounds_played, 2);
    assert_eq!(summary.cumulative_score, expected_total);
    assert!(summary.should_persist);

    let store = MockStatsStore::new(LifetimeStats { games_played: 1, total_score: 1000 });
    let mut stats = store.read().await.unwrap();
    assert!(summary.apply_to(&mut stats));
    store.write(&stats).await.unwrap();

    assert_eq!(
        store.writes(),
        vec![LifetimeStats { games_played: 2, total_score: 1000 + expected_total }]
    );

    // Exactly one load per played round.
    assert_eq!(viewer.load_attempts().len(), 2);
}

#[tokio::test]
async fn tiny_pool_either_candidate_may_start() {
    // Pool = [A(0,0), B(10,10)], no previous target: both qualify at 50 km.
    let viewer = Arc::new(MockViewer::new().ready("A").ready("B"));
    let pool = LocationPool::dedupe(vec![loc("A", 0.0, 0.0, "X"), loc("B", 10.0, 10.0, "Y")]);
    let mut engine =
        GameEngine::with_rng(pool, viewer, test_config(2), StdRng::seed_from_u64(5)).unwrap();

    match engine.start_round().await.unwrap() {
        RoundStart::Started { index, .. } => assert_eq!(index, 1),
        other => panic!("expected a round, got {other:?}"),
    }
    let target = engine.current_round().unwrap().target.clone();
    assert!(target.id == "A" || target.id == "B");

    // Perfect guess against B scores the maximum.
    if target.id == "B" {
        let result = engine.submit_guess(GeoPoint { lat: 10.0, lng: 10.0 }).unwrap();
        assert!(result.distance_km < 1e-6);
        assert_eq!(result.score, 5000);
    }
}

#[tokio::test]
async fn zero_score_session_leaves_stats_unchanged() {
    let viewer = Arc::new(MockViewer::new().ready("a"));
    let pool = LocationPool::dedupe(vec![loc("a", 0.0, 0.0, "X")]);
    let mut engine =
        GameEngine::with_rng(pool, viewer, test_config(1), StdRng::seed_from_u64(1)).unwrap();

    engine.start_round().await.unwrap();
    // Guess the far side of the planet — well past the 5000 km cutoff.
    let result = engine.submit_guess(GeoPoint { lat: 0.0, lng: 180.0 }).unwrap();
    assert_eq!(result.score, 0);

    let summary = engine.end_session();
    assert!(!summary.should_persist);

    let initial = LifetimeStats { games_played: 7, total_score: 31_415 };
    let store = MockStatsStore::new(initial);
    let mut stats = store.read().await.unwrap();
    if summary.apply_to(&mut stats) {
        store.write(&stats).await.unwrap();
    }
    assert!(store.writes().is_empty());
    assert_eq!(store.read().await.unwrap(), initial);
}

#[tokio::test]
async fn session_ends_when_every_candidate_is_unreachable() {
    let viewer = Arc::new(MockViewer::new().failing("a").hanging("b"));
    let pool = LocationPool::dedupe(vec![loc("a", 0.0, 0.0, "X"), loc("b", 30.0, 30.0, "Y")]);
    let mut engine =
        GameEngine::with_rng(pool, viewer.clone(), test_config(2), StdRng::seed_from_u64(2))
            .unwrap();

    let outcome = engine.start_round().await.unwrap();
    assert_eq!(outcome, RoundStart::PoolExhausted { final_score: 0 });
    assert_eq!(engine.remaining_candidates(), 0);
    // Both candidates were attempted before giving up.
    assert_eq!(viewer.load_attempts().len(), 2);
}
