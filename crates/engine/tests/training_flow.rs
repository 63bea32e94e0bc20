//! End-to-end engine tests: aggregation through training to serving.

use catalog::{MovieMetadata, UserProfile, UserSignals, WatchProgress};
use engine::{aggregate_interactions, EngineError, NmfConfig, Reason, TrainedModel};

fn movie(id: &str, genres: &[&str], views: u64, likes: u64) -> MovieMetadata {
    MovieMetadata {
        movie_id: id.to_string(),
        title: format!("Movie {id}"),
        genres: genres.iter().map(|s| s.to_string()).collect(),
        rating: 7.5,
        views,
        likes,
        release_year: Some(2004),
    }
}

fn quick_config() -> NmfConfig {
    NmfConfig {
        latent_factors: 15,
        max_iterations: 150,
        ..NmfConfig::default()
    }
}

#[test]
fn full_scenario_two_users_two_movies() {
    // interactions: (u1, m1, favorite), (u1, m2, watch_later), (u2, m2, favorite)
    let signals = vec![
        UserSignals {
            user_id: "u1".to_string(),
            favorites: vec!["m1".to_string()],
            watch_later: vec!["m2".to_string()],
        },
        UserSignals {
            user_id: "u2".to_string(),
            favorites: vec!["m2".to_string()],
            watch_later: vec![],
        },
    ];
    let metadata = vec![
        movie("m1", &["Action"], 10, 2),
        movie("m2", &["Action", "Drama"], 20, 3),
    ];

    let interactions = aggregate_interactions(&signals, &[]);
    assert_eq!(interactions.len(), 3);

    let (model, metrics) =
        TrainedModel::train(&interactions, &metadata, &quick_config()).unwrap();
    assert_eq!(metrics.n_users, 2);
    assert_eq!(metrics.n_movies, 2);
    assert_eq!(metrics.n_interactions, 3);
    assert!(metrics.reconstruction_error >= 0.0);

    // similar(m1, 1) returns m2 with a score reflecting the 0.4-weighted
    // genre overlap (cos = 1/sqrt(2)) plus the 0.6-weighted latent term
    let related = model.similar("m1", &metadata, 1);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].movie_id, "m2");
    assert_eq!(related[0].reason, Reason::SimilarContent);
    let genre_part = 0.4 * (1.0 / 2.0_f64.sqrt());
    assert!(related[0].score >= genre_part - 1e-9);
    assert!(related[0].score <= 1.0 + 1e-9);
}

#[test]
fn empty_interaction_set_aborts_training() {
    let interactions = aggregate_interactions(&[], &[]);
    assert!(interactions.is_empty());

    let metadata = vec![movie("m1", &["Action"], 1, 1)];
    let result = TrainedModel::train(&interactions, &metadata, &quick_config());
    assert!(matches!(result, Err(EngineError::NoData)));
}

#[test]
fn progress_signals_feed_training() {
    let signals = vec![UserSignals {
        user_id: "u1".to_string(),
        favorites: vec!["m1".to_string()],
        watch_later: vec![],
    }];
    let progress = vec![
        WatchProgress {
            user_id: "u2".to_string(),
            movie_id: "m2".to_string(),
            progress: 0.9,
        },
        // Below threshold: contributes nothing
        WatchProgress {
            user_id: "u3".to_string(),
            movie_id: "m1".to_string(),
            progress: 0.05,
        },
    ];
    let metadata = vec![
        movie("m1", &["Action"], 10, 2),
        movie("m2", &["Drama"], 20, 3),
    ];

    let interactions = aggregate_interactions(&signals, &progress);
    let (_, metrics) = TrainedModel::train(&interactions, &metadata, &quick_config()).unwrap();
    assert_eq!(metrics.n_users, 2);
    assert_eq!(metrics.n_interactions, 2);
}

#[test]
fn snapshot_round_trip_preserves_served_outputs() {
    let signals = vec![
        UserSignals {
            user_id: "u1".to_string(),
            favorites: vec!["m1".to_string(), "m3".to_string()],
            watch_later: vec!["m2".to_string()],
        },
        UserSignals {
            user_id: "u2".to_string(),
            favorites: vec!["m2".to_string()],
            watch_later: vec!["m3".to_string()],
        },
    ];
    let metadata = vec![
        movie("m1", &["Action"], 100, 10),
        movie("m2", &["Action", "Drama"], 200, 20),
        movie("m3", &["Comedy"], 50, 5),
    ];
    let interactions = aggregate_interactions(&signals, &[]);
    let (model, _) = TrainedModel::train(&interactions, &metadata, &quick_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    model.save(&path).unwrap();
    let restored = TrainedModel::load(&path).unwrap();

    let profile = UserProfile {
        user_id: "u1".to_string(),
        favorites: vec!["m1".to_string()],
        watch_later: vec![],
        watched: vec![],
    };

    let before = model.recommend(&profile, &metadata, 5, true);
    let after = restored.recommend(&profile, &metadata, 5, true);
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.movie_id, b.movie_id);
        assert_eq!(a.score, b.score);
        assert_eq!(a.reason, b.reason);
    }

    let before = model.similar("m2", &metadata, 5);
    let after = restored.similar("m2", &metadata, 5);
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.movie_id, b.movie_id);
        assert_eq!(a.score, b.score);
    }
}
