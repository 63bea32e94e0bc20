//! Interaction aggregation.
//!
//! Turns raw per-user signals (favorites, watch-later lists, partial
//! watch progress) into a deduplicated, weighted interaction set — the
//! input to every training run.
//!
//! Dedup policy: at most one interaction per (user, movie) pair, with
//! favorite > watch_later > viewed. A lower-priority signal for an
//! already-counted pair is dropped, never summed.

use crate::config::{FAVORITE_WEIGHT, VIEWED_WEIGHT_CAP, WATCH_LATER_WEIGHT};
use catalog::{MovieId, UserId, UserSignals, WatchProgress, MIN_WATCH_PROGRESS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Which signal produced an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Favorite,
    WatchLater,
    Viewed,
}

/// One weighted (user, movie) interaction.
///
/// Immutable once constructed; lives for a single training pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Non-negative aggregated weight
    pub weight: f64,
    pub kind: InteractionKind,
}

/// Aggregate raw signals into the deduplicated interaction set.
///
/// An empty result is not an error here — the trainer decides whether
/// to abort on it.
pub fn aggregate_interactions(
    signals: &[UserSignals],
    progress: &[WatchProgress],
) -> Vec<Interaction> {
    let mut interactions = Vec::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for user in signals {
        for movie_id in &user.favorites {
            if seen.insert((user.user_id.as_str(), movie_id.as_str())) {
                interactions.push(Interaction {
                    user_id: user.user_id.clone(),
                    movie_id: movie_id.clone(),
                    weight: FAVORITE_WEIGHT,
                    kind: InteractionKind::Favorite,
                });
            }
        }
        for movie_id in &user.watch_later {
            if seen.insert((user.user_id.as_str(), movie_id.as_str())) {
                interactions.push(Interaction {
                    user_id: user.user_id.clone(),
                    movie_id: movie_id.clone(),
                    weight: WATCH_LATER_WEIGHT,
                    kind: InteractionKind::WatchLater,
                });
            }
        }
    }

    let mut skipped_below_threshold = 0usize;
    for record in progress {
        if record.progress <= MIN_WATCH_PROGRESS {
            skipped_below_threshold += 1;
            continue;
        }
        if seen.insert((record.user_id.as_str(), record.movie_id.as_str())) {
            interactions.push(Interaction {
                user_id: record.user_id.clone(),
                movie_id: record.movie_id.clone(),
                weight: f64::min(VIEWED_WEIGHT_CAP, record.progress * VIEWED_WEIGHT_CAP),
                kind: InteractionKind::Viewed,
            });
        }
    }

    debug!(
        skipped_below_threshold,
        "Aggregated {} interactions from {} users and {} progress records",
        interactions.len(),
        signals.len(),
        progress.len()
    );
    if interactions.is_empty() {
        info!("No interactions after aggregation; training would have nothing to fit");
    }

    interactions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(user: &str, favorites: &[&str], watch_later: &[&str]) -> UserSignals {
        UserSignals {
            user_id: user.to_string(),
            favorites: favorites.iter().map(|s| s.to_string()).collect(),
            watch_later: watch_later.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn progress(user: &str, movie: &str, progress: f64) -> WatchProgress {
        WatchProgress {
            user_id: user.to_string(),
            movie_id: movie.to_string(),
            progress,
        }
    }

    #[test]
    fn test_favorite_weight() {
        let result = aggregate_interactions(&[signals("u1", &["m1"], &[])], &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].weight, 5.0);
        assert_eq!(result[0].kind, InteractionKind::Favorite);
    }

    #[test]
    fn test_favorite_dominates_watch_later() {
        // Same movie in both lists: exactly one record, as favorite
        let result = aggregate_interactions(&[signals("u1", &["m1"], &["m1"])], &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].weight, 5.0);
        assert_eq!(result[0].kind, InteractionKind::Favorite);
    }

    #[test]
    fn test_watch_later_weight() {
        let result = aggregate_interactions(&[signals("u1", &[], &["m2"])], &[]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].weight, 2.0);
        assert_eq!(result[0].kind, InteractionKind::WatchLater);
    }

    #[test]
    fn test_progress_below_threshold_is_dropped() {
        let result = aggregate_interactions(&[], &[progress("u1", "m1", 0.05)]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_progress_weight_is_capped() {
        let result = aggregate_interactions(
            &[],
            &[progress("u1", "m1", 0.5), progress("u1", "m2", 1.0)],
        );
        assert_eq!(result.len(), 2);
        assert!((result[0].weight - 1.5).abs() < 1e-12);
        assert!((result[1].weight - 3.0).abs() < 1e-12);
        assert_eq!(result[0].kind, InteractionKind::Viewed);
    }

    #[test]
    fn test_viewed_does_not_override_favorite() {
        let result = aggregate_interactions(
            &[signals("u1", &["m1"], &[])],
            &[progress("u1", "m1", 0.9)],
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, InteractionKind::Favorite);
    }

    #[test]
    fn test_same_movie_different_users() {
        let result = aggregate_interactions(
            &[signals("u1", &["m1"], &[]), signals("u2", &["m1"], &[])],
            &[],
        );
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_empty_inputs_yield_empty_set() {
        assert!(aggregate_interactions(&[], &[]).is_empty());
    }
}
