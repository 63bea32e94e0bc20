//! Core domain types shared between the catalog and the engine.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a user, as issued by the upstream data store
pub type UserId = String;

/// Opaque identifier for a movie
pub type MovieId = String;

/// Minimum fractional watch progress for a view to count as engagement.
///
/// Progress at or below this value is treated as an accidental click:
/// it produces no interaction during training and does not mark the
/// movie as watched in a user profile.
pub const MIN_WATCH_PROGRESS: f64 = 0.1;

/// Metadata for a single movie in the catalog.
///
/// Sourced independently of interaction history; joined to the trained
/// model's item index by `movie_id` at similarity-build and
/// popularity-ranking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub movie_id: MovieId,
    pub title: String,
    /// Genre tags, e.g. `["Action", "Drama"]`. May be empty.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Average editorial/user rating, 0.0 when unrated
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub release_year: Option<u16>,
}

/// Raw per-user signals as stored upstream: explicit lists of favorite
/// and watch-later movies. Watch progress lives in separate records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSignals {
    pub user_id: UserId,
    #[serde(default)]
    pub favorites: Vec<MovieId>,
    #[serde(default)]
    pub watch_later: Vec<MovieId>,
}

/// A partial-watch record: how far a user got through a movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchProgress {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Fraction watched in [0, 1]
    pub progress: f64,
}

/// A user's consumption profile, as seen at request time.
///
/// `watched` contains movies whose progress exceeded
/// [`MIN_WATCH_PROGRESS`]. A lookup for an unknown user yields an empty
/// profile rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub favorites: Vec<MovieId>,
    pub watch_later: Vec<MovieId>,
    pub watched: Vec<MovieId>,
}

impl UserProfile {
    /// Empty profile for a user with no recorded signals
    pub fn empty(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }
}

/// A feedback event recorded for a future retrain.
///
/// Events are persisted by the catalog and folded into the interaction
/// set the next time training runs; the live model never consumes them
/// synchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f64,
}
