//! The contract between the engine and its data collaborator.

use crate::error::Result;
use crate::types::{FeedbackEvent, MovieMetadata, UserId, UserProfile, UserSignals, WatchProgress};

/// Abstract source of catalog data.
///
/// The engine trains from and serves against whatever store implements
/// this trait; the crate ships a JSON-file implementation
/// ([`crate::JsonCatalog`]) used by the CLI and tests.
///
/// `Send + Sync` so a single source can back concurrent read requests.
pub trait CatalogSource: Send + Sync {
    /// Full current set of per-user favorite/watch-later signals
    fn user_signals(&self) -> Result<Vec<UserSignals>>;

    /// Full current set of partial-watch records
    fn watch_progress(&self) -> Result<Vec<WatchProgress>>;

    /// Full current movie metadata
    fn movies(&self) -> Result<Vec<MovieMetadata>>;

    /// Consumption profile for one user.
    ///
    /// Unknown users yield an empty profile, not an error.
    fn user_profile(&self, user_id: &UserId) -> Result<UserProfile>;

    /// Persist a feedback event for a future retrain
    fn record_feedback(&self, event: &FeedbackEvent) -> Result<()>;
}
