//! Error taxonomy for the recommendation engine.
//!
//! Data-shape errors (`NoData`, `StructuralMismatch`) abort the
//! operation that raised them and leave any previously trained state
//! untouched. Lookup misses are mostly NOT errors: serving paths fall
//! back to cold-start or popularity ranking instead of propagating
//! them, so `UnknownUser` only appears where no fallback exists.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Training was attempted with zero interactions
    #[error("No interaction data found; add users and interactions first")]
    NoData,

    /// An indexed item has no metadata row, so similarity alignment
    /// would silently desync
    #[error("No metadata for indexed movie {movie_id}")]
    StructuralMismatch { movie_id: String },

    /// A serving operation ran before any model was trained or loaded
    #[error("Model not trained yet; trigger training first")]
    NotTrained,

    /// No persisted snapshot exists at the expected location.
    /// Recoverable: callers treat this as "start untrained".
    #[error("No model snapshot found at {path}")]
    SnapshotNotFound { path: String },

    /// A user factor row was requested for a user outside the index
    #[error("User {user_id} not present in the trained model")]
    UnknownUser { user_id: String },

    /// Failure in the external data collaborator
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    /// I/O failure while persisting or restoring a snapshot
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot blob could not be encoded or decoded
    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
