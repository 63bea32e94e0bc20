//! # Catalog Crate
//!
//! Data contract between the recommendation engine and its external
//! data store.
//!
//! ## Main Components
//!
//! - **types**: domain types (MovieMetadata, UserSignals, WatchProgress,
//!   UserProfile, FeedbackEvent)
//! - **source**: the [`CatalogSource`] trait the engine trains from and
//!   serves against
//! - **json**: [`JsonCatalog`], a file-backed source for the CLI and tests
//! - **error**: error types for catalog access
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogSource, JsonCatalog};
//!
//! let catalog = JsonCatalog::open("data/demo")?;
//! let movies = catalog.movies()?;
//! let profile = catalog.user_profile(&"u42".to_string())?;
//! println!("{} movies, {} favorites", movies.len(), profile.favorites.len());
//! ```

pub mod error;
pub mod json;
pub mod source;
pub mod types;

pub use error::{CatalogError, Result};
pub use json::JsonCatalog;
pub use source::CatalogSource;
pub use types::{
    FeedbackEvent, MovieId, MovieMetadata, UserId, UserProfile, UserSignals, WatchProgress,
    MIN_WATCH_PROGRESS,
};
