//! # Engine Crate
//!
//! The hybrid recommendation engine: collaborative filtering via
//! non-negative matrix factorization, genre-based content similarity,
//! and popularity ranking as the universal fallback.
//!
//! ## Main Components
//!
//! - **aggregate**: weighted, deduplicated interactions from raw signals
//! - **matrix**: id index maps and the dense interaction matrix
//! - **nmf**: seeded multiplicative-update factorization and RMSE
//! - **content**: genre cosine-similarity matrix
//! - **popularity**: engagement-based fallback ranking
//! - **model**: the atomic [`TrainedModel`] state and its snapshot
//! - **recommend**: serving paths (collaborative, cold start, item similarity)
//! - **error**: the engine error taxonomy
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{aggregate_interactions, NmfConfig, TrainedModel};
//!
//! let interactions = aggregate_interactions(&signals, &progress);
//! let (model, metrics) = TrainedModel::train(&interactions, &movies, &NmfConfig::default())?;
//! println!("trained, rmse = {:.4}", metrics.reconstruction_error);
//!
//! let recs = model.recommend(&profile, &movies, 10, true);
//! let related = model.similar("m42", &movies, 10);
//! ```

pub mod aggregate;
pub mod config;
pub mod content;
pub mod error;
pub mod matrix;
pub mod model;
pub mod nmf;
pub mod popularity;
pub mod recommend;

pub use aggregate::{aggregate_interactions, Interaction, InteractionKind};
pub use content::build_content_similarity;
pub use error::{EngineError, Result};
pub use matrix::{IndexMap, InteractionMatrix};
pub use model::{TrainMetrics, TrainedModel};
pub use nmf::{factorize, reconstruction_rmse, NmfConfig, NmfFactors};
pub use popularity::popularity_ranking;
pub use recommend::{Reason, Recommendation, RecommendStrategy};
