//! The trained model state and its snapshot.
//!
//! [`TrainedModel`] is one atomic unit: factors, index maps, content
//! similarity, and the source matrix are mutually consistent with the
//! same training run and are only ever replaced together. Movie
//! metadata is deliberately NOT part of the snapshot — it drifts
//! independently of the trained factors and is re-fetched from the
//! catalog after a load.

use crate::aggregate::Interaction;
use crate::content::build_content_similarity;
use crate::error::{EngineError, Result};
use crate::matrix::{IndexMap, InteractionMatrix};
use crate::nmf::{factorize, reconstruction_rmse, NmfConfig, NmfFactors};
use catalog::MovieMetadata;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Metrics reported by a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainMetrics {
    /// RMSE of the factor product against the full interaction matrix
    pub reconstruction_error: f64,
    pub n_users: usize,
    pub n_movies: usize,
    pub n_interactions: usize,
    /// Fraction of zero cells in the interaction matrix
    pub sparsity: f64,
}

/// Full trained state of the recommender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    /// users x k, entrywise non-negative
    pub user_factors: Array2<f64>,
    /// movies x k, entrywise non-negative
    pub item_factors: Array2<f64>,
    pub users: IndexMap,
    pub movies: IndexMap,
    /// movies x movies genre cosine similarity
    pub content_similarity: Array2<f64>,
    /// The source users x movies weight matrix
    pub interactions: Array2<f64>,
    /// Latent dimension k
    pub latent_factors: usize,
}

impl TrainedModel {
    /// Run a full batch training pass.
    ///
    /// Fails with [`EngineError::NoData`] on an empty interaction set
    /// and with [`EngineError::StructuralMismatch`] on a metadata gap;
    /// in both cases no partial model escapes.
    pub fn train(
        interactions: &[Interaction],
        metadata: &[MovieMetadata],
        config: &NmfConfig,
    ) -> Result<(Self, TrainMetrics)> {
        let matrix = InteractionMatrix::build(interactions)?;
        let sparsity = matrix.sparsity();

        info!(
            users = matrix.users.len(),
            movies = matrix.movies.len(),
            interactions = interactions.len(),
            "Training collaborative filtering model"
        );
        let factors = factorize(&matrix.values, config);
        let content_similarity = build_content_similarity(&matrix.movies, metadata)?;
        let reconstruction_error = reconstruction_rmse(&matrix.values, &factors);

        let metrics = TrainMetrics {
            reconstruction_error,
            n_users: matrix.users.len(),
            n_movies: matrix.movies.len(),
            n_interactions: interactions.len(),
            sparsity,
        };
        info!(
            rmse = metrics.reconstruction_error,
            sparsity = metrics.sparsity,
            "Training complete"
        );

        let NmfFactors {
            user_factors,
            item_factors,
        } = factors;
        let model = Self {
            user_factors,
            item_factors,
            users: matrix.users,
            movies: matrix.movies,
            content_similarity,
            interactions: matrix.values,
            latent_factors: config.latent_factors,
        };
        Ok((model, metrics))
    }

    /// Serialize the full state as one blob.
    ///
    /// JSON floats round-trip exactly, so a saved and reloaded model
    /// serves identical scores.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        info!("Model snapshot saved to {}", path.display());
        Ok(())
    }

    /// Restore a snapshot.
    ///
    /// [`EngineError::SnapshotNotFound`] when nothing exists at `path`;
    /// callers treat that as "start untrained". The caller re-fetches
    /// current movie metadata from the catalog afterwards.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EngineError::SnapshotNotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        info!("Model snapshot loaded from {}", path.display());
        Ok(model)
    }
}
