//! # Recommendation Service
//!
//! Coordinates the full engine lifecycle:
//! 1. Load a snapshot at startup, if one exists
//! 2. On `train()`: pull signals and metadata from the catalog, run the
//!    batch training pass on a blocking task, persist the snapshot,
//!    then swap the live model reference
//! 3. Serve `recommend`/`similar` queries from the current model
//! 4. Forward feedback events to the catalog for a future retrain
//!
//! The live model lives behind `RwLock<Option<Arc<TrainedModel>>>`.
//! Readers clone the `Arc` at request start, so a retrain can never
//! expose mismatched factor matrices and index maps: requests in
//! flight keep the old state, new requests see the new one.

use anyhow::{Context, Result};
use catalog::{CatalogSource, FeedbackEvent, UserId};
use engine::{
    aggregate_interactions, EngineError, NmfConfig, Recommendation, TrainMetrics, TrainedModel,
};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{info, warn};

/// The single logical model instance behind the serving façade
pub struct RecommendService {
    catalog: Arc<dyn CatalogSource>,
    config: NmfConfig,
    snapshot_path: PathBuf,
    model: RwLock<Option<Arc<TrainedModel>>>,
}

impl RecommendService {
    /// Create an untrained service.
    ///
    /// Call [`RecommendService::load_snapshot`] afterwards to restore a
    /// previously trained model.
    pub fn new(catalog: Arc<dyn CatalogSource>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            config: NmfConfig::default(),
            snapshot_path: snapshot_path.into(),
            model: RwLock::new(None),
        }
    }

    /// Override the factorization configuration (defaults mirror
    /// production settings)
    pub fn with_config(mut self, config: NmfConfig) -> Self {
        self.config = config;
        self
    }

    /// Restore the persisted snapshot into the live slot.
    ///
    /// A missing snapshot ([`EngineError::SnapshotNotFound`]) is the
    /// normal cold-start condition; callers log it and continue
    /// untrained.
    pub fn load_snapshot(&self) -> engine::Result<()> {
        let model = TrainedModel::load(&self.snapshot_path)?;
        self.install(Arc::new(model));
        Ok(())
    }

    /// Convenience startup path: try the snapshot, degrade to
    /// untrained when there is none
    pub fn load_snapshot_or_cold_start(&self) {
        match self.load_snapshot() {
            Ok(()) => info!("Restored model snapshot"),
            Err(EngineError::SnapshotNotFound { path }) => {
                info!("No snapshot at {path}; starting untrained");
            }
            Err(err) => {
                warn!("Snapshot restore failed, starting untrained: {err}");
            }
        }
    }

    pub fn is_trained(&self) -> bool {
        self.current().is_some()
    }

    /// Full batch retrain from the catalog's current interaction set.
    ///
    /// Runs on a blocking task; the previous model keeps serving until
    /// the new one is complete and persisted, then the reference is
    /// swapped in one write. On any failure the prior state is left
    /// untouched and servable.
    pub async fn train(&self) -> Result<TrainMetrics> {
        let started = Instant::now();
        let catalog = Arc::clone(&self.catalog);
        let config = self.config.clone();
        let snapshot_path = self.snapshot_path.clone();

        let (model, metrics) = tokio::task::spawn_blocking(move || {
            let signals = catalog.user_signals()?;
            let progress = catalog.watch_progress()?;
            let metadata = catalog.movies()?;

            let interactions = aggregate_interactions(&signals, &progress);
            let (model, metrics) = TrainedModel::train(&interactions, &metadata, &config)?;
            model.save(&snapshot_path)?;
            Ok::<_, EngineError>((model, metrics))
        })
        .await
        .context("Training task panicked")??;

        self.install(Arc::new(model));
        info!(
            rmse = metrics.reconstruction_error,
            users = metrics.n_users,
            movies = metrics.n_movies,
            "Retrained model in {:.2?}",
            started.elapsed()
        );
        Ok(metrics)
    }

    /// Personalized recommendations for a user.
    ///
    /// Fails with [`EngineError::NotTrained`] (inside the `anyhow`
    /// chain, downcastable by the façade) when no model is live.
    pub async fn recommend(
        &self,
        user_id: &UserId,
        limit: usize,
        exclude_consumed: bool,
    ) -> Result<Vec<Recommendation>> {
        let model = self.current().ok_or(EngineError::NotTrained)?;
        let profile = self
            .catalog
            .user_profile(user_id)
            .context("Failed to fetch user profile")?;
        let metadata = self
            .catalog
            .movies()
            .context("Failed to fetch movie metadata")?;
        Ok(model.recommend(&profile, &metadata, limit, exclude_consumed))
    }

    /// Movies similar to the given one (popularity fallback for
    /// movies the model has never seen)
    pub async fn similar(&self, movie_id: &str, limit: usize) -> Result<Vec<Recommendation>> {
        let model = self.current().ok_or(EngineError::NotTrained)?;
        let metadata = self
            .catalog
            .movies()
            .context("Failed to fetch movie metadata")?;
        Ok(model.similar(movie_id, &metadata, limit))
    }

    /// Persist a feedback event for the next retrain; the live model
    /// is not touched
    pub fn record_feedback(&self, user_id: &str, movie_id: &str, score: f64) -> Result<()> {
        let event = FeedbackEvent {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
            score,
        };
        self.catalog
            .record_feedback(&event)
            .context("Failed to record feedback")?;
        Ok(())
    }

    fn current(&self) -> Option<Arc<TrainedModel>> {
        self.model
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn install(&self, model: Arc<TrainedModel>) {
        *self
            .model
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(model);
    }
}
