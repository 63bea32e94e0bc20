//! JSON-file-backed catalog source.
//!
//! Reads a dataset directory of the form:
//!
//! - `movies.json`   — array of movie metadata records
//! - `users.json`    — array of per-user favorite/watch-later signals
//! - `progress.json` — array of partial-watch records (optional)
//!
//! Feedback events are appended to `feedback.json`, one JSON object per
//! line, and picked up by whatever process prepares the next training
//! snapshot.

use crate::error::{CatalogError, Result};
use crate::source::CatalogSource;
use crate::types::{
    FeedbackEvent, MovieMetadata, UserId, UserProfile, UserSignals, WatchProgress,
    MIN_WATCH_PROGRESS,
};
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Catalog backed by JSON files in a single directory.
///
/// All data is loaded into memory at open time, mirroring how the rest
/// of the system assumes the interaction set fits in memory.
pub struct JsonCatalog {
    dir: PathBuf,
    movies: Vec<MovieMetadata>,
    users: Vec<UserSignals>,
    progress: Vec<WatchProgress>,
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|source| CatalogError::Parse {
        file: path.display().to_string(),
        source,
    })
}

impl JsonCatalog {
    /// Open a dataset directory and load it into memory.
    ///
    /// `progress.json` is optional; the other two files must exist.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let movies: Vec<MovieMetadata> = read_json_array(&dir.join("movies.json"))?;
        let users: Vec<UserSignals> = read_json_array(&dir.join("users.json"))?;
        let progress_path = dir.join("progress.json");
        let progress: Vec<WatchProgress> = if progress_path.exists() {
            read_json_array(&progress_path)?
        } else {
            Vec::new()
        };

        for record in &progress {
            if !(0.0..=1.0).contains(&record.progress) {
                return Err(CatalogError::InvalidValue {
                    field: "progress".to_string(),
                    value: record.progress.to_string(),
                });
            }
        }

        info!(
            movies = movies.len(),
            users = users.len(),
            progress = progress.len(),
            "Loaded catalog from {}",
            dir.display()
        );

        Ok(Self {
            dir,
            movies,
            users,
            progress,
        })
    }
}

impl CatalogSource for JsonCatalog {
    fn user_signals(&self) -> Result<Vec<UserSignals>> {
        Ok(self.users.clone())
    }

    fn watch_progress(&self) -> Result<Vec<WatchProgress>> {
        Ok(self.progress.clone())
    }

    fn movies(&self) -> Result<Vec<MovieMetadata>> {
        Ok(self.movies.clone())
    }

    fn user_profile(&self, user_id: &UserId) -> Result<UserProfile> {
        let mut profile = match self.users.iter().find(|u| &u.user_id == user_id) {
            Some(signals) => UserProfile {
                user_id: signals.user_id.clone(),
                favorites: signals.favorites.clone(),
                watch_later: signals.watch_later.clone(),
                watched: Vec::new(),
            },
            None => UserProfile::empty(user_id.clone()),
        };

        profile.watched = self
            .progress
            .iter()
            .filter(|p| &p.user_id == user_id && p.progress > MIN_WATCH_PROGRESS)
            .map(|p| p.movie_id.clone())
            .collect();

        Ok(profile)
    }

    fn record_feedback(&self, event: &FeedbackEvent) -> Result<()> {
        let path = self.dir.join("feedback.json");
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let line = serde_json::to_string(event).map_err(|source| CatalogError::Parse {
            file: path.display().to_string(),
            source,
        })?;
        writeln!(file, "{line}")?;
        info!(
            user_id = %event.user_id,
            movie_id = %event.movie_id,
            score = event.score,
            "Recorded feedback event"
        );
        Ok(())
    }
}
