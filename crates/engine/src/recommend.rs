//! Serving logic: personalized recommendations and item-to-item
//! similarity over a trained model.
//!
//! Strategy selection is explicit — known users score collaboratively,
//! unknown users go through cold start, unknown items fall back to pure
//! popularity — so each branch can be tested directly instead of
//! hiding behind ad hoc conditionals.

use crate::config::{
    CANDIDATE_OVERFETCH, COLD_START_FAVORITES, COLD_START_SIMILAR_PER_FAVORITE,
    COLLABORATIVE_BLEND, CONTENT_BLEND,
};
use crate::error::{EngineError, Result};
use crate::model::TrainedModel;
use crate::popularity::popularity_ranking;
use catalog::{MovieId, MovieMetadata, UserProfile};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Fixed per-strategy explanation tag attached to every result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "preference-based")]
    PreferenceBased,
    #[serde(rename = "similar to your favorites")]
    SimilarToFavorites,
    #[serde(rename = "trending")]
    Trending,
    #[serde(rename = "similar content and preferences")]
    SimilarContent,
    #[serde(rename = "popular movie")]
    Popular,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::PreferenceBased => "preference-based",
            Reason::SimilarToFavorites => "similar to your favorites",
            Reason::Trending => "trending",
            Reason::SimilarContent => "similar content and preferences",
            Reason::Popular => "popular movie",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked result. Scores are comparable within a single ranking
/// call only; larger is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub score: f64,
    pub reason: Reason,
}

/// How a recommendation request will be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendStrategy {
    /// User is in the trained index: score by latent factors
    Collaborative { user_index: usize },
    /// User unseen at training time: favorites-similarity + trending
    ColdStart,
}

impl RecommendStrategy {
    pub fn for_user(model: &TrainedModel, user_id: &str) -> Self {
        match model.users.index_of(user_id) {
            Some(user_index) => Self::Collaborative { user_index },
            None => Self::ColdStart,
        }
    }
}

fn cosine(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(&b) / (norm_a * norm_b)
}

fn sort_by_score_desc(results: &mut [Recommendation]) {
    // Stable sort; tie order beyond score is unspecified but
    // deterministic for a given input order
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

impl TrainedModel {
    /// Latent factor row for a trained user.
    ///
    /// The one lookup miss with no fallback: requesting the row of an
    /// unindexed user is a hard [`EngineError::UnknownUser`].
    pub fn user_factor_row(&self, user_id: &str) -> Result<ArrayView1<'_, f64>> {
        let index = self
            .users
            .index_of(user_id)
            .ok_or_else(|| EngineError::UnknownUser {
                user_id: user_id.to_string(),
            })?;
        Ok(self.user_factors.row(index))
    }

    /// Personalized recommendations for one user.
    ///
    /// Returns at most `limit` results; after consumed-item exclusion
    /// the list may be shorter (candidates are over-fetched but never
    /// backfilled).
    #[instrument(skip(self, profile, metadata), fields(user_id = %profile.user_id))]
    pub fn recommend(
        &self,
        profile: &UserProfile,
        metadata: &[MovieMetadata],
        limit: usize,
        exclude_consumed: bool,
    ) -> Vec<Recommendation> {
        let pool = limit * CANDIDATE_OVERFETCH;
        let strategy = RecommendStrategy::for_user(self, &profile.user_id);
        let mut candidates = match strategy {
            RecommendStrategy::Collaborative { user_index } => {
                debug!("Serving collaborative recommendations");
                self.collaborative_candidates(user_index, pool)
            }
            RecommendStrategy::ColdStart => {
                debug!("User unseen at training time; serving cold start");
                self.cold_start_candidates(profile, metadata, pool)
            }
        };

        if exclude_consumed {
            let consumed: HashSet<&str> = profile
                .favorites
                .iter()
                .chain(&profile.watch_later)
                .chain(&profile.watched)
                .map(String::as_str)
                .collect();
            candidates.retain(|r| !consumed.contains(r.movie_id.as_str()));
        }

        candidates.truncate(limit);
        candidates
    }

    /// Movies similar to `movie_id`, blending latent-space and genre
    /// similarity. An unknown movie degrades to the popularity ranking
    /// unchanged, so unseen items never produce an error.
    #[instrument(skip(self, metadata))]
    pub fn similar(
        &self,
        movie_id: &str,
        metadata: &[MovieMetadata],
        limit: usize,
    ) -> Vec<Recommendation> {
        match self.movies.index_of(movie_id) {
            Some(index) => self.similar_by_index(index, limit),
            None => {
                debug!("Movie not in training data; falling back to popularity");
                popularity_ranking(metadata, limit)
            }
        }
    }

    /// Predicted affinity of a trained user for every movie, ranked
    fn collaborative_candidates(&self, user_index: usize, n: usize) -> Vec<Recommendation> {
        let user_row = self.user_factors.row(user_index);
        let mut scored: Vec<Recommendation> = self
            .movies
            .ids()
            .iter()
            .enumerate()
            .map(|(item, id)| Recommendation {
                movie_id: id.clone(),
                score: user_row.dot(&self.item_factors.row(item)),
                reason: Reason::PreferenceBased,
            })
            .collect();
        sort_by_score_desc(&mut scored);
        scored.truncate(n);
        scored
    }

    /// Cold-start pool: similar-to-favorites seeds plus a trending
    /// tail, deduplicated by movie id keeping the first occurrence.
    fn cold_start_candidates(
        &self,
        profile: &UserProfile,
        metadata: &[MovieMetadata],
        n: usize,
    ) -> Vec<Recommendation> {
        let mut pool = Vec::new();

        for favorite in profile.favorites.iter().take(COLD_START_FAVORITES) {
            if let Some(index) = self.movies.index_of(favorite) {
                let mut similar = self.similar_by_index(index, COLD_START_SIMILAR_PER_FAVORITE);
                for rec in &mut similar {
                    rec.reason = Reason::SimilarToFavorites;
                }
                pool.extend(similar);
            }
        }

        let mut trending = popularity_ranking(metadata, n);
        for rec in &mut trending {
            rec.reason = Reason::Trending;
        }
        pool.extend(trending);

        let mut seen = HashSet::new();
        pool.retain(|r| seen.insert(r.movie_id.clone()));
        sort_by_score_desc(&mut pool);
        pool.truncate(n);
        pool
    }

    /// Hybrid similarity for a movie known to the model
    fn similar_by_index(&self, index: usize, limit: usize) -> Vec<Recommendation> {
        let query_row = self.item_factors.row(index);
        let content_row = self.content_similarity.row(index);

        let mut scored: Vec<Recommendation> = self
            .movies
            .ids()
            .iter()
            .enumerate()
            .filter(|&(item, _)| item != index)
            .map(|(item, id)| {
                let collaborative = cosine(query_row, self.item_factors.row(item));
                let score = COLLABORATIVE_BLEND * collaborative + CONTENT_BLEND * content_row[item];
                Recommendation {
                    movie_id: id.clone(),
                    score,
                    reason: Reason::SimilarContent,
                }
            })
            .collect();
        sort_by_score_desc(&mut scored);
        scored.truncate(limit);
        scored
    }
}
