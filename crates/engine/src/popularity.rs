//! Popularity ranking from engagement statistics.
//!
//! Scores come from movie metadata, not from the trained matrices, so
//! the ranking stays valid for movies with no interaction history. Used
//! as the pure fallback for unknown items and as cold-start filler.

use crate::config::POPULARITY_DISPLAY_SCALE;
use crate::recommend::{Reason, Recommendation};
use catalog::MovieMetadata;

/// Raw engagement score: `likes * 2 + views`
fn raw_popularity(movie: &MovieMetadata) -> u64 {
    movie.likes * 2 + movie.views
}

/// Top-n movies by engagement, scores divided by the fixed display
/// scale. Deterministic for a given metadata set; ties keep the stable
/// order of the input.
pub fn popularity_ranking(metadata: &[MovieMetadata], limit: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<(&MovieMetadata, u64)> =
        metadata.iter().map(|m| (m, raw_popularity(m))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|(movie, raw)| Recommendation {
            movie_id: movie.movie_id.clone(),
            score: raw as f64 / POPULARITY_DISPLAY_SCALE,
            reason: Reason::Popular,
        })
        .collect()
}
