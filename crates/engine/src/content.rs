//! Genre-based content similarity.
//!
//! Each indexed movie's genre tags become a sparse categorical vector
//! over the genre universe observed in the current run; the output is
//! a dense, symmetric movies x movies cosine-similarity matrix aligned
//! to the model's movie index (row i corresponds to index i).
//!
//! Convention for movies with no genres: cosine on a zero vector is
//! undefined, so every similarity involving such a movie is 0 —
//! including its self-similarity.

use crate::error::{EngineError, Result};
use crate::matrix::IndexMap;
use catalog::MovieMetadata;
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Build the movies x movies genre-similarity matrix.
///
/// Fails with [`EngineError::StructuralMismatch`] if any movie in the
/// index has no metadata row: a silent gap would desync every score to
/// the right of it.
pub fn build_content_similarity(
    movies: &IndexMap,
    metadata: &[MovieMetadata],
) -> Result<Array2<f64>> {
    let by_id: HashMap<&str, &MovieMetadata> = metadata
        .iter()
        .map(|m| (m.movie_id.as_str(), m))
        .collect();

    // Metadata rows aligned to the movie index, all-or-nothing
    let mut aligned = Vec::with_capacity(movies.len());
    for id in movies.ids() {
        let row = by_id
            .get(id.as_str())
            .ok_or_else(|| EngineError::StructuralMismatch {
                movie_id: id.clone(),
            })?;
        aligned.push(*row);
    }

    // Genre token universe for this run, in first-seen order
    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    for movie in &aligned {
        for genre in &movie.genres {
            let next = vocabulary.len();
            vocabulary.entry(genre.as_str()).or_insert(next);
        }
    }

    let n = movies.len();
    let mut features = Array2::<f64>::zeros((n, vocabulary.len()));
    for (row, movie) in aligned.iter().enumerate() {
        for genre in &movie.genres {
            let col = vocabulary[genre.as_str()];
            features[[row, col]] += 1.0;
        }
    }

    let norms: Vec<f64> = features
        .axis_iter(Axis(0))
        .map(|row| row.dot(&row).sqrt())
        .collect();

    let mut similarity = Array2::<f64>::zeros((n, n));
    similarity
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut out_row)| {
            if norms[i] == 0.0 {
                return;
            }
            let row_i = features.row(i);
            for j in 0..n {
                if norms[j] == 0.0 {
                    continue;
                }
                out_row[j] = row_i.dot(&features.row(j)) / (norms[i] * norms[j]);
            }
        });

    debug!(
        movies = n,
        genres = vocabulary.len(),
        "Built content similarity matrix"
    );
    Ok(similarity)
}
