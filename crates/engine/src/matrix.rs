//! Index maps and the dense interaction matrix.
//!
//! Every training run builds fresh user and movie [`IndexMap`]s from
//! the identifiers observed in that run's interaction set, then lays
//! out a dense users x movies weight matrix over them. The maps are
//! bijective and immutable after construction; they are only valid for
//! the model instance that built them and are never reused across runs.

use crate::aggregate::Interaction;
use crate::error::{EngineError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Bijection between opaque string identifiers and dense zero-based
/// indices, in first-seen order.
///
/// First-seen order is deterministic for a deterministic input
/// iteration but carries no ranking meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMap {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl IndexMap {
    /// Build from an iterator of identifiers, keeping the first
    /// occurrence of each
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = Self {
            ids: Vec::new(),
            positions: HashMap::new(),
        };
        for id in ids {
            if !map.positions.contains_key(id) {
                map.positions.insert(id.to_string(), map.ids.len());
                map.ids.push(id.to_string());
            }
        }
        map
    }

    /// Dense index for an identifier, if it was observed at build time
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Identifier at a dense index
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in index order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// Dense user x movie interaction matrix plus the index maps it was
/// laid out against. Read-only after construction.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    pub values: Array2<f64>,
    pub users: IndexMap,
    pub movies: IndexMap,
}

impl InteractionMatrix {
    /// Lay out the dense matrix from a deduplicated interaction set.
    ///
    /// Fails with [`EngineError::NoData`] on an empty set so training
    /// aborts without producing a partial model. If a (user, movie)
    /// pair recurs despite upstream dedup, the last write wins.
    pub fn build(interactions: &[Interaction]) -> Result<Self> {
        if interactions.is_empty() {
            return Err(EngineError::NoData);
        }

        let users = IndexMap::from_ids(interactions.iter().map(|i| i.user_id.as_str()));
        let movies = IndexMap::from_ids(interactions.iter().map(|i| i.movie_id.as_str()));

        let mut values = Array2::<f64>::zeros((users.len(), movies.len()));
        for interaction in interactions {
            // Indices are guaranteed present: the maps were built from
            // this same interaction set
            let row = users.index_of(&interaction.user_id).ok_or_else(|| {
                EngineError::UnknownUser {
                    user_id: interaction.user_id.clone(),
                }
            })?;
            let col = movies.index_of(&interaction.movie_id).ok_or_else(|| {
                EngineError::StructuralMismatch {
                    movie_id: interaction.movie_id.clone(),
                }
            })?;
            values[[row, col]] = interaction.weight;
        }

        let matrix = Self {
            values,
            users,
            movies,
        };
        debug!(
            users = matrix.users.len(),
            movies = matrix.movies.len(),
            sparsity = matrix.sparsity(),
            "Built interaction matrix"
        );
        Ok(matrix)
    }

    /// Fraction of zero cells, as a training diagnostic
    pub fn sparsity(&self) -> f64 {
        let total = self.values.len();
        if total == 0 {
            return 0.0;
        }
        let zeros = self.values.iter().filter(|&&v| v == 0.0).count();
        zeros as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::InteractionKind;

    fn interaction(user: &str, movie: &str, weight: f64) -> Interaction {
        Interaction {
            user_id: user.to_string(),
            movie_id: movie.to_string(),
            weight,
            kind: InteractionKind::Favorite,
        }
    }

    #[test]
    fn test_index_map_first_seen_order() {
        let map = IndexMap::from_ids(["b", "a", "b", "c"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.index_of("b"), Some(0));
        assert_eq!(map.index_of("a"), Some(1));
        assert_eq!(map.index_of("c"), Some(2));
        assert_eq!(map.id_at(1), Some("a"));
        assert_eq!(map.index_of("missing"), None);
    }

    #[test]
    fn test_index_map_is_bijective() {
        let map = IndexMap::from_ids(["x", "y", "z"]);
        for i in 0..map.len() {
            let id = map.id_at(i).unwrap();
            assert_eq!(map.index_of(id), Some(i));
        }
    }

    #[test]
    fn test_build_rejects_empty_set() {
        let result = InteractionMatrix::build(&[]);
        assert!(matches!(result, Err(EngineError::NoData)));
    }

    #[test]
    fn test_build_places_weights() {
        let matrix = InteractionMatrix::build(&[
            interaction("u1", "m1", 5.0),
            interaction("u1", "m2", 2.0),
            interaction("u2", "m2", 5.0),
        ])
        .unwrap();

        assert_eq!(matrix.values.dim(), (2, 2));
        assert_eq!(matrix.values[[0, 0]], 5.0);
        assert_eq!(matrix.values[[0, 1]], 2.0);
        assert_eq!(matrix.values[[1, 0]], 0.0);
        assert_eq!(matrix.values[[1, 1]], 5.0);
    }

    #[test]
    fn test_duplicate_pair_last_write_wins() {
        let matrix = InteractionMatrix::build(&[
            interaction("u1", "m1", 5.0),
            interaction("u1", "m1", 2.0),
        ])
        .unwrap();
        assert_eq!(matrix.values[[0, 0]], 2.0);
    }

    #[test]
    fn test_sparsity() {
        let matrix = InteractionMatrix::build(&[
            interaction("u1", "m1", 5.0),
            interaction("u2", "m2", 5.0),
        ])
        .unwrap();
        // 2 of 4 cells are zero
        assert!((matrix.sparsity() - 0.5).abs() < 1e-12);
    }
}
