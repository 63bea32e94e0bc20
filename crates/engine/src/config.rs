//! Ranking and aggregation constants.
//!
//! These values are part of the serving contract: existing consumers
//! depend on the exact ranking behavior they produce, so they are named
//! here rather than re-derived. Changing any of them silently changes
//! served scores.

/// Interaction weight for an explicit favorite
pub const FAVORITE_WEIGHT: f64 = 5.0;

/// Interaction weight for a watch-later entry that is not also a favorite
pub const WATCH_LATER_WEIGHT: f64 = 2.0;

/// Cap on the progress-derived weight of a viewed interaction
/// (`min(VIEWED_WEIGHT_CAP, progress * VIEWED_WEIGHT_CAP)`)
pub const VIEWED_WEIGHT_CAP: f64 = 3.0;

/// Weight of latent-space similarity in the hybrid item-to-item blend
pub const COLLABORATIVE_BLEND: f64 = 0.6;

/// Weight of genre similarity in the hybrid item-to-item blend
pub const CONTENT_BLEND: f64 = 0.4;

/// Display divisor applied to raw popularity (`likes * 2 + views`).
/// A fixed scaling constant, not a probability.
pub const POPULARITY_DISPLAY_SCALE: f64 = 100.0;

/// Collaborative candidates are over-fetched by this factor so that
/// consumed-item exclusion still tends to leave `limit` results
pub const CANDIDATE_OVERFETCH: usize = 2;

/// How many declared favorites seed the cold-start pool
pub const COLD_START_FAVORITES: usize = 3;

/// Similar items pulled per cold-start seed favorite
pub const COLD_START_SIMILAR_PER_FAVORITE: usize = 5;
