//! Behavioral consistency value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of responses that yields at least one pairwise distance.
pub const MIN_RESPONSES: usize = 2;

/// Maximum number of responses per measurement.
///
/// Pairwise comparison is quadratic: 1000 responses are 499 500 distances,
/// accumulated in constant memory by [`DistanceAccumulator`].
pub const MAX_RESPONSES: usize = 1000;

/// Outcome of a consistency measurement.
///
/// Carries the derived score together with the statistics it was computed
/// from, so a consumer can audit the number rather than trust it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsistencyResult {
    pub agent_id: String,
    pub prompt: String,
    /// `max(0, 1 - std/mean)` over pairwise cosine distances; `1.0` when every
    /// response embeds identically.
    pub consistency_score: f64,
    pub mean_semantic_distance: f64,
    /// Population standard deviation of the pairwise distances.
    pub std_semantic_distance: f64,
    pub num_responses: usize,
    pub timestamp: DateTime<Utc>,
}

/// Summary statistics over a set of pairwise distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStats {
    pub mean: f64,
    pub std: f64,
}

impl DistanceStats {
    /// Mean and population standard deviation (divides by `n`).
    ///
    /// Returns `None` for an empty slice.
    pub fn from_distances(distances: &[f64]) -> Option<Self> {
        let mut acc = DistanceAccumulator::new();
        for d in distances {
            acc.push(*d);
        }
        acc.finish()
    }

    /// Inverted coefficient of variation, floored at zero.
    pub fn consistency_score(&self) -> f64 {
        if self.mean == 0.0 {
            return 1.0;
        }
        (1.0 - self.std / self.mean).max(0.0)
    }
}

/// Single-pass mean and variance (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl DistanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, distance: f64) {
        self.count += 1;
        let delta = distance - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (distance - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Population statistics, or `None` if nothing was pushed.
    pub fn finish(&self) -> Option<DistanceStats> {
        if self.count == 0 {
            return None;
        }
        let variance = (self.m2 / self.count as f64).max(0.0);
        Some(DistanceStats {
            mean: self.mean,
            std: variance.sqrt(),
        })
    }
}
