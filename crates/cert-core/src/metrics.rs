//! Global atomic counters for CERT measurements.
//!
//! Counters are incremented silently by the engines. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. on shutdown), or [`Metrics::snapshot`] to
//! read them as a serializable value.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lock-free atomic counters.
pub struct Metrics {
    consistency_measurements: AtomicU64,
    coordination_measurements: AtomicU64,
    responses_embedded: AtomicU64,
    rejected_requests: AtomicU64,
    embedding_failures: AtomicU64,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub consistency_measurements: u64,
    pub coordination_measurements: u64,
    pub responses_embedded: u64,
    pub rejected_requests: u64,
    pub embedding_failures: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            consistency_measurements: AtomicU64::new(0),
            coordination_measurements: AtomicU64::new(0),
            responses_embedded: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            embedding_failures: AtomicU64::new(0),
        }
    }

    /// Record one successful consistency measurement over `responses` texts.
    pub fn inc_consistency(&self, responses: u64) {
        self.consistency_measurements.fetch_add(1, Ordering::Relaxed);
        self.responses_embedded.fetch_add(responses, Ordering::Relaxed);
        tracing::trace!(metric = "consistency_measurements", "counter incremented");
    }

    /// Record one successful coordination measurement.
    pub fn inc_coordination(&self) {
        self.coordination_measurements
            .fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "coordination_measurements", "counter incremented");
    }

    /// Record a request rejected for invalid input.
    pub fn inc_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "rejected_requests", "counter incremented");
    }

    /// Record a failed embedding call.
    pub fn inc_embedding_failures(&self) {
        self.embedding_failures.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "embedding_failures", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            metric = "flush",
            consistency_measurements = s.consistency_measurements,
            coordination_measurements = s.coordination_measurements,
            responses_embedded = s.responses_embedded,
            rejected_requests = s.rejected_requests,
            embedding_failures = s.embedding_failures,
        );
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            consistency_measurements: self.consistency_measurements.load(Ordering::Relaxed),
            coordination_measurements: self.coordination_measurements.load(Ordering::Relaxed),
            responses_embedded: self.responses_embedded.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            embedding_failures: self.embedding_failures.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.consistency_measurements.store(0, Ordering::Relaxed);
        self.coordination_measurements.store(0, Ordering::Relaxed);
        self.responses_embedded.store(0, Ordering::Relaxed);
        self.rejected_requests.store(0, Ordering::Relaxed);
        self.embedding_failures.store(0, Ordering::Relaxed);
    }
}
