//! Pool observability: allocation counters and buffer-lifetime latency.
//!
//! All recording paths are lock-free atomics so instrumentation never adds
//! blocking to allocate/release.

mod histogram;

pub use histogram::LatencyHistogram;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Relaxed ordering for counters (eventual visibility is fine for metrics).
const RELAXED: Ordering = Ordering::Relaxed;

/// Counters and histograms a pool maintains over its lifetime.
pub struct PoolMetrics {
    allocations: AtomicU64,
    allocation_failures: AtomicU64,
    releases: AtomicU64,
    high_watermark: AtomicU64,

    /// Lifetime of released buffers, measured from their production
    /// timestamp to release.
    lifetime: LatencyHistogram,
}

impl PoolMetrics {
    /// Create a metrics instance with all counters at zero.
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            allocation_failures: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            high_watermark: AtomicU64::new(0),
            lifetime: LatencyHistogram::new(),
        }
    }

    /// Record a successful allocation and ratchet the in-use high watermark.
    #[inline]
    pub fn allocated(&self, in_use: usize) {
        self.allocations.fetch_add(1, RELAXED);

        let in_use = in_use as u64;
        let mut current = self.high_watermark.load(RELAXED);
        while in_use > current {
            match self.high_watermark.compare_exchange_weak(
                current,
                in_use,
                RELAXED,
                RELAXED,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Record an allocation attempt that found the pool drained.
    #[inline]
    pub fn allocation_failed(&self) {
        self.allocation_failures.fetch_add(1, RELAXED);
    }

    /// Record a buffer returning to the pool.
    #[inline]
    pub fn released(&self) {
        self.releases.fetch_add(1, RELAXED);
    }

    /// Record the lifetime of a released buffer in microseconds.
    #[inline]
    pub fn record_lifetime(&self, lifetime_us: u64) {
        self.lifetime.record(lifetime_us);
    }

    /// Point-in-time snapshot combined with the pool's current occupancy.
    pub fn snapshot(&self, capacity: usize, in_use: usize) -> PoolStats {
        PoolStats {
            capacity,
            in_use,
            allocations: self.allocations.load(RELAXED),
            allocation_failures: self.allocation_failures.load(RELAXED),
            releases: self.releases.load(RELAXED),
            high_watermark: self.high_watermark.load(RELAXED),
            lifetime: self.lifetime.percentiles(),
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency percentiles in microseconds.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LatencyPercentiles {
    pub count: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
}

/// Point-in-time snapshot of a pool's metrics, for logging or export.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Total buffers the pool owns.
    pub capacity: usize,
    /// Buffers currently held by callers.
    pub in_use: usize,
    /// Successful allocations since pool creation.
    pub allocations: u64,
    /// Allocation attempts that found the pool drained.
    pub allocation_failures: u64,
    /// Buffers returned to the pool.
    pub releases: u64,
    /// Highest simultaneous in-use count observed.
    pub high_watermark: u64,
    /// Buffer lifetime percentiles (production timestamp to release).
    pub lifetime: LatencyPercentiles,
}

impl PoolStats {
    /// Fraction of the pool currently in use (0.0 to 1.0).
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.in_use as f64 / self.capacity as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_counters() {
        let m = PoolMetrics::new();

        m.allocated(1);
        m.allocated(2);
        m.allocation_failed();
        m.released();

        let snap = m.snapshot(8, 1);
        assert_eq!(snap.allocations, 2);
        assert_eq!(snap.allocation_failures, 1);
        assert_eq!(snap.releases, 1);
    }

    #[test]
    fn test_high_watermark_ratchets() {
        let m = PoolMetrics::new();

        m.allocated(3);
        m.allocated(7);
        m.allocated(2);

        assert_eq!(m.snapshot(8, 2).high_watermark, 7);
    }

    #[test]
    fn test_lifetime_feeds_percentiles() {
        let m = PoolMetrics::new();
        m.record_lifetime(10);
        m.record_lifetime(20);

        let snap = m.snapshot(4, 0);
        assert_eq!(snap.lifetime.count, 2);
        assert_eq!(snap.lifetime.max, 20);
    }

    #[test]
    fn test_utilization() {
        let stats = PoolMetrics::new().snapshot(8, 2);
        assert!((stats.utilization() - 0.25).abs() < 1e-9);

        let empty = PoolMetrics::new().snapshot(0, 0);
        assert_eq!(empty.utilization(), 0.0);
    }

    #[test]
    fn test_stats_serialize() {
        let snap = PoolMetrics::new().snapshot(4, 1);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"capacity\":4"));
        assert!(json.contains("\"lifetime\""));
    }
}
