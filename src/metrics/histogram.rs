//! Lock-free latency histogram for p50/p95/p99 percentile tracking.
//!
//! Tiered-linear buckets trade a little accuracy for fixed memory and
//! wait-free recording, which keeps instrumentation off the hot path.

use std::sync::atomic::{AtomicU64, Ordering};

use super::LatencyPercentiles;

/// Number of buckets in the histogram.
const NUM_BUCKETS: usize = 64;

/// Latency histogram with tiered-linear buckets.
///
/// Bucket layout (microseconds):
/// - Buckets 0-31: 1μs resolution, values 0..32
/// - Buckets 32-47: 32μs resolution, values 32..544
/// - Buckets 48-62: 512μs resolution, values 544..8224
/// - Bucket 63: overflow, values 8224+
pub struct LatencyHistogram {
    buckets: [AtomicU64; NUM_BUCKETS],
    count: AtomicU64,
    max: AtomicU64,
}

impl LatencyHistogram {
    /// Create a new empty histogram.
    pub const fn new() -> Self {
        const ZERO: AtomicU64 = AtomicU64::new(0);
        Self {
            buckets: [ZERO; NUM_BUCKETS],
            count: AtomicU64::new(0),
            max: AtomicU64::new(0),
        }
    }

    /// Record a latency value in microseconds.
    #[inline]
    pub fn record(&self, value_us: u64) {
        let bucket = Self::value_to_bucket(value_us);
        self.buckets[bucket].fetch_add(1, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        // Update max using CAS loop
        let mut current_max = self.max.load(Ordering::Relaxed);
        while value_us > current_max {
            match self.max.compare_exchange_weak(
                current_max,
                value_us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current_max = actual,
            }
        }
    }

    /// Map a latency value to a bucket index.
    #[inline]
    fn value_to_bucket(value_us: u64) -> usize {
        if value_us < 32 {
            value_us as usize
        } else if value_us < 544 {
            32 + ((value_us - 32) / 32) as usize
        } else if value_us < 8224 {
            48 + ((value_us - 544) / 512) as usize
        } else {
            63
        }
    }

    /// Map a bucket index back to its lower bound. The returned value maps
    /// back to the same bucket; within a bucket the bound under-reports by
    /// at most one resolution step.
    #[inline]
    fn bucket_to_value(bucket: usize) -> u64 {
        if bucket < 32 {
            bucket as u64
        } else if bucket < 48 {
            32 + (bucket - 32) as u64 * 32
        } else {
            544 + (bucket - 48) as u64 * 512
        }
    }

    /// Total count of recorded values.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Calculate p50, p95, p99 percentiles from the current buckets.
    pub fn percentiles(&self) -> LatencyPercentiles {
        let total = self.count.load(Ordering::Relaxed);
        if total == 0 {
            return LatencyPercentiles::default();
        }

        let p50_target = total / 2;
        let p95_target = total * 95 / 100;
        let p99_target = total * 99 / 100;

        let mut cumulative = 0u64;
        let mut p50 = 0u64;
        let mut p95 = 0u64;
        let mut p99 = 0u64;

        for (bucket_idx, bucket) in self.buckets.iter().enumerate() {
            cumulative += bucket.load(Ordering::Relaxed);

            if p50 == 0 && cumulative >= p50_target {
                p50 = Self::bucket_to_value(bucket_idx);
            }
            if p95 == 0 && cumulative >= p95_target {
                p95 = Self::bucket_to_value(bucket_idx);
            }
            if p99 == 0 && cumulative >= p99_target {
                p99 = Self::bucket_to_value(bucket_idx);
            }
        }

        LatencyPercentiles {
            count: total,
            p50,
            p95,
            p99,
            max: self.max.load(Ordering::Relaxed),
        }
    }

    /// Reset all buckets to zero.
    pub fn reset(&self) {
        for bucket in &self.buckets {
            bucket.store(0, Ordering::Relaxed);
        }
        self.count.store(0, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}
