//! Production timestamps for per-buffer latency measurement.
//!
//! The `timestamps` feature selects between the real tracker and a zero-size
//! no-op with the same API, so buffer code never branches on the feature.

use std::time::{Duration, Instant};

/// Records when a buffer was produced and measures elapsed time since.
///
/// An unset stamp reports zero latency; it is never an error. Copying a
/// stamp preserves the original production time.
#[cfg(feature = "timestamps")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyStamp {
    produced_at: Option<Instant>,
}

#[cfg(feature = "timestamps")]
impl LatencyStamp {
    /// Forget the stored timestamp.
    #[inline]
    pub fn clear(&mut self) {
        self.produced_at = None;
    }

    /// Record the current instant as the production time.
    #[inline]
    pub fn set(&mut self) {
        self.produced_at = Some(Instant::now());
    }

    /// Record an explicit production time.
    #[inline]
    pub fn set_at(&mut self, at: Instant) {
        self.produced_at = Some(at);
    }

    /// Whether a production time has been recorded.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.produced_at.is_some()
    }

    /// The recorded production time, if any.
    #[inline]
    pub fn timestamp(&self) -> Option<Instant> {
        self.produced_at
    }

    /// Elapsed time since production, or zero when unset.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        match self.produced_at {
            Some(at) => at.elapsed(),
            None => Duration::ZERO,
        }
    }

    /// Elapsed time since production in whole microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }
}

/// No-op tracker used when the `timestamps` feature is disabled. Every
/// query reports an unset stamp with zero latency.
#[cfg(not(feature = "timestamps"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyStamp;

#[cfg(not(feature = "timestamps"))]
impl LatencyStamp {
    #[inline]
    pub fn clear(&mut self) {}

    #[inline]
    pub fn set(&mut self) {}

    #[inline]
    pub fn set_at(&mut self, _at: Instant) {}

    #[inline]
    pub fn is_set(&self) -> bool {
        false
    }

    #[inline]
    pub fn timestamp(&self) -> Option<Instant> {
        None
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        Duration::ZERO
    }

    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        0
    }
}
