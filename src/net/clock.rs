//! Monotonic nanosecond timestamps.

use tokio::time::Instant;

/// Source of monotonic nanosecond timestamps.
///
/// Only used for interval bookkeeping; protocol correctness never depends
/// on its precision.
pub trait Timestamper: Send + Sync {
    /// Nanoseconds since an arbitrary fixed origin.
    fn now_ns(&self) -> u64;
}

/// Clock backed by the tokio runtime's monotonic time.
///
/// Follows tokio's paused clock in tests that use `start_paused`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Timestamper for MonotonicClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}
