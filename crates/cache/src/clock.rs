//! Injected time source for cache expiry.
//!
//! Expiry decisions go through [`Clock`] so tests can drive the cache with
//! [`ManualClock`] instead of waiting out real timeouts.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock backed clock used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Starts at an arbitrary origin and only moves when [`advance`] is
/// called. Clones share the same offset.
///
/// [`advance`]: ManualClock::advance
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), offset_ms: Arc::new(AtomicU64::new(0)) }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.offset_ms.fetch_add(step.as_millis() as u64, Ordering::AcqRel);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::Acquire))
    }
}
