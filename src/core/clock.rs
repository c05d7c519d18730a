//=========================================================================
// Clock
//=========================================================================
//
// Time source for transitions and wall-clock update deltas.
//
// SystemClock reads Instant::now(). ManualClock only moves when told to,
// which makes transition timing deterministic for fixed-step drivers
// and tests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

//=== Clock Trait =========================================================

/// Source of timestamps for the scene manager.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Instant;
}

//=== SystemClock =========================================================

/// Wall-clock time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

//=== ManualClock =========================================================

/// Clock that advances only when [`ManualClock::advance`] is called.
///
/// Clones share the same time, so a test can keep one handle while the
/// manager owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Creates a clock frozen at the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += delta;
    }

    /// Total time advanced since construction.
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

//=== Tests ===============================================================
