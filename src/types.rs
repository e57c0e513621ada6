//! Core data types for PlantSense-RS
//!
//! This module contains the fundamental data structures shared across the
//! ingestion pipeline and the session subsystem.
//!
//! # Main Types
//!
//! - [`Sample`] - A single timestamped signal measurement (millivolts)
//! - [`Marker`] - A user-tagged event instant placed during a recording
//! - [`Clock`] - Wall-clock abstraction so the pipeline can be driven
//!   deterministically in tests
//!
//! # Timestamps
//!
//! Sample and marker timestamps are wall-clock epoch milliseconds (`i64`).
//! They are assigned at decode/submission time on the receiving machine, not
//! taken from the peripheral; values decoded from the same payload chunk may
//! therefore share an identical timestamp.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A single bio-electric measurement point.
///
/// `t` is the arrival wall clock in epoch milliseconds; `v` is the signal
/// value in millivolts. Samples are immutable once produced; every buffer
/// that retains one holds its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Arrival timestamp in epoch milliseconds
    pub t: i64,
    /// Signal value in millivolts
    pub v: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(t: i64, v: f64) -> Self {
        Self { t, v }
    }
}

/// A user-placed event marker.
///
/// Markers exist only inside a recording session. Their timestamp is taken
/// at submission time and is always at-or-after the session's start instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Timestamp in epoch milliseconds (relative to recording start once persisted)
    pub t: i64,
    /// Short category label, e.g. "Stimulus" or "Touch"
    pub label: String,
}

impl Marker {
    /// Create a new marker
    pub fn new(t: i64, label: impl Into<String>) -> Self {
        Self {
            t,
            label: label.into(),
        }
    }
}

/// Wall-clock source for the pipeline.
///
/// The decoder, window buffer, and recorder all stamp data with the current
/// wall clock. Routing those reads through this trait keeps the arithmetic
/// (pruning cutoffs, rebasing bases) testable with a controlled clock.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in epoch milliseconds
    fn now_ms(&self) -> i64;
}

/// Shared handle to a [`Clock`]
pub type SharedClock = Arc<dyn Clock>;

/// System wall clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Starts at the given instant and only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock pinned at `start_ms`
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    /// Move the clock forward by `delta_ms`
    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Set the clock to an absolute instant (may move backwards)
    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(100);
        assert_eq!(clock.now_ms(), 100);
    }

    #[test]
    fn test_sample_roundtrip() {
        let s = Sample::new(42, 1.25);
        let json = serde_json::to_string(&s).unwrap();
        let back: Sample = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
