//! Sliding window buffer for live display
//!
//! Holds the most recent stretch of the sample stream, pruned against a
//! rolling wall-clock cutoff on every push. This buffer backs the live
//! trace and nothing else: it is never persisted, and it is discarded
//! wholesale on disconnect.
//!
//! # Pruning
//!
//! Arrivals are time-ordered, so eviction only ever inspects the oldest
//! entries: on each push the cutoff is `pushed.t - horizon`, and entries are
//! popped from the front while they fall before it. The scan is bounded by
//! the number of evicted entries, not the buffer size: amortized O(1) per
//! push.
//!
//! A clock adjustment can hand the buffer a sample older than its
//! predecessor. The buffer stays append-ordered (no re-sort); front-first
//! pruning remains correct because only the oldest entries can expire.
//! Timestamp monotonicity inside a snapshot is therefore *usual*, not
//! guaranteed.

use crate::types::Sample;
use std::collections::VecDeque;

/// Default look-back horizon: 20 seconds
pub const DEFAULT_HORIZON_MS: i64 = 20_000;

/// Time-pruned recent-history buffer over the live sample stream
#[derive(Debug)]
pub struct SlidingWindow {
    samples: VecDeque<Sample>,
    horizon_ms: i64,
    latest: Option<f64>,
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_MS)
    }
}

impl SlidingWindow {
    /// Create a window retaining samples newer than `horizon_ms`
    pub fn new(horizon_ms: i64) -> Self {
        Self {
            samples: VecDeque::new(),
            horizon_ms,
            latest: None,
        }
    }

    /// Append a sample, then evict everything older than the horizon.
    ///
    /// The cutoff is evaluated against the pushed sample's timestamp; a
    /// retained entry always satisfies `t >= pushed.t - horizon`.
    pub fn push(&mut self, sample: Sample) {
        self.latest = Some(sample.v);
        let cutoff = sample.t - self.horizon_ms;
        self.samples.push_back(sample);
        while self
            .samples
            .front()
            .is_some_and(|oldest| oldest.t < cutoff)
        {
            self.samples.pop_front();
        }
    }

    /// Lazy, restartable read-only view of the current contents, oldest first
    pub fn snapshot(&self) -> impl Iterator<Item = &Sample> + Clone + '_ {
        self.samples.iter()
    }

    /// Most recently pushed value, for the live readout
    pub fn latest(&self) -> Option<f64> {
        self.latest
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all contents and the live readout (used on disconnect)
    pub fn clear(&mut self) {
        self.samples.clear();
        self.latest = None;
    }
}
