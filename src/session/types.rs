//! Session data types and summary arithmetic
//!
//! The numbers computed here (mean, peak, duration, relative timing) are
//! what a user trusts as scientific output, so the arithmetic is kept in
//! small pure functions with the exact rounding and reference instants
//! pinned by tests.
//!
//! # Two rebasing bases
//!
//! Persisted sample timestamps are relative to the *first captured sample*,
//! so a stored series always begins at `t = 0` no matter how long the link
//! took to deliver data after the start command. Marker timestamps are
//! relative to the *start command instant* instead: a marker can legally be
//! placed before the first sample arrives, and its offset must reflect when
//! the user acted, not when the device caught up. These two reference points
//! are intentionally different; do not "unify" them.

use crate::types::{Marker, Sample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default title applied when the user submits a blank one
pub const DEFAULT_SESSION_TITLE: &str = "New Session";

/// Persisted metadata for one recorded session.
///
/// Immutable once stored, except `title` which may be renamed in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque unique identifier (time-based)
    pub id: String,
    /// User-chosen display title
    pub title: String,
    /// Start instant of the recording
    pub timestamp: DateTime<Utc>,
    /// Elapsed recording time, formatted `m:ss`
    pub duration: String,
    /// Number of captured samples; always equals the stored series length
    pub samples_count: usize,
    /// Mean captured value in millivolts, rounded to 3 decimals
    pub avg: f64,
    /// Maximum captured value in millivolts, rounded to 3 decimals
    pub peak: f64,
    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A finished recording, ready to persist as one logical unit.
///
/// `samples` and `markers` are already rebased (see the module docs).
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSession {
    /// Summary metadata
    pub record: SessionRecord,
    /// Rebased sample series, first entry at `t = 0`
    pub samples: Vec<Sample>,
    /// Rebased markers, offsets from the start command
    pub markers: Vec<Marker>,
}

/// Running summary statistics over captured values.
///
/// O(1) per sample; the recorder keeps one of these alive during a session
/// so the live timer view can show mean/peak without rescanning.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    peak: f64,
}

impl RunningStats {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            peak: f64::MIN,
        }
    }

    /// Add a value
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.peak = self.peak.max(value);
    }

    /// Number of values seen
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean of the values seen (0.0 when empty)
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Maximum value seen (0.0 when empty)
    pub fn peak(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.peak
        }
    }

    /// Reset to empty
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Round to 3 decimal places, half away from zero
pub fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

/// Format elapsed milliseconds as `m:ss` (seconds zero-padded).
///
/// `125_000` → `"2:05"`, `59_000` → `"0:59"`. Negative input clamps to 0.
pub fn format_duration_ms(elapsed_ms: i64) -> String {
    let total_secs = elapsed_ms.max(0) / 1_000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}

/// Shift sample timestamps so the first sample lands at `t = 0`.
///
/// Under non-decreasing arrival the result is non-decreasing from 0.
pub fn rebase_samples(samples: &[Sample]) -> Vec<Sample> {
    let Some(base_t) = samples.first().map(|s| s.t) else {
        return Vec::new();
    };
    samples
        .iter()
        .map(|s| Sample::new(s.t - base_t, s.v))
        .collect()
}

/// Shift marker timestamps to offsets from the start command instant
pub fn rebase_markers(markers: &[Marker], started_at: i64) -> Vec<Marker> {
    markers
        .iter()
        .map(|m| Marker::new(m.t - started_at, m.label.clone()))
        .collect()
}

/// Generates process-unique, time-based session identifiers.
///
/// The id is the stop instant in epoch milliseconds. When two sessions stop
/// within the same millisecond (or the clock steps backwards), a monotonic
/// sequence suffix keeps the ids distinct: `"1763063928914-1"`.
#[derive(Debug, Default)]
pub struct SessionIdGen {
    last_ms: i64,
    sequence: u32,
}

impl SessionIdGen {
    /// Create a generator with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next identifier for a session stopping at `now_ms`
    pub fn next(&mut self, now_ms: i64) -> String {
        if now_ms > self.last_ms {
            self.last_ms = now_ms;
            self.sequence = 0;
            now_ms.to_string()
        } else {
            self.sequence += 1;
            format!("{}-{}", self.last_ms, self.sequence)
        }
    }
}
