//! Session recorder state machine
//!
//! Cycles between `Idle` and `Recording` for the lifetime of the process.
//! While recording it filters the live sample stream, keeping exactly the
//! samples arriving at-or-after the start instant, and accumulates
//! user-placed markers. Stopping finalizes the capture into a
//! [`FinalizedSession`]: rebased series, rebased markers, summary
//! statistics, formatted duration, and a fresh id.
//!
//! The recorder's buffers are independent of the live window and its
//! pruning: a capture longer than the display horizon loses nothing.

use crate::session::types::{
    format_duration_ms, rebase_markers, rebase_samples, round3, FinalizedSession, RunningStats,
    SessionIdGen, SessionRecord, DEFAULT_SESSION_TITLE,
};
use crate::types::{Marker, Sample, SharedClock};
use chrono::{DateTime, Utc};

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// No active session
    #[default]
    Idle,
    /// Currently capturing samples and markers
    Recording,
}

impl RecorderState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderState::Recording)
    }
}

/// Result of a stop command
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// The recorder was already idle; nothing happened
    Idle,
    /// A recording was active but captured zero samples; nothing to persist.
    /// The recorder has returned to idle.
    NothingToSave,
    /// The capture finalized successfully
    Finalized(FinalizedSession),
}

/// Captures a user-delimited stretch of the sample stream
pub struct SessionRecorder {
    state: RecorderState,
    started_at: Option<i64>,
    samples: Vec<Sample>,
    markers: Vec<Marker>,
    stats: RunningStats,
    ids: SessionIdGen,
    clock: SharedClock,
}

impl SessionRecorder {
    /// Create an idle recorder stamping times from the given clock
    pub fn new(clock: SharedClock) -> Self {
        Self {
            state: RecorderState::Idle,
            started_at: None,
            samples: Vec::new(),
            markers: Vec::new(),
            stats: RunningStats::new(),
            ids: SessionIdGen::new(),
            clock,
        }
    }

    /// Current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Whether a recording is active
    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Start instant of the active recording, if any
    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    /// Samples captured so far in the active recording
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Markers placed so far in the active recording
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Wall-clock time elapsed since the start command (0 while idle)
    pub fn elapsed_ms(&self) -> i64 {
        self.started_at
            .map(|started| (self.clock.now_ms() - started).max(0))
            .unwrap_or(0)
    }

    /// Live mean of the captured values, for the recording status display
    pub fn live_avg(&self) -> f64 {
        self.stats.average()
    }

    /// Live maximum of the captured values
    pub fn live_peak(&self) -> f64 {
        self.stats.peak()
    }

    /// Begin a new recording at the current instant.
    ///
    /// Clears markers and elapsed accounting from any previous session.
    /// Starting while already recording is a no-op: the caller is expected
    /// to stop first, and the active capture must not be silently discarded.
    pub fn start(&mut self) {
        if self.state.is_recording() {
            tracing::warn!("start ignored: recording already active");
            return;
        }
        let now = self.clock.now_ms();
        self.started_at = Some(now);
        self.samples.clear();
        self.markers.clear();
        self.stats.reset();
        self.state = RecorderState::Recording;
        tracing::info!(started_at = now, "recording started");
    }

    /// Offer one decoded sample from the live stream.
    ///
    /// Kept only while recording and only when it arrived at-or-after the
    /// start instant; everything else is ignored without effect.
    #[inline]
    pub fn observe(&mut self, sample: Sample) {
        if !self.state.is_recording() {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };
        if sample.t >= started_at {
            self.samples.push(sample);
            self.stats.push(sample.v);
        }
    }

    /// Place a marker at the current instant.
    ///
    /// Silent no-op while idle: marker buttons stay visible when no session
    /// is active, and pressing one must not be an error.
    pub fn add_marker(&mut self, label: impl Into<String>) {
        if !self.state.is_recording() {
            return;
        }
        let marker = Marker::new(self.clock.now_ms(), label);
        tracing::debug!(t = marker.t, label = %marker.label, "marker placed");
        self.markers.push(marker);
    }

    /// Stop the active recording and finalize it.
    ///
    /// Whitespace around `title` is trimmed; a blank title falls back to
    /// `"New Session"`. In every outcome the recorder ends up idle, so a
    /// second stop in a row reports [`StopOutcome::Idle`] and persists
    /// nothing.
    pub fn stop_and_finalize(&mut self, title: &str) -> StopOutcome {
        if !self.state.is_recording() {
            return StopOutcome::Idle;
        }
        self.state = RecorderState::Idle;
        let started_at = self.started_at.take().unwrap_or(0);
        let samples = std::mem::take(&mut self.samples);
        let markers = std::mem::take(&mut self.markers);
        let stats = self.stats;
        self.stats.reset();

        if samples.is_empty() {
            tracing::info!("recording stopped with no captured samples");
            return StopOutcome::NothingToSave;
        }

        let stopped_at = self.clock.now_ms();
        let title = title.trim();
        let record = SessionRecord {
            id: self.ids.next(stopped_at),
            title: if title.is_empty() {
                DEFAULT_SESSION_TITLE.to_string()
            } else {
                title.to_string()
            },
            timestamp: DateTime::<Utc>::from_timestamp_millis(started_at)
                .unwrap_or_else(Utc::now),
            duration: format_duration_ms(stopped_at - started_at),
            samples_count: samples.len(),
            avg: round3(stats.average()),
            peak: round3(stats.peak()),
            notes: None,
        };

        tracing::info!(
            id = %record.id,
            samples = record.samples_count,
            duration = %record.duration,
            "recording finalized"
        );

        StopOutcome::Finalized(FinalizedSession {
            record,
            samples: rebase_samples(&samples),
            markers: rebase_markers(&markers, started_at),
        })
    }
}
