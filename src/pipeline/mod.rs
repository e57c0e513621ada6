//! Ingestion pipeline: transport events in, live window + recording out
//!
//! This module wires the frame decoder to its two synchronous consumers:
//!
//! - the [`SlidingWindow`] always receives every decoded sample, and
//! - the [`SessionRecorder`] receives them only while a recording is active.
//!
//! # Single timeline
//!
//! The transport delivers events over a channel; whichever thread drains
//! that channel calls [`SignalPipeline::handle_event`] and thereby drives
//! decoding and both consumers synchronously, in arrival order. Nothing in
//! here blocks, waits, or spawns, so there is exactly one logical timeline of
//! mutation, so neither buffer ever sees a concurrent writer.
//!
//! Within a chunk, tokens are processed left-to-right, line-by-line in
//! document order.

pub mod decoder;
pub mod window;

pub use decoder::FrameDecoder;
pub use window::{SlidingWindow, DEFAULT_HORIZON_MS};

use crate::session::recorder::SessionRecorder;
use crate::transport::TransportEvent;
use crate::types::{Sample, SharedClock};

/// The decoding/fan-out stage between a transport and the app surface
pub struct SignalPipeline {
    decoder: FrameDecoder,
    window: SlidingWindow,
    recorder: SessionRecorder,
}

impl SignalPipeline {
    /// Create a pipeline with the given look-back horizon
    pub fn new(horizon_ms: i64, clock: SharedClock) -> Self {
        Self {
            decoder: FrameDecoder::new(clock.clone()),
            window: SlidingWindow::new(horizon_ms),
            recorder: SessionRecorder::new(clock),
        }
    }

    /// Process one transport event.
    ///
    /// Chunks are decoded and fanned out; transport decode failures are
    /// logged and absorbed; a disconnect discards the live window but leaves
    /// any active recording running on its own buffers; the user stops it
    /// explicitly.
    pub fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Chunk(payload) => {
                self.ingest_chunk(&payload);
            }
            TransportEvent::DecodeError(message) => {
                tracing::warn!("transport decode failure: {message}");
            }
            TransportEvent::Disconnected => {
                tracing::info!("peripheral disconnected, clearing live window");
                self.window.clear();
                if self.recorder.is_recording() {
                    tracing::info!("recording stays active across the disconnect");
                }
            }
        }
    }

    /// Decode one payload chunk and fan the samples out, in arrival order
    pub fn ingest_chunk(&mut self, payload: &[u8]) {
        let samples = self.decoder.decode(payload);
        if samples.is_empty() {
            tracing::trace!("chunk of {} bytes yielded no samples", payload.len());
            return;
        }
        for sample in samples {
            self.window.push(sample);
            self.recorder.observe(sample);
        }
    }

    /// Most recent decoded value, if any
    pub fn latest_value(&self) -> Option<f64> {
        self.window.latest()
    }

    /// Ordered copy of the current live window
    pub fn window_snapshot(&self) -> Vec<Sample> {
        self.window.snapshot().copied().collect()
    }

    /// The live window buffer
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// The session recorder
    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    /// Mutable access to the session recorder
    pub fn recorder_mut(&mut self) -> &mut SessionRecorder {
        &mut self.recorder
    }
}
