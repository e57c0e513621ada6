//! Top-level application context
//!
//! [`PlantSenseApp`] owns the transport handle, the ingestion pipeline, and
//! the session store, and exposes the surface the view/CLI layer drives:
//! connect/disconnect, the live readout, and the recording commands. It is
//! an explicitly constructed object; nothing in here is a global.
//!
//! # Event pumping
//!
//! The transport delivers its events over a channel. The owner of the app
//! decides when to drain it: call [`PlantSenseApp::pump`] from a tick, or
//! grab [`PlantSenseApp::events`] and feed [`PlantSenseApp::handle_event`]
//! from a `select!` loop. Either way every event is processed synchronously
//! on the calling thread, in arrival order.

use crate::config::AppConfig;
use crate::error::{PlantSenseError, Result};
use crate::pipeline::SignalPipeline;
use crate::session::recorder::StopOutcome;
use crate::session::store::SessionStore;
use crate::session::types::SessionRecord;
use crate::transport::{SignalTransport, TransportEvent};
use crate::types::{Sample, SharedClock};
use crossbeam_channel::Receiver;

/// Owns the pipeline and its collaborators; the app's one entry point
pub struct PlantSenseApp {
    transport: Box<dyn SignalTransport>,
    events: Receiver<TransportEvent>,
    pipeline: SignalPipeline,
    store: Box<dyn SessionStore>,
}

impl PlantSenseApp {
    /// Assemble the app from its collaborators
    pub fn new(
        transport: Box<dyn SignalTransport>,
        store: Box<dyn SessionStore>,
        config: &AppConfig,
        clock: SharedClock,
    ) -> Self {
        let events = transport.events();
        Self {
            transport,
            events,
            pipeline: SignalPipeline::new(config.window_horizon_ms, clock),
            store,
        }
    }

    /// Scan for the peripheral and connect
    pub fn scan_and_connect(&mut self) -> Result<()> {
        self.transport.open()
    }

    /// Drop the connection and process the resulting events.
    ///
    /// Idempotent; a recording in progress stays active on its own buffers.
    pub fn disconnect(&mut self) -> Result<()> {
        self.transport.close()?;
        self.pump();
        Ok(())
    }

    /// Whether the peripheral link is up
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// The transport event stream, for callers running their own `select!`
    pub fn events(&self) -> Receiver<TransportEvent> {
        self.events.clone()
    }

    /// Process one transport event
    pub fn handle_event(&mut self, event: TransportEvent) {
        self.pipeline.handle_event(event);
    }

    /// Drain all pending transport events; returns how many were processed
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events.try_recv() {
            self.pipeline.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// Most recent decoded value
    pub fn latest_value(&self) -> Option<f64> {
        self.pipeline.latest_value()
    }

    /// Ordered copy of the live window
    pub fn window_snapshot(&self) -> Vec<Sample> {
        self.pipeline.window_snapshot()
    }

    /// Begin recording.
    ///
    /// Requires an active connection; fails with
    /// [`PlantSenseError::NotConnected`] otherwise, leaving state unchanged.
    pub fn start_recording(&mut self) -> Result<()> {
        if !self.transport.is_connected() {
            return Err(PlantSenseError::NotConnected);
        }
        self.pipeline.recorder_mut().start();
        Ok(())
    }

    /// Place a marker in the active recording (silent no-op while idle)
    pub fn add_marker(&mut self, label: &str) {
        self.pipeline.recorder_mut().add_marker(label);
    }

    /// Stop the active recording and persist it.
    ///
    /// Returns `Ok(None)` when no recording was active (stop is idempotent),
    /// `Err(NothingToSave)` when the capture held zero samples, and the
    /// persisted record otherwise.
    pub fn stop_and_save(&mut self, title: &str) -> Result<Option<SessionRecord>> {
        match self.pipeline.recorder_mut().stop_and_finalize(title) {
            StopOutcome::Idle => Ok(None),
            StopOutcome::NothingToSave => Err(PlantSenseError::NothingToSave),
            StopOutcome::Finalized(session) => {
                self.store
                    .put(&session.record, &session.samples, &session.markers)?;
                Ok(Some(session.record))
            }
        }
    }

    /// Whether a recording is active
    pub fn is_recording(&self) -> bool {
        self.pipeline.recorder().is_recording()
    }

    /// Milliseconds since the start command (0 while idle)
    pub fn elapsed_ms(&self) -> i64 {
        self.pipeline.recorder().elapsed_ms()
    }

    /// Samples captured so far in the active recording
    pub fn recorded_samples(&self) -> usize {
        self.pipeline.recorder().sample_count()
    }
}
