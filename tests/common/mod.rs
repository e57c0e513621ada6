//! Shared helpers for integration tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use crossbeam_channel::{unbounded, Receiver, Sender};
use plantsense_rs::session::store::{MemoryStore, SessionStore, StoredSession};
use plantsense_rs::session::types::SessionRecord;
use plantsense_rs::transport::{SignalTransport, TransportEvent};
use plantsense_rs::types::{Marker, Sample};
use plantsense_rs::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Assert two floats are within epsilon of each other
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "expected {a} ≈ {b} (epsilon {epsilon})"
    );
}

/// Scripted transport: tests decide exactly which chunks and lifecycle
/// events arrive, through the [`StubHandle`] kept after the transport is
/// handed to the app.
pub struct StubTransport {
    connected: Arc<AtomicBool>,
    tx: Sender<TransportEvent>,
    rx: Receiver<TransportEvent>,
}

/// Test-side controls for a [`StubTransport`]
#[derive(Clone)]
pub struct StubHandle {
    connected: Arc<AtomicBool>,
    tx: Sender<TransportEvent>,
}

impl StubTransport {
    pub fn new() -> (Self, StubHandle) {
        let (tx, rx) = unbounded();
        let connected = Arc::new(AtomicBool::new(false));
        let handle = StubHandle {
            connected: Arc::clone(&connected),
            tx: tx.clone(),
        };
        (Self { connected, tx, rx }, handle)
    }
}

impl SignalTransport for StubTransport {
    fn open(&mut self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.connected.swap(false, Ordering::SeqCst) {
            let _ = self.tx.send(TransportEvent::Disconnected);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn events(&self) -> Receiver<TransportEvent> {
        self.rx.clone()
    }
}

impl StubHandle {
    /// Deliver one payload chunk of device text
    pub fn send_chunk(&self, text: &str) {
        self.tx
            .send(TransportEvent::Chunk(text.as_bytes().to_vec()))
            .expect("app dropped the event channel");
    }

    /// Deliver a transport-level decode failure
    pub fn send_decode_error(&self, message: &str) {
        self.tx
            .send(TransportEvent::DecodeError(message.to_string()))
            .expect("app dropped the event channel");
    }

    /// Drop the link from the device side
    pub fn drop_link(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.tx
            .send(TransportEvent::Disconnected)
            .expect("app dropped the event channel");
    }

    /// Bring the link back up (the app never reconnects on its own)
    pub fn restore_link(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }
}

/// [`MemoryStore`] behind an `Arc` so a test can keep inspecting the store
/// after handing it to the app.
#[derive(Clone, Default)]
pub struct SharedMemoryStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn session(&self, id: &str) -> Option<StoredSession> {
        self.inner.lock().unwrap().get(id).unwrap()
    }

    pub fn records(&self) -> Vec<SessionRecord> {
        self.inner.lock().unwrap().list_metadata().unwrap()
    }
}

impl SessionStore for SharedMemoryStore {
    fn put(
        &mut self,
        record: &SessionRecord,
        samples: &[Sample],
        markers: &[Marker],
    ) -> Result<()> {
        self.inner.lock().unwrap().put(record, samples, markers)
    }

    fn get(&self, id: &str) -> Result<Option<StoredSession>> {
        self.inner.lock().unwrap().get(id)
    }

    fn list_metadata(&self) -> Result<Vec<SessionRecord>> {
        self.inner.lock().unwrap().list_metadata()
    }

    fn rename_title(&mut self, id: &str, new_title: &str) -> Result<()> {
        self.inner.lock().unwrap().rename_title(id, new_title)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.inner.lock().unwrap().delete(id)
    }
}
