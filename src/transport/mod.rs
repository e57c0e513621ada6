//! Transport layer for the sensing peripheral
//!
//! The pipeline never talks to a device directly: it consumes an event
//! stream from a [`SignalTransport`] handle. The handle is an explicitly
//! constructed, owned object with an `open`/`close` lifecycle; there is no
//! process-wide connection singleton.
//!
//! # Architecture
//!
//! A transport implementation runs its own delivery mechanism (a notification
//! callback, a reader thread, a timer) and forwards everything into a
//! [`crossbeam_channel`] the app context drains:
//!
//! - [`TransportEvent::Chunk`] - one raw notification payload, opaque bytes
//! - [`TransportEvent::DecodeError`] - a transport-level envelope failure;
//!   logged and absorbed, the stream keeps going
//! - [`TransportEvent::Disconnected`] - the link dropped (peripheral reset,
//!   out of range, explicit close)
//!
//! The core never initiates connections on its own; `open()` is only called
//! from the orchestration layer.

#[cfg(feature = "sim-device")]
pub mod sim;

#[cfg(feature = "sim-device")]
pub use sim::SimTransport;

use crate::error::Result;
use crossbeam_channel::Receiver;

/// Connection-lifecycle and payload events emitted by a transport
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// One raw notification payload from the peripheral
    Chunk(Vec<u8>),
    /// Transport-level decode failure (malformed envelope); informational
    DecodeError(String),
    /// The connection dropped
    Disconnected,
}

/// Handle to a sensing peripheral.
///
/// Implementations own their delivery mechanism and feed all payloads and
/// lifecycle changes through the channel returned by [`events`].
///
/// `close` must be idempotent: closing an already-closed handle is a no-op.
///
/// [`events`]: SignalTransport::events
pub trait SignalTransport: Send {
    /// Scan for the configured peripheral and connect.
    ///
    /// Blocks until the link is up or the attempt fails; any timeout policy
    /// belongs to the implementation.
    fn open(&mut self) -> Result<()>;

    /// Drop the connection. No-op when already closed.
    fn close(&mut self) -> Result<()>;

    /// Whether the link is currently up
    fn is_connected(&self) -> bool;

    /// The event stream for this handle.
    ///
    /// The receiver end is cloneable and stays valid across reconnects of
    /// the same handle.
    fn events(&self) -> Receiver<TransportEvent>;
}
