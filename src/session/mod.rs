//! Session capture subsystem
//!
//! Everything between "the user pressed start" and "a named session sits in
//! durable storage":
//!
//! - [`recorder`] - the Idle/Recording state machine filtering the live stream
//! - [`types`] - record shapes, summary statistics, rebasing and formatting
//! - [`store`] - the durable store contract and its implementations
//! - [`export`] - CSV flattening of one stored session

pub mod export;
pub mod recorder;
pub mod store;
pub mod types;

pub use recorder::{RecorderState, SessionRecorder, StopOutcome};
pub use store::{JsonFileStore, MemoryStore, SessionStore, StoredSession};
pub use types::{FinalizedSession, SessionRecord, DEFAULT_SESSION_TITLE};
