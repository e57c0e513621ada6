//! # PlantSense-RS: bio-signal stream recorder
//!
//! A desktop companion for PlantSense bio-electric sensing peripherals. The
//! device streams millivolt readings as line/comma-delimited text chunks;
//! this crate decodes them, keeps a 20-second live window for display, and
//! captures user-delimited stretches of the stream as named sessions with
//! summary statistics, event markers, and CSV export.
//!
//! ## Architecture
//!
//! - **Transport**: an owned [`transport::SignalTransport`] handle feeding a
//!   crossbeam channel of payload chunks and lifecycle events
//! - **Pipeline**: the frame decoder fanning samples out to the sliding
//!   window and the session recorder, synchronously on one timeline
//! - **Session**: the Idle/Recording state machine, summary/rebasing
//!   arithmetic, durable store, and CSV export
//! - **App**: [`app::PlantSenseApp`] wires the pieces together and exposes
//!   the surface the CLI drives
//!
//! ## Example
//!
//! ```ignore
//! use plantsense_rs::{
//!     app::PlantSenseApp,
//!     config::AppConfig,
//!     session::JsonFileStore,
//!     transport::SimTransport,
//!     types::SystemClock,
//! };
//! use std::sync::Arc;
//!
//! let config = AppConfig::load_or_default();
//! let store = Box::new(JsonFileStore::open(config.data_dir())?);
//! let transport = Box::new(SimTransport::new(config.sim.clone()));
//! let mut app = PlantSenseApp::new(transport, store, &config, Arc::new(SystemClock));
//!
//! app.scan_and_connect()?;
//! app.start_recording()?;
//! // ... pump events while the device streams ...
//! app.add_marker("Stimulus");
//! let record = app.stop_and_save("Morning run")?;
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use app::PlantSenseApp;
pub use config::AppConfig;
pub use error::{PlantSenseError, Result};
pub use session::{JsonFileStore, SessionRecord, SessionStore};
pub use types::{Marker, Sample};
