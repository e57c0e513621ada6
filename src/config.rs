//! Configuration for PlantSense-RS
//!
//! Application configuration is a single TOML document stored in the
//! platform-appropriate data directory:
//!
//! - **Linux**: `~/.local/share/rs.plantsense.recorder/`
//! - **macOS**: `~/Library/Application Support/rs.plantsense.recorder/`
//! - **Windows**: `%APPDATA%\rs.plantsense.recorder\`
//!
//! The same directory also holds the session store documents (see
//! [`crate::session::store`]), unless `data_dir` overrides it.
//!
//! # Example
//!
//! ```ignore
//! use plantsense_rs::config::AppConfig;
//!
//! let config = AppConfig::load_or_default();
//! println!("looking for peripheral {:?}", config.peripheral.name_filter);
//! config.save()?;
//! ```

use crate::error::{PlantSenseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "rs.plantsense.recorder";

/// Config file name inside the app data directory
const CONFIG_FILE: &str = "config.toml";

/// Peripheral connection parameters.
///
/// These describe the remote sensing device; discovery and connection are
/// the transport layer's concern, the pipeline only consumes its chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeripheralConfig {
    /// Advertised-name substring used to pick the device during scan
    pub name_filter: String,
    /// GATT service UUID carrying the signal characteristic
    pub service_uuid: String,
    /// Characteristic UUID that notifies signal payloads
    pub characteristic_uuid: String,
    /// Connection establishment timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            name_filter: "PlantSense".to_string(),
            service_uuid: "12345678-1234-1234-1234-1234567890ab".to_string(),
            characteristic_uuid: "12345678-1234-1234-1234-1234567890ac".to_string(),
            connect_timeout_ms: 10_000,
        }
    }
}

/// Parameters for the simulated peripheral (`sim-device` feature).
///
/// The simulator emits the same line/comma text framing as the real device,
/// so the whole pipeline downstream of the transport is exercised unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimDeviceConfig {
    /// Interval between emitted chunks in milliseconds
    pub chunk_interval_ms: u64,
    /// Number of values packed into each chunk
    pub values_per_chunk: usize,
    /// Baseline of the generated signal in millivolts
    pub base_mv: f64,
    /// Amplitude of the generated waveform in millivolts
    pub amplitude_mv: f64,
    /// Waveform frequency in Hz
    pub frequency_hz: f64,
    /// Deterministic pseudo-noise amplitude in millivolts
    pub noise_mv: f64,
}

impl Default for SimDeviceConfig {
    fn default() -> Self {
        Self {
            chunk_interval_ms: 100,
            values_per_chunk: 5,
            base_mv: 0.0,
            amplitude_mv: 75.0,
            frequency_hz: 0.8,
            noise_mv: 4.0,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Peripheral connection parameters
    pub peripheral: PeripheralConfig,
    /// Live-display look-back horizon in milliseconds
    pub window_horizon_ms: i64,
    /// Override for the session store / config directory
    pub data_dir: Option<PathBuf>,
    /// Simulated peripheral parameters
    pub sim: SimDeviceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            peripheral: PeripheralConfig::default(),
            window_horizon_ms: crate::pipeline::window::DEFAULT_HORIZON_MS,
            data_dir: None,
            sim: SimDeviceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Platform data directory for config and session store
    pub fn default_data_dir() -> PathBuf {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_ID)
    }

    /// Effective data directory, honoring the `data_dir` override
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Load the config from the default location, falling back to defaults
    /// if the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        let path = Self::default_data_dir().join(CONFIG_FILE);
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("no config at {:?} ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load the config from an explicit path
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| PlantSenseError::Config(format!("{}: {e}", path.display())))
    }

    /// Save the config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = Self::default_data_dir();
        std::fs::create_dir_all(&dir)?;
        let text = toml::to_string_pretty(self)
            .map_err(|e| PlantSenseError::Config(e.to_string()))?;
        std::fs::write(dir.join(CONFIG_FILE), text)?;
        Ok(())
    }
}
