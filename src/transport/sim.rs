//! Simulated peripheral for development and testing without hardware
//!
//! Emits the exact text framing a real PlantSense device notifies: chunks of
//! newline-separated lines, each line holding comma-separated millivolt
//! readings. Generation is fully deterministic (fixed waveform plus an LCG
//! pseudo-noise term), so recorded sessions are reproducible run-to-run.
//!
//! To keep the decoder honest, every eighth chunk is fragmented mid-token:
//! the tail bytes are held back and prepended to the next chunk, the same
//! shape a small notification MTU produces on real links.
//!
//! # Enabling
//!
//! Only available when the `sim-device` feature is enabled:
//!
//! ```bash
//! cargo run --features sim-device -- record
//! ```

use crate::config::SimDeviceConfig;
use crate::error::Result;
use crate::transport::{SignalTransport, TransportEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Emit a fragmented chunk once every this many chunks
const FRAGMENT_EVERY: u64 = 8;

/// Simulated sensing peripheral
pub struct SimTransport {
    config: SimDeviceConfig,
    tx: Sender<TransportEvent>,
    rx: Receiver<TransportEvent>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SimTransport {
    /// Create a simulated peripheral with the given signal parameters
    pub fn new(config: SimDeviceConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            tx,
            rx,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl SignalTransport for SimTransport {
    fn open(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.running.store(true, Ordering::SeqCst);

        let config = self.config.clone();
        let tx = self.tx.clone();
        let running = Arc::clone(&self.running);
        let handle = std::thread::Builder::new()
            .name("sim-peripheral".to_string())
            .spawn(move || emit_loop(&config, &tx, &running))
            .map_err(|e| crate::error::PlantSenseError::Transport(e.to_string()))?;

        self.worker = Some(handle);
        tracing::info!("simulated peripheral connected");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        self.running.store(false, Ordering::SeqCst);
        let _ = handle.join();
        let _ = self.tx.send(TransportEvent::Disconnected);
        tracing::info!("simulated peripheral disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.worker.is_some() && self.running.load(Ordering::SeqCst)
    }

    fn events(&self) -> Receiver<TransportEvent> {
        self.rx.clone()
    }
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Worker loop: render one chunk per interval until told to stop
fn emit_loop(config: &SimDeviceConfig, tx: &Sender<TransportEvent>, running: &AtomicBool) {
    let mut generator = WaveformGenerator::new(config.clone());
    let mut carry = String::new();
    let mut chunk_index: u64 = 0;

    while running.load(Ordering::SeqCst) {
        let mut text = std::mem::take(&mut carry);
        text.push_str(&generator.next_chunk());

        chunk_index += 1;
        if chunk_index % FRAGMENT_EVERY == 0 {
            // Cut mid-token; the remainder leads the next notification.
            let split = text.len().saturating_sub(3);
            carry = text.split_off(split);
        }

        if tx.send(TransportEvent::Chunk(text.into_bytes())).is_err() {
            break;
        }
        std::thread::sleep(Duration::from_millis(config.chunk_interval_ms));
    }
}

/// Deterministic millivolt waveform source
struct WaveformGenerator {
    config: SimDeviceConfig,
    sample_index: u64,
    noise_state: u64,
}

impl WaveformGenerator {
    fn new(config: SimDeviceConfig) -> Self {
        Self {
            config,
            sample_index: 0,
            noise_state: 0x853c_49e6_748f_ea9b,
        }
    }

    /// Render one chunk of `values_per_chunk` readings as device text
    fn next_chunk(&mut self) -> String {
        let count = self.config.values_per_chunk.max(1);
        let values: Vec<String> = (0..count).map(|_| format!("{:.3}", self.next_value())).collect();
        let mut line = values.join(",");
        line.push('\n');
        line
    }

    fn next_value(&mut self) -> f64 {
        let dt_secs = self.config.chunk_interval_ms as f64
            / self.config.values_per_chunk.max(1) as f64
            / 1_000.0;
        let t = self.sample_index as f64 * dt_secs;
        self.sample_index += 1;

        let phase = 2.0 * std::f64::consts::PI * self.config.frequency_hz * t;
        self.config.base_mv + self.config.amplitude_mv * phase.sin() + self.next_noise()
    }

    /// LCG-derived noise in [-noise_mv, noise_mv)
    fn next_noise(&mut self) -> f64 {
        self.noise_state = self
            .noise_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let unit = (self.noise_state >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * self.config.noise_mv
    }
}
