//! PlantSense-RS - Main Entry Point
//!
//! Command-line surface over the recording core: an interactive `record`
//! loop plus the session-history commands (`list`, `show`, `rename`,
//! `delete`, `export`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use plantsense_rs::session::{export, DEFAULT_SESSION_TITLE};
use plantsense_rs::{AppConfig, JsonFileStore, SessionStore};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "plantsense", version, about = "Recorder for PlantSense bio-signal peripherals")]
struct Cli {
    /// Override the directory holding the config and session store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also write daily-rolling log files into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to the peripheral and record sessions interactively
    Record {
        /// Title for sessions saved during this run
        #[arg(long, default_value = DEFAULT_SESSION_TITLE)]
        title: String,
    },
    /// List stored sessions, newest first
    List,
    /// Show one session's summary and markers
    Show {
        /// Session id (see `list`)
        id: String,
    },
    /// Rename a stored session
    Rename {
        /// Session id
        id: String,
        /// New title
        new_title: String,
    },
    /// Delete a session and all its data
    Delete {
        /// Session id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Export a session as CSV
    Export {
        /// Session id
        id: String,
        /// Output path (defaults to ./session-<id>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_dir.as_deref());

    let mut config = AppConfig::load_or_default();
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    match cli.command {
        Command::Record { title } => cmd_record(&config, &title),
        Command::List => cmd_list(&config),
        Command::Show { id } => cmd_show(&config, &id),
        Command::Rename { id, new_title } => cmd_rename(&config, &id, &new_title),
        Command::Delete { id, yes } => cmd_delete(&config, &id, yes),
        Command::Export { id, out } => cmd_export(&config, &id, out),
    }
}

/// Console logging always; rolling file logging when a directory is given.
/// The returned guard must stay alive for the file writer to flush.
fn init_logging(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,plantsense_rs=debug"));
    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "plantsense.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}

fn open_store(config: &AppConfig) -> Result<JsonFileStore> {
    JsonFileStore::open(config.data_dir())
        .with_context(|| format!("failed to open session store in {:?}", config.data_dir()))
}

#[cfg(feature = "sim-device")]
fn cmd_record(config: &AppConfig, title: &str) -> Result<()> {
    use crossbeam_channel::{select, tick, unbounded, Receiver};
    use plantsense_rs::session::types::format_duration_ms;
    use plantsense_rs::transport::SimTransport;
    use plantsense_rs::types::SystemClock;
    use plantsense_rs::{PlantSenseApp, PlantSenseError};
    use std::sync::Arc;
    use std::time::Duration;

    fn spawn_stdin_reader() -> Receiver<String> {
        let (tx, rx) = unbounded();
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        rx
    }

    let store = Box::new(open_store(config)?);
    let transport = Box::new(SimTransport::new(config.sim.clone()));
    let mut app = PlantSenseApp::new(transport, store, config, Arc::new(SystemClock));

    app.scan_and_connect().context("failed to connect")?;
    println!("Connected. Commands: start | m <label> | stop | quit");

    let events = app.events();
    let stdin_rx = spawn_stdin_reader();
    let ticker = tick(Duration::from_millis(500));

    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => app.handle_event(event),
                Err(_) => break,
            },
            recv(stdin_rx) -> line => {
                let Ok(line) = line else { break };
                let line = line.trim();
                match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
                    ("start", _) => match app.start_recording() {
                        Ok(()) => println!("Recording."),
                        Err(e) => eprintln!("cannot start: {e}"),
                    },
                    ("m" | "marker", label) if !label.is_empty() => {
                        app.add_marker(label);
                        println!("Marker: {label}");
                    }
                    ("stop", _) => match app.stop_and_save(title) {
                        Ok(Some(record)) => println!(
                            "Saved {} ({} samples, {})",
                            record.id, record.samples_count, record.duration
                        ),
                        Ok(None) => println!("No recording active."),
                        Err(PlantSenseError::NothingToSave) => {
                            println!("Nothing to save: no samples were captured.")
                        }
                        Err(e) => return Err(e.into()),
                    },
                    ("quit" | "q" | "exit", _) => break,
                    ("", _) => {}
                    (other, _) => println!("unknown command: {other}"),
                }
            },
            recv(ticker) -> _ => {
                app.pump();
                let value = app
                    .latest_value()
                    .map_or_else(|| "waiting for data".to_string(), |v| format!("{v:.3} mV"));
                if app.is_recording() {
                    print!(
                        "\r[REC {}] {} | {} samples   ",
                        format_duration_ms(app.elapsed_ms()),
                        value,
                        app.recorded_samples()
                    );
                } else {
                    print!("\r[live] {}   ", value);
                }
                let _ = std::io::stdout().flush();
            },
        }
    }

    app.disconnect()?;
    println!("\nDisconnected.");
    Ok(())
}

#[cfg(not(feature = "sim-device"))]
fn cmd_record(_config: &AppConfig, _title: &str) -> Result<()> {
    bail!(
        "no transport backend compiled in; rebuild with `--features sim-device` \
         to record from the simulated peripheral"
    )
}

fn cmd_list(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let records = store.list_metadata()?;
    if records.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {}  {:>6}  {:>6} samples  {}",
            record.id,
            record
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            record.duration,
            record.samples_count,
            record.title
        );
    }
    Ok(())
}

fn cmd_show(config: &AppConfig, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let Some(session) = store.get(id)? else {
        bail!("session not found: {id}");
    };
    let record = &session.record;
    println!("{}  ({})", record.title, record.id);
    println!(
        "  started   {}",
        record
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    );
    println!("  duration  {}", record.duration);
    println!("  samples   {}", record.samples_count);
    println!("  mean      {} mV", record.avg);
    println!("  peak      {} mV", record.peak);
    if let Some(notes) = &record.notes {
        println!("  notes     {notes}");
    }
    if !session.markers.is_empty() {
        println!("  markers:");
        for marker in &session.markers {
            println!("    {:>8} ms  {}", marker.t, marker.label);
        }
    }
    Ok(())
}

fn cmd_rename(config: &AppConfig, id: &str, new_title: &str) -> Result<()> {
    let mut store = open_store(config)?;
    store.rename_title(id, new_title)?;
    println!("Renamed {id} to {new_title:?}");
    Ok(())
}

fn cmd_delete(config: &AppConfig, id: &str, yes: bool) -> Result<()> {
    if !yes {
        print!("Delete session {id} and all its data? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }
    let mut store = open_store(config)?;
    store.delete(id)?;
    println!("Deleted {id}");
    Ok(())
}

fn cmd_export(config: &AppConfig, id: &str, out: Option<PathBuf>) -> Result<()> {
    let store = open_store(config)?;
    let Some(session) = store.get(id)? else {
        bail!("session not found: {id}");
    };
    let path = out.unwrap_or_else(|| PathBuf::from(export::default_file_name(id)));
    export::write_csv(&session, &path)?;
    println!("Exported to {}", path.display());
    Ok(())
}
