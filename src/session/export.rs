//! CSV export of recorded sessions
//!
//! Flattens one session (metadata, rebased samples, rebased markers) into
//! a single comma-separated text block: a `key,value` metadata header, a
//! `Samples` section (`t_ms,value_mV`), and a `Markers` section
//! (`t_ms,label`). The layout matches what downstream analysis notebooks
//! already ingest, so it is pinned by tests.

use crate::error::Result;
use crate::session::store::StoredSession;
use chrono::SecondsFormat;
use std::fmt::Write as _;
use std::path::Path;

/// Default export file name for a session id
pub fn default_file_name(id: &str) -> String {
    format!("session-{id}.csv")
}

/// Render one session as a CSV text block
pub fn session_to_csv(session: &StoredSession) -> String {
    let record = &session.record;
    let mut csv = String::new();

    let _ = writeln!(csv, "Session ID,{}", record.id);
    let _ = writeln!(csv, "Title,{}", record.title);
    let _ = writeln!(
        csv,
        "Timestamp,{}",
        record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let _ = writeln!(csv, "Duration,{}", record.duration);
    let _ = writeln!(csv, "Mean (mV),{}", record.avg);
    let _ = writeln!(csv, "Peak (mV),{}", record.peak);
    csv.push('\n');

    csv.push_str("Samples\n");
    csv.push_str("t_ms,value_mV\n");
    for sample in &session.samples {
        let _ = writeln!(csv, "{},{}", sample.t, sample.v);
    }

    csv.push_str("\nMarkers\n");
    csv.push_str("t_ms,label\n");
    for marker in &session.markers {
        let _ = writeln!(csv, "{},{}", marker.t, marker.label);
    }

    csv
}

/// Write a session's CSV rendering to `path`
pub fn write_csv(session: &StoredSession, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, session_to_csv(session))?;
    tracing::info!(id = %session.record.id, path = %path.display(), "session exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::SessionRecord;
    use crate::types::{Marker, Sample};
    use chrono::{DateTime, Utc};

    fn stored() -> StoredSession {
        StoredSession {
            record: SessionRecord {
                id: "1763063928914".to_string(),
                title: "Basil stress test".to_string(),
                timestamp: DateTime::<Utc>::from_timestamp_millis(1_763_063_928_914).unwrap(),
                duration: "2:05".to_string(),
                samples_count: 2,
                avg: 6.0,
                peak: 7.0,
                notes: None,
            },
            samples: vec![Sample::new(0, 5.0), Sample::new(1_000, 7.0)],
            markers: vec![Marker::new(500, "Stimulus")],
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = session_to_csv(&stored());
        let expected = "Session ID,1763063928914\n\
                        Title,Basil stress test\n\
                        Timestamp,2025-11-13T19:58:48.914Z\n\
                        Duration,2:05\n\
                        Mean (mV),6\n\
                        Peak (mV),7\n\
                        \n\
                        Samples\n\
                        t_ms,value_mV\n\
                        0,5\n\
                        1000,7\n\
                        \n\
                        Markers\n\
                        t_ms,label\n\
                        500,Stimulus\n";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_csv_sections_present_without_markers() {
        let mut session = stored();
        session.markers.clear();
        let csv = session_to_csv(&session);
        assert!(csv.contains("\nMarkers\nt_ms,label\n"));
        assert!(csv.ends_with("t_ms,label\n"));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("42"), "session-42.csv");
    }
}
