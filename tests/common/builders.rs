//! Test data builders for creating test objects

use chrono::{DateTime, Utc};
use plantsense_rs::session::types::SessionRecord;

/// Builder for creating test SessionRecords
pub struct SessionRecordBuilder {
    id: String,
    title: String,
    start_ms: i64,
    duration: String,
    samples_count: usize,
    avg: f64,
    peak: f64,
}

impl SessionRecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: "Test Session".to_string(),
            start_ms: 1_700_000_000_000,
            duration: "0:10".to_string(),
            samples_count: 0,
            avg: 0.0,
            peak: 0.0,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn started_at_ms(mut self, start_ms: i64) -> Self {
        self.start_ms = start_ms;
        self
    }

    pub fn samples_count(mut self, count: usize) -> Self {
        self.samples_count = count;
        self
    }

    pub fn summary(mut self, avg: f64, peak: f64) -> Self {
        self.avg = avg;
        self.peak = peak;
        self
    }

    pub fn build(self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            title: self.title,
            timestamp: DateTime::<Utc>::from_timestamp_millis(self.start_ms).unwrap(),
            duration: self.duration,
            samples_count: self.samples_count,
            avg: self.avg,
            peak: self.peak,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_builder() {
        let record = SessionRecordBuilder::new("abc")
            .title("Named")
            .samples_count(7)
            .summary(1.5, 3.0)
            .build();

        assert_eq!(record.id, "abc");
        assert_eq!(record.title, "Named");
        assert_eq!(record.samples_count, 7);
        assert_eq!(record.avg, 1.5);
        assert_eq!(record.peak, 3.0);
    }
}
