//! Durable session store
//!
//! A session is persisted as three documents keyed by its id: the metadata
//! record (kept in a single index), the rebased sample series, and the
//! rebased marker list. The three form one logical unit: deletion removes
//! all of them, and a session is only reachable through the index, so a
//! removed index entry makes the children unobservable even before their
//! files are gone.
//!
//! # Implementations
//!
//! - [`JsonFileStore`] - JSON documents under the app data directory:
//!   `sessions.json` (the index), `samples-<id>.json`, `markers-<id>.json`
//! - [`MemoryStore`] - HashMap-backed store for tests and ephemeral use
//!
//! Both refuse to overwrite an existing id: the id generator guarantees
//! process-local uniqueness, so a collision means a broken invariant, not a
//! legitimate update.

use crate::error::{PlantSenseError, Result};
use crate::session::types::SessionRecord;
use crate::types::{Marker, Sample};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One fully loaded session: metadata plus both rebased sequences
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    /// Summary metadata
    pub record: SessionRecord,
    /// Rebased sample series
    pub samples: Vec<Sample>,
    /// Rebased markers
    pub markers: Vec<Marker>,
}

/// Durable mapping from session id to its record, samples, and markers
pub trait SessionStore: Send {
    /// Persist a finalized session as one logical unit.
    ///
    /// Fails with [`PlantSenseError::IdCollision`] if the id already exists;
    /// the existing session is left untouched.
    fn put(&mut self, record: &SessionRecord, samples: &[Sample], markers: &[Marker])
        -> Result<()>;

    /// Load one session, or `None` if the id is unknown
    fn get(&self, id: &str) -> Result<Option<StoredSession>>;

    /// All session records, newest start instant first
    fn list_metadata(&self) -> Result<Vec<SessionRecord>>;

    /// Rename a session's title in place
    fn rename_title(&mut self, id: &str, new_title: &str) -> Result<()>;

    /// Delete a session and both its sequences; no partial state remains
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Sort newest-first by start instant, the order the history view shows
fn sort_newest_first(records: &mut [SessionRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// In-memory store for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: HashMap<String, StoredSession>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn put(
        &mut self,
        record: &SessionRecord,
        samples: &[Sample],
        markers: &[Marker],
    ) -> Result<()> {
        if self.sessions.contains_key(&record.id) {
            return Err(PlantSenseError::IdCollision(record.id.clone()));
        }
        self.sessions.insert(
            record.id.clone(),
            StoredSession {
                record: record.clone(),
                samples: samples.to_vec(),
                markers: markers.to_vec(),
            },
        );
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<StoredSession>> {
        Ok(self.sessions.get(id).cloned())
    }

    fn list_metadata(&self) -> Result<Vec<SessionRecord>> {
        let mut records: Vec<SessionRecord> =
            self.sessions.values().map(|s| s.record.clone()).collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn rename_title(&mut self, id: &str, new_title: &str) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| PlantSenseError::SessionNotFound(id.to_string()))?;
        session.record.title = new_title.to_string();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PlantSenseError::SessionNotFound(id.to_string()))
    }
}

/// JSON-file-backed store under a data directory
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the store documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join("sessions.json")
    }

    fn samples_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("samples-{id}.json"))
    }

    fn markers_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("markers-{id}.json"))
    }

    fn load_index(&self) -> Result<Vec<SessionRecord>> {
        match std::fs::read_to_string(self.index_path()) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_index(&self, records: &[SessionRecord]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        std::fs::write(self.index_path(), text)?;
        Ok(())
    }

    fn read_series<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // An indexed session should always have both children; treat
                // a missing file as an empty series rather than failing the
                // whole load.
                tracing::warn!("missing store document {:?}", path);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for JsonFileStore {
    fn put(
        &mut self,
        record: &SessionRecord,
        samples: &[Sample],
        markers: &[Marker],
    ) -> Result<()> {
        let mut index = self.load_index()?;
        if index.iter().any(|r| r.id == record.id) {
            return Err(PlantSenseError::IdCollision(record.id.clone()));
        }

        // Children first, index last: a session becomes visible only once
        // both sequences are on disk.
        std::fs::write(
            self.samples_path(&record.id),
            serde_json::to_string(samples)?,
        )?;
        std::fs::write(
            self.markers_path(&record.id),
            serde_json::to_string(markers)?,
        )?;
        index.push(record.clone());
        self.save_index(&index)?;

        tracing::debug!(id = %record.id, samples = samples.len(), "session persisted");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<StoredSession>> {
        let index = self.load_index()?;
        let Some(record) = index.into_iter().find(|r| r.id == id) else {
            return Ok(None);
        };
        let samples = self.read_series(&self.samples_path(id))?;
        let markers = self.read_series(&self.markers_path(id))?;
        Ok(Some(StoredSession {
            record,
            samples,
            markers,
        }))
    }

    fn list_metadata(&self) -> Result<Vec<SessionRecord>> {
        let mut records = self.load_index()?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn rename_title(&mut self, id: &str, new_title: &str) -> Result<()> {
        let mut index = self.load_index()?;
        let record = index
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PlantSenseError::SessionNotFound(id.to_string()))?;
        record.title = new_title.to_string();
        self.save_index(&index)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut index = self.load_index()?;
        let before = index.len();
        index.retain(|r| r.id != id);
        if index.len() == before {
            return Err(PlantSenseError::SessionNotFound(id.to_string()));
        }

        // Index first: once the entry is gone the session is unreachable,
        // so a failure between the removals cannot expose partial state.
        self.save_index(&index)?;
        for path in [self.samples_path(id), self.markers_path(id)] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(id, "session deleted");
        Ok(())
    }
}
