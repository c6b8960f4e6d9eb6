use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::repo::RepositoryRecord;
use crate::error::{RepodeckError, Result};

/// Fixed key the registry is stored under.
pub const REGISTRY_KEY: &str = "git-repositories";

/// Persistence port for the registry: read once on open, write the full
/// collection after every mutation.
pub trait RegistryStore {
    /// Load the stored collection. Unreadable or malformed contents yield an
    /// empty collection rather than an error.
    fn load(&self) -> Result<Vec<RepositoryRecord>>;

    /// Replace the stored collection.
    fn save(&mut self, records: &[RepositoryRecord]) -> Result<()>;
}

/// Stores the registry as a JSON array in `<dir>/git-repositories.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{REGISTRY_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_err(&self, source: std::io::Error) -> RepodeckError {
        RepodeckError::Store {
            path: self.path.clone(),
            source,
        }
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<RepositoryRecord>> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no registry yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.store_err(e)),
        };
        Ok(decode_records(&raw))
    }

    fn save(&mut self, records: &[RepositoryRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.store_err(e))?;
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| self.store_err(std::io::Error::other(e)))?;

        // Readers never see a partial array.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| self.store_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.store_err(e))?;
        Ok(())
    }
}

/// In-memory store, mostly for tests. Counts saves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub records: Vec<RepositoryRecord>,
    pub saves: usize,
}

impl RegistryStore for MemoryStore {
    fn load(&self) -> Result<Vec<RepositoryRecord>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[RepositoryRecord]) -> Result<()> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}

/// Decode a persisted registry, failing closed to an empty one.
///
/// A collection with several master flags keeps only the first.
pub fn decode_records(raw: &[u8]) -> Vec<RepositoryRecord> {
    let mut records: Vec<RepositoryRecord> = match serde_json::from_slice(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "stored registry is malformed, starting empty");
            return Vec::new();
        }
    };

    let mut seen_master = false;
    for record in records.iter_mut().filter(|r| r.is_master) {
        if seen_master {
            warn!(id = %record.id, "clearing duplicate master flag");
            record.is_master = false;
        }
        seen_master = true;
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(&dir.path().join("nested"));
        let records = vec![
            RepositoryRecord::new("https://github.com/acme/a", Some("A".into()), true),
            RepositoryRecord::new("https://github.com/acme/b", None, false),
        ];
        store.save(&records).unwrap();

        assert!(store.path().ends_with("git-repositories.json"));
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn malformed_json_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path(), r#"{"not": "an array"}"#).unwrap();
        assert!(store.load().unwrap().is_empty());

        std::fs::write(store.path(), "[{\"id\": 42}]").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn non_utf8_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path(), [0xff, 0xfe, b'[', b']']).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn duplicate_masters_are_repaired() {
        let a = RepositoryRecord::new("a", None, true);
        let b = RepositoryRecord::new("b", None, true);
        let raw = serde_json::to_string(&vec![a.clone(), b.clone()]).unwrap();

        let records = decode_records(raw.as_bytes());
        assert!(records[0].is_master);
        assert!(!records[1].is_master);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::default();
        store.save(&[]).unwrap();
        store.save(&[RepositoryRecord::new("x", None, true)]).unwrap();
        assert_eq!(store.saves, 2);
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
