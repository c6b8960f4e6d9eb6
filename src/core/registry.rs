use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::repo::{RecordId, RepositoryRecord};
use super::store::RegistryStore;
use crate::error::{RepodeckError, Result};

/// Shortest id prefix `resolve` will accept.
const MIN_ID_PREFIX: usize = 4;

/// The ordered collection of repository records.
///
/// Invariant: at most one record has `is_master` set. A mutation becomes
/// visible only after the store accepted it.
pub struct Registry<S: RegistryStore> {
    records: Vec<RepositoryRecord>,
    store: S,
}

impl<S: RegistryStore> Registry<S> {
    /// Load the registry from its store.
    pub fn open(store: S) -> Result<Self> {
        let records = store.load()?;
        debug!(count = records.len(), "registry loaded");
        Ok(Self { records, store })
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&RepositoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The record currently flagged master, if any.
    pub fn master(&self) -> Option<&RepositoryRecord> {
        self.records.iter().find(|r| r.is_master)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Find a record from user input: full id, label (case-insensitive),
    /// unique id prefix, then exact URL.
    pub fn resolve(&self, needle: &str) -> Option<&RepositoryRecord> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }

        if let Ok(id) = needle.parse::<RecordId>() {
            if let Some(r) = self.get(id) {
                return Some(r);
            }
        }

        let by_label = self.records.iter().find(|r| {
            r.label
                .as_deref()
                .is_some_and(|l| !l.is_empty() && l.eq_ignore_ascii_case(needle))
        });
        if by_label.is_some() {
            return by_label;
        }

        if needle.len() >= MIN_ID_PREFIX {
            let lower = needle.to_ascii_lowercase();
            let mut hits = self
                .records
                .iter()
                .filter(|r| r.id.to_string().starts_with(&lower));
            if let (Some(hit), None) = (hits.next(), hits.next()) {
                return Some(hit);
            }
        }

        self.records.iter().find(|r| r.url == needle)
    }

    /// Append a new record. The first record in an empty registry becomes master.
    pub fn add_repository(&mut self, url: &str, label: Option<&str>) -> Result<&RepositoryRecord> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RepodeckError::MissingUrl);
        }

        let record = RepositoryRecord::new(url, label.map(str::to_string), self.records.is_empty());
        info!(id = %record.id, url, label = ?record.label, master = record.is_master, "adding repository");
        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)?;

        Ok(&self.records[self.records.len() - 1])
    }

    /// Flag `id` as master and clear the flag everywhere else.
    ///
    /// Returns `false` without touching anything when `id` is unknown.
    pub fn set_master(&mut self, id: RecordId) -> Result<bool> {
        if self.get(id).is_none() {
            debug!(%id, "set_master on unknown id ignored");
            return Ok(false);
        }

        info!(%id, "setting master repository");
        let next = self
            .records
            .iter()
            .cloned()
            .map(|mut r| {
                r.is_master = r.id == id;
                r
            })
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Stamp `last_pushed = now` on the target. Unknown ids are a no-op.
    pub fn record_push(&mut self, target: RecordId) -> Result<Option<DateTime<Utc>>> {
        let now = Utc::now();
        let Some(pos) = self.records.iter().position(|r| r.id == target) else {
            return Ok(None);
        };
        let mut next = self.records.clone();
        next[pos].last_pushed = Some(now);
        self.commit(next)?;
        Ok(Some(now))
    }

    fn commit(&mut self, next: Vec<RepositoryRecord>) -> Result<()> {
        self.store.save(&next)?;
        self.records = next;
        Ok(())
    }
}
