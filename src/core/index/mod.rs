mod types;

pub use types::{SharedRepository, SyncStatus};
use types::RepositoryRow;

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Result;

const SCHEMA_VERSION: i32 = 1;

const SELECT_COLUMNS: &str =
    "SELECT id, url, nickname, last_commit, last_commit_date, last_sync, status FROM repositories";

/// The shared repository table the sync service resolves ids against.
pub struct Index {
    conn: rusqlite::Connection,
}

impl Index {
    /// Open or create the index database at the given path. Enables WAL mode.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                crate::error::RepodeckError::Config(format!(
                    "failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let conn = rusqlite::Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "wal")?;
        let index = Self { conn };
        index.migrate()?;
        Ok(index)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()?;
        let index = Self { conn };
        index.migrate()?;
        Ok(index)
    }

    /// Run schema migrations to latest version.
    pub fn migrate(&self) -> Result<()> {
        let current = self.schema_version();

        if current < 1 {
            self.conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS schema_version (
                    version INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS repositories (
                    id TEXT PRIMARY KEY,
                    url TEXT NOT NULL,
                    nickname TEXT,
                    last_commit TEXT,
                    last_commit_date TEXT,
                    last_sync TEXT,
                    status TEXT NOT NULL DEFAULT 'pending'
                );
                ",
            )?;

            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }

        Ok(())
    }

    fn schema_version(&self) -> i32 {
        self.conn
            .query_row(
                "SELECT version FROM schema_version LIMIT 1",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0)
    }

    /// Insert a repository or update its url and nickname. Sync columns are
    /// left alone on update.
    pub fn upsert_repository(&self, repo: &SharedRepository) -> Result<()> {
        let status = serde_plain::to_string(&repo.status).unwrap_or_else(|_| "pending".into());
        let last_sync = repo.last_sync.map(|dt| dt.to_rfc3339());

        self.conn.execute(
            "INSERT INTO repositories (
                id, url, nickname, last_commit, last_commit_date, last_sync, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                url = excluded.url,
                nickname = excluded.nickname
            ",
            rusqlite::params![
                repo.id,
                repo.url,
                repo.nickname,
                repo.last_commit,
                repo.last_commit_date,
                last_sync,
                status,
            ],
        )?;
        Ok(())
    }

    /// Get a repository by id.
    pub fn get_repository(&self, id: &str) -> Result<Option<SharedRepository>> {
        let result = self.conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id],
            map_row,
        );
        match result {
            Ok(row) => Ok(Some(row.into_repository())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch every repository whose id is in `ids`. Unknown ids are skipped.
    pub fn get_repositories(&self, ids: &[&str]) -> Result<Vec<SharedRepository>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id IN ({placeholders}) ORDER BY id"))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(RepositoryRow::into_repository).collect())
    }

    /// All repositories, ordered by id.
    pub fn list_repositories(&self) -> Result<Vec<SharedRepository>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(RepositoryRow::into_repository).collect())
    }

    /// Store the latest commit for a repository and mark it synced.
    pub fn record_commit(
        &self,
        id: &str,
        sha: &str,
        commit_date: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE repositories
             SET last_commit = ?2, last_commit_date = ?3, last_sync = ?4, status = 'synced'
             WHERE id = ?1",
            rusqlite::params![id, sha, commit_date, at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Mark repositories synced at `at`.
    pub fn mark_synced(&self, ids: &[&str], at: DateTime<Utc>) -> Result<()> {
        let at = at.to_rfc3339();
        for id in ids {
            self.conn.execute(
                "UPDATE repositories SET last_sync = ?2, status = 'synced' WHERE id = ?1",
                rusqlite::params![id, at],
            )?;
        }
        Ok(())
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RepositoryRow> {
    Ok(RepositoryRow {
        id: row.get(0)?,
        url: row.get(1)?,
        nickname: row.get(2)?,
        last_commit: row.get(3)?,
        last_commit_date: row.get(4)?,
        last_sync: row.get(5)?,
        status: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_repo(id: &str, url: &str) -> SharedRepository {
        SharedRepository::new(id, url, Some(format!("{id}-nick")))
    }

    #[test]
    fn open_in_memory_and_migrate() {
        let idx = Index::open_in_memory().unwrap();
        assert_eq!(idx.schema_version(), SCHEMA_VERSION);
        // Migrating twice is harmless.
        idx.migrate().unwrap();
        assert_eq!(idx.schema_version(), SCHEMA_VERSION);
    }

    #[test]
    fn upsert_and_get() {
        let idx = Index::open_in_memory().unwrap();
        idx.upsert_repository(&make_repo("r1", "https://github.com/acme/widget"))
            .unwrap();

        let loaded = idx.get_repository("r1").unwrap().unwrap();
        assert_eq!(loaded.url, "https://github.com/acme/widget");
        assert_eq!(loaded.nickname.as_deref(), Some("r1-nick"));
        assert_eq!(loaded.status, SyncStatus::Pending);
        assert!(loaded.last_sync.is_none());

        assert!(idx.get_repository("missing").unwrap().is_none());
    }

    #[test]
    fn upsert_keeps_sync_columns() {
        let idx = Index::open_in_memory().unwrap();
        let mut repo = make_repo("r1", "https://github.com/acme/widget");
        idx.upsert_repository(&repo).unwrap();
        idx.record_commit("r1", "abc123", Some("2024-01-02T03:04:05Z"), Utc::now())
            .unwrap();

        repo.url = "https://github.com/acme/widget2".into();
        idx.upsert_repository(&repo).unwrap();

        let loaded = idx.get_repository("r1").unwrap().unwrap();
        assert_eq!(loaded.url, "https://github.com/acme/widget2");
        assert_eq!(loaded.last_commit.as_deref(), Some("abc123"));
        assert_eq!(loaded.status, SyncStatus::Synced);
    }

    #[test]
    fn record_commit_sets_fields() {
        let idx = Index::open_in_memory().unwrap();
        idx.upsert_repository(&make_repo("r1", "u")).unwrap();
        let at = Utc::now();
        idx.record_commit("r1", "deadbeef", Some("2024-01-02T03:04:05Z"), at)
            .unwrap();

        let loaded = idx.get_repository("r1").unwrap().unwrap();
        assert_eq!(loaded.last_commit.as_deref(), Some("deadbeef"));
        assert_eq!(loaded.last_commit_date.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(loaded.last_sync.unwrap().timestamp(), at.timestamp());
    }

    #[test]
    fn mark_synced_touches_only_listed() {
        let idx = Index::open_in_memory().unwrap();
        for id in ["a", "b", "c"] {
            idx.upsert_repository(&make_repo(id, "u")).unwrap();
        }
        idx.mark_synced(&["a", "c"], Utc::now()).unwrap();

        let all = idx.list_repositories().unwrap();
        let statuses: Vec<_> = all.iter().map(|r| (r.id.as_str(), r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("a", SyncStatus::Synced),
                ("b", SyncStatus::Pending),
                ("c", SyncStatus::Synced),
            ]
        );
    }

    #[test]
    fn get_repositories_skips_unknown() {
        let idx = Index::open_in_memory().unwrap();
        idx.upsert_repository(&make_repo("a", "u")).unwrap();
        let found = idx.get_repositories(&["a", "zzz"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name(), "a-nick");

        idx.upsert_repository(&make_repo("b", "v")).unwrap();
        let both = idx.get_repositories(&["b", "a", "a"]).unwrap();
        let ids: Vec<_> = both.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(idx.get_repositories(&[]).unwrap().is_empty());
    }

    #[test]
    fn open_on_disk_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("index.db");
        let idx = Index::open(&path).unwrap();
        idx.upsert_repository(&make_repo("a", "u")).unwrap();
        drop(idx);

        let idx = Index::open(&path).unwrap();
        assert!(idx.get_repository("a").unwrap().is_some());
    }
}
