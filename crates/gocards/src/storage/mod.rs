//! Storage layer for gocards.
//!
//! This module provides the `SQLite`-backed [`ProgressStore`]. The contract
//! mirrors the trait: saving replaces the whole studied set atomically, and
//! loading never fails outward. Unreadable databases and corrupt rows load
//! as absent progress, so the worst outcome of a bad database is a fresh
//! start.

mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::progress::{ProgressStore, StudyProgress};

/// `SQLite`-backed store for studied-card progress.
#[derive(Debug)]
pub struct SqliteProgressStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteProgressStore {
    /// Open or create a progress database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails. Callers fall back to in-memory progress.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("opening progress database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL keeps a reader (e.g. `gocards stats`) from blocking a running session.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        schema::initialize_schema(&conn)?;

        info!("progress database ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all usable progress rows.
    ///
    /// Individually corrupt rows are skipped with a warning; only a failing
    /// query surfaces as an error.
    fn load_rows(&self) -> Result<StudyProgress> {
        let mut stmt = self
            .conn
            .prepare("SELECT card_id, studied_at FROM progress")?;
        let rows = stmt.query_map([], |row| {
            let card_id: i64 = row.get(0)?;
            let studied_at: String = row.get(1)?;
            Ok((card_id, studied_at))
        })?;

        let mut progress = StudyProgress::new();
        for row in rows {
            let (raw_id, raw_at) = match row {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("skipping unreadable progress row: {e}");
                    continue;
                }
            };
            let Ok(id) = u64::try_from(raw_id) else {
                warn!("skipping progress row with negative card id {raw_id}");
                continue;
            };
            let Ok(at) = DateTime::parse_from_rfc3339(&raw_at) else {
                warn!("skipping progress row for card {id} with bad timestamp {raw_at:?}");
                continue;
            };
            progress.mark(id, at.with_timezone(&Utc));
        }
        Ok(progress)
    }
}

impl ProgressStore for SqliteProgressStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self) -> StudyProgress {
        match self.load_rows() {
            Ok(progress) => {
                debug!("loaded {} studied cards", progress.len());
                progress
            }
            Err(e) => {
                warn!("could not load saved progress, starting fresh: {e}");
                StudyProgress::new()
            }
        }
    }

    fn save(&mut self, progress: &StudyProgress) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM progress", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO progress (card_id, studied_at) VALUES (?1, ?2)")?;
            for (id, at) in progress.iter() {
                let id_i64 = i64::try_from(id).unwrap_or(i64::MAX);
                stmt.execute(params![id_i64, at.to_rfc3339()])?;
            }
        }
        tx.commit()?;
        debug!("saved {} studied cards", progress.len());
        Ok(())
    }
}
