//! `SQLite` schema for the progress database.
//!
//! The schema is tiny: one row per studied card plus a metadata table
//! carrying the schema version, so a future release can migrate old
//! databases instead of guessing.

use rusqlite::Connection;

use crate::error::{Error, Result};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the progress table.
const CREATE_PROGRESS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS progress (
    card_id INTEGER PRIMARY KEY,
    studied_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
const SCHEMA_STATEMENTS: &[&str] = &[CREATE_METADATA_TABLE, CREATE_PROGRESS_TABLE];

/// Initialize the database schema.
///
/// Creates the tables if they don't exist and stamps a fresh database with
/// the current version.
///
/// # Errors
///
/// Returns an error if schema creation fails or the database was written by
/// a newer release with a schema this build does not understand.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version == 0 {
        set_schema_version(conn, CURRENT_VERSION)?;
    } else if version > CURRENT_VERSION {
        return Err(Error::schema(format!(
            "database has schema version {version}, this build supports up to {CURRENT_VERSION}"
        )));
    }

    Ok(())
}

/// Get the schema version recorded in the database.
///
/// Returns 0 if no version is set (fresh database).
fn schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::schema(format!("invalid schema version: {value}"))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
