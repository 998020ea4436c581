//! SQLite-backed settings persistence
//!
//! clipsweep keeps no clipboard history; the only durable state is a tiny
//! key/value settings table.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to the settings database.
///
/// Constructed once at startup and shared by `Arc`; all access goes through
/// the internal mutex. There is deliberately no global instance.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the settings database at the given path.
    pub fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        log::info!("opening settings database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (tests).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), DatabaseError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Save a setting, replacing any previous value.
    pub fn save_setting(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get a setting, or `None` if it was never written.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let value = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    /// Typed helper: boolean setting with a default.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_setting(key) {
            Ok(Some(v)) => v == "true",
            Ok(None) => default,
            Err(e) => {
                log::warn!("failed to read setting {}: {}", key, e);
                default
            }
        }
    }

    pub fn set_bool(&self, key: &str, value: bool) -> Result<(), DatabaseError> {
        self.save_setting(key, if value { "true" } else { "false" })
    }

    /// Typed helper: integer setting with a default. Unparseable values
    /// fall back to the default.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get_setting(key) {
            Ok(Some(v)) => v.parse().unwrap_or(default),
            Ok(None) => default,
            Err(e) => {
                log::warn!("failed to read setting {}: {}", key, e);
                default
            }
        }
    }

    pub fn set_int(&self, key: &str, value: i64) -> Result<(), DatabaseError> {
        self.save_setting(key, &value.to_string())
    }
}

/// Platform data directory for clipsweep (e.g. `~/.local/share/clipsweep`).
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipsweep")
}

/// Default settings database path.
pub fn default_db_path() -> PathBuf {
    data_dir().join("data.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_none_for_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("nope").unwrap(), None);
    }

    #[test]
    fn save_then_get_roundtrips() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting("mode", "1").unwrap();
        assert_eq!(db.get_setting("mode").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn save_replaces_previous_value() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting("mode", "0").unwrap();
        db.save_setting("mode", "1").unwrap();
        assert_eq!(db.get_setting("mode").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn typed_helpers_apply_defaults() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.get_bool("started", false));
        assert!(db.get_bool("started", true));
        assert_eq!(db.get_int("timeout", 30), 30);

        db.set_bool("started", true).unwrap();
        db.set_int("timeout", 5).unwrap();
        assert!(db.get_bool("started", false));
        assert_eq!(db.get_int("timeout", 30), 5);
    }

    #[test]
    fn unparseable_int_falls_back_to_default() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting("timeout", "not a number").unwrap();
        assert_eq!(db.get_int("timeout", 30), 30);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.db");
        let db = Database::open(&path).unwrap();
        db.save_setting("k", "v").unwrap();
        assert!(path.exists());
    }
}
