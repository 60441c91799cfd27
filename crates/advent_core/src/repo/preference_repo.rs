//! SQLite-backed preference store.
//!
//! # Responsibility
//! - Persist small string lists (e.g. recent editor colors) under a key.
//!
//! # Invariants
//! - Values are stored as JSON arrays of strings.
//! - A stored value that no longer decodes reads back as an empty list.

use crate::repo::memory_repo::{RepoError, RepoResult};
use crate::service::color_service::PreferenceStore;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

/// Preference store over the `preferences` table.
pub struct SqlitePreferenceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceStore for SqlitePreferenceStore<'_> {
    fn load(&self, key: &str) -> RepoResult<Vec<String>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&stored) {
            Ok(values) => Ok(values),
            Err(err) => {
                warn!(
                    "event=preference_decode module=repo status=error key={key} error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, key: &str, values: &[String]) -> RepoResult<()> {
        let encoded = serde_json::to_string(values).map_err(|err| {
            RepoError::InvalidData(format!(
                "failed to encode preference `{key}`: {err}"
            ))
        })?;

        self.conn.execute(
            "INSERT INTO preferences (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, encoded],
        )?;

        Ok(())
    }
}
