//! Memories store schema.
//!
//! Each [`SchemaStep`] is one SQL file plus the tables it must leave
//! behind. Steps run in version order inside a single transaction and
//! the reached version is written to `PRAGMA user_version`. After every
//! open, the tables of all applied steps are checked so that a database
//! stamped with a version but missing its tables is refused instead of
//! failing later on the first memory query.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, OptionalExtension};

/// One schema revision.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStep {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
    /// Tables this step creates; verified on every open.
    pub tables: &'static [&'static str],
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "memories",
        sql: include_str!("0001_memories.sql"),
        tables: &["memories", "memory_blocks"],
    },
    SchemaStep {
        version: 2,
        name: "preferences",
        sql: include_str!("0002_preferences.sql"),
        tables: &["preferences"],
    },
];

/// Schema steps known to this build, oldest first.
pub fn schema_steps() -> &'static [SchemaStep] {
    SCHEMA_STEPS
}

pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the store up to [`latest_version`] and verifies its tables.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `MissingTable` when a table of an applied step is absent.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect::<Vec<_>>();
    if !pending.is_empty() {
        let tx = conn.transaction()?;
        for step in &pending {
            tx.execute_batch(step.sql)?;
            tx.pragma_update(None, "user_version", step.version)?;
            info!(
                "event=db_migrate module=db status=ok version={} step={}",
                step.version, step.name
            );
        }
        tx.commit()?;
    }

    verify_tables(conn)
}

fn verify_tables(conn: &Connection) -> DbResult<()> {
    for step in SCHEMA_STEPS {
        for &table in step.tables {
            let present = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                    [table],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !present {
                return Err(DbError::MissingTable {
                    table,
                    version: step.version,
                });
            }
        }
    }
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
