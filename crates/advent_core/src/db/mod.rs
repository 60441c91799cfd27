//! Memories store: connection bootstrap and schema.
//!
//! The store is a single SQLite file (or `:memory:`). Every connection
//! handed out by this module has foreign keys on, so deleting a memory
//! removes its blocks, and has been migrated and verified against
//! [`migrations::latest_version`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_store};

pub type DbResult<T> = Result<T, DbError>;

/// Store bootstrap or query failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file carries a schema version this build does not know.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// A table of an applied schema step is absent.
    MissingTable { table: &'static str, version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "memories store is at schema version {found}; this build supports up to {supported}"
            ),
            Self::MissingTable { table, version } => write!(
                f,
                "memories store is missing table `{table}` from schema version {version}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
