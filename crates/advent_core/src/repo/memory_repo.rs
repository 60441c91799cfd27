//! Memory repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load memory rows and their block rows as stored, JSON columns untouched.
//! - Replace a memory and its full block list atomically.
//!
//! # Invariants
//! - Block rows are returned ordered by `sort_order ASC`, insertion order on
//!   ties.
//! - A memory without blocks yields an empty block list, never a sentinel row.
//! - Read paths reject unparseable release dates instead of masking them.

use crate::db::DbError;
use crate::model::memory::{format_release_date, parse_release_date, DayNumber};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MEMORY_SELECT_SQL: &str = "SELECT
    id,
    day_number,
    release_date,
    display_settings
FROM memories";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for memory persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(DayNumber),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(day) => write!(f, "memory not found: day {day}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memory data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Stored `memories` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub id: i64,
    pub day_number: DayNumber,
    pub release_date: NaiveDate,
    /// Raw JSON text, decoded by the service layer.
    pub display_settings: Option<String>,
}

/// Stored `memory_blocks` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub id: Option<String>,
    pub block_type: Option<String>,
    pub content: String,
    /// Raw JSON text, decoded by the service layer.
    pub formatting: Option<String>,
    pub sort_order: i64,
}

/// Full replacement payload for one memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWrite {
    pub day_number: DayNumber,
    pub release_date: NaiveDate,
    pub display_settings: String,
    pub blocks: Vec<BlockWrite>,
}

/// One block inside a [`MemoryWrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWrite {
    pub id: String,
    pub block_type: String,
    pub content: String,
    pub formatting: String,
    pub sort_order: i64,
}

/// Repository interface for memory pages.
pub trait MemoryRepository {
    /// Finds the memory row for one day.
    fn find_memory(&self, day: DayNumber) -> RepoResult<Option<MemoryRow>>;
    /// Lists block rows of one memory in display order.
    fn list_blocks(&self, memory_id: i64) -> RepoResult<Vec<BlockRow>>;
    /// Lists all memory rows ordered by day.
    fn list_memories(&self) -> RepoResult<Vec<MemoryRow>>;
    /// Upserts the memory row and replaces all of its blocks in one
    /// transaction. Returns the memory row id.
    fn save_memory(&self, memory: &MemoryWrite) -> RepoResult<i64>;
    /// Deletes one memory and, through the cascade, its blocks.
    fn delete_memory(&self, day: DayNumber) -> RepoResult<()>;
}

/// SQLite-backed memory repository.
pub struct SqliteMemoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoryRepository for SqliteMemoryRepository<'_> {
    fn find_memory(&self, day: DayNumber) -> RepoResult<Option<MemoryRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORY_SELECT_SQL}
             WHERE day_number = ?1;"
        ))?;

        let mut rows = stmt.query(params![day])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memory_row(row)?));
        }

        Ok(None)
    }

    fn list_blocks(&self, memory_id: i64) -> RepoResult<Vec<BlockRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                block_type,
                content,
                formatting,
                sort_order
             FROM memory_blocks
             WHERE memory_id = ?1
             ORDER BY sort_order ASC, rowid ASC;",
        )?;

        let mut rows = stmt.query(params![memory_id])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            blocks.push(BlockRow {
                id: row.get("id")?,
                block_type: row.get("block_type")?,
                content: row.get::<_, Option<String>>("content")?.unwrap_or_default(),
                formatting: row.get("formatting")?,
                sort_order: row.get("sort_order")?,
            });
        }

        Ok(blocks)
    }

    fn list_memories(&self) -> RepoResult<Vec<MemoryRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORY_SELECT_SQL}
             ORDER BY day_number ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut memories = Vec::new();
        while let Some(row) = rows.next()? {
            memories.push(parse_memory_row(row)?);
        }

        Ok(memories)
    }

    fn save_memory(&self, memory: &MemoryWrite) -> RepoResult<i64> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO memories (day_number, release_date, display_settings)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(day_number) DO UPDATE SET
                release_date = excluded.release_date,
                display_settings = excluded.display_settings;",
            params![
                memory.day_number,
                format_release_date(memory.release_date),
                memory.display_settings.as_str(),
            ],
        )?;

        let memory_id = memory_id_in_tx(&tx, memory.day_number)?
            .ok_or(RepoError::NotFound(memory.day_number))?;

        tx.execute(
            "DELETE FROM memory_blocks WHERE memory_id = ?1;",
            params![memory_id],
        )?;

        for block in &memory.blocks {
            tx.execute(
                "INSERT INTO memory_blocks (
                    id,
                    memory_id,
                    block_type,
                    content,
                    formatting,
                    sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    block.id.as_str(),
                    memory_id,
                    block.block_type.as_str(),
                    block.content.as_str(),
                    block.formatting.as_str(),
                    block.sort_order,
                ],
            )?;
        }

        tx.commit()?;
        Ok(memory_id)
    }

    fn delete_memory(&self, day: DayNumber) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memories WHERE day_number = ?1;", params![day])?;

        if changed == 0 {
            return Err(RepoError::NotFound(day));
        }

        Ok(())
    }
}

fn memory_id_in_tx(tx: &Transaction<'_>, day: DayNumber) -> RepoResult<Option<i64>> {
    let id = tx
        .query_row(
            "SELECT id FROM memories WHERE day_number = ?1;",
            params![day],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

fn parse_memory_row(row: &Row<'_>) -> RepoResult<MemoryRow> {
    let day_value: i64 = row.get("day_number")?;
    let day_number = DayNumber::try_from(day_value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid day number `{day_value}` in memories.day_number"
        ))
    })?;

    let date_text: String = row.get("release_date")?;
    let release_date = parse_release_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid release date `{date_text}` in memories.release_date"
        ))
    })?;

    Ok(MemoryRow {
        id: row.get("id")?,
        day_number,
        release_date,
        display_settings: row.get("display_settings")?,
    })
}
