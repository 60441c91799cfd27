//! Memory retrieval service.
//!
//! # Responsibility
//! - Serve one assembled memory page per day number.
//! - Enforce the release-date gate unless the caller asks for a preview.
//! - Decode stored JSON columns leniently and repair block rows.
//!
//! # Invariants
//! - A locked memory never leaves this service; its blocks are not loaded.
//! - Dates are compared at calendar-day granularity.
//! - Block rows with a missing type are dropped; missing ids are generated.

use crate::model::block::{generate_block_id, Block, BlockType};
use crate::model::formatting::{DisplaySettings, TextFormatting};
use crate::model::memory::{CalendarEntry, DayNumber, Memory};
use crate::repo::memory_repo::{BlockRow, MemoryRepository, MemoryRow, RepoError};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Source of "today" for release gating.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Retrieval failure surfaced to callers.
#[derive(Debug)]
pub enum RetrievalError {
    /// No memory stored for the day.
    NotFound(DayNumber),
    /// Release date is still in the future.
    Locked(DayNumber),
    /// Storage or decoding failure.
    Unexpected(RepoError),
}

impl Display for RetrievalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(day) => write!(f, "memory not found: day {day}"),
            Self::Locked(day) => write!(f, "memory not yet unlocked: day {day}"),
            Self::Unexpected(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RetrievalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unexpected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RetrievalError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(day) => Self::NotFound(day),
            other => Self::Unexpected(other),
        }
    }
}

/// Read-side service for memory pages.
pub struct MemoryService<R: MemoryRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: MemoryRepository> MemoryService<R, SystemClock> {
    /// Creates a service gated on the host's local date.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: MemoryRepository, C: Clock> MemoryService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Loads the page for `day`.
    ///
    /// # Errors
    /// - `NotFound` when no memory is stored for `day`.
    /// - `Locked` when `preview` is false and the release date is after today.
    /// - `Unexpected` on storage failures.
    pub fn get_memory(&self, day: DayNumber, preview: bool) -> Result<Memory, RetrievalError> {
        let row = self
            .repo
            .find_memory(day)?
            .ok_or(RetrievalError::NotFound(day))?;

        if !preview && !is_unlocked(row.release_date, self.clock.today()) {
            info!(
                "event=memory_get module=service status=locked day={day} release_date={}",
                row.release_date
            );
            return Err(RetrievalError::Locked(day));
        }

        let block_rows = self.repo.list_blocks(row.id)?;
        let memory = assemble_memory(row, block_rows);
        debug!(
            "event=memory_get module=service status=ok day={day} preview={preview} blocks={}",
            memory.blocks.len()
        );
        Ok(memory)
    }

    /// Lists every stored day with its unlock state. Never loads blocks.
    pub fn list_calendar(&self) -> Result<Vec<CalendarEntry>, RetrievalError> {
        let today = self.clock.today();
        let entries = self
            .repo
            .list_memories()?
            .into_iter()
            .map(|row| CalendarEntry {
                day_number: row.day_number,
                release_date: row.release_date,
                unlocked: is_unlocked(row.release_date, today),
            })
            .collect();
        Ok(entries)
    }
}

/// Returns whether a memory released on `release_date` is visible on `today`.
pub fn is_unlocked(release_date: NaiveDate, today: NaiveDate) -> bool {
    release_date <= today
}

/// Builds the page from stored rows, decoding JSON and repairing blocks.
pub(crate) fn assemble_memory(row: MemoryRow, block_rows: Vec<BlockRow>) -> Memory {
    let display_settings = DisplaySettings::from_json_text(row.display_settings.as_deref());
    let blocks = block_rows
        .into_iter()
        .filter_map(|block_row| assemble_block(row.day_number, block_row))
        .collect();

    Memory {
        day_number: row.day_number,
        release_date: row.release_date,
        display_settings,
        blocks,
    }
}

fn assemble_block(day: DayNumber, row: BlockRow) -> Option<Block> {
    let block_type = match row.block_type.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => BlockType::parse(tag),
        _ => {
            warn!("event=block_skip module=service status=ok day={day} reason=missing_type");
            return None;
        }
    };

    let id = match row.id {
        Some(id) if !id.trim().is_empty() => id,
        _ => generate_block_id(),
    };

    Some(Block {
        id,
        block_type,
        content: row.content,
        formatting: TextFormatting::from_json_text(row.formatting.as_deref()),
        sort_order: row.sort_order,
    })
}
