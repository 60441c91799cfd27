//! Editor use-case service.
//!
//! # Responsibility
//! - Accept memory drafts produced by the admin editor.
//! - Validate and persist them as full replacements.
//! - Read the saved page back through the same assembly as retrieval.
//!
//! # Invariants
//! - A save replaces the whole block list in one transaction.
//! - Only recognized block types and enumerated formatting values persist.
//! - Block ids are unique within one memory.

use crate::model::block::{generate_block_id, BlockType};
use crate::model::formatting::{DisplaySettings, FormattingValidationError, TextFormatting};
use crate::model::memory::{DayNumber, Memory};
use crate::repo::memory_repo::{BlockWrite, MemoryRepository, MemoryWrite, RepoError};
use crate::service::memory_service::assemble_memory;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editor payload for one memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDraft {
    pub release_date: NaiveDate,
    #[serde(default)]
    pub display_settings: DisplaySettings,
    #[serde(default)]
    pub blocks: Vec<BlockDraft>,
}

/// Editor payload for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDraft {
    /// Kept when present; generated otherwise.
    #[serde(default)]
    pub id: Option<String>,
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub formatting: TextFormatting,
    /// Defaults to the block's position in the draft.
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl BlockDraft {
    pub fn new(block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            id: None,
            block_type,
            content: content.into(),
            formatting: TextFormatting::default(),
            sort_order: None,
        }
    }
}

/// Service error for editor use-cases.
#[derive(Debug)]
pub enum EditorError {
    /// Day numbers start at 1.
    InvalidDay(DayNumber),
    /// Block tag outside the recognized set.
    UnknownBlockType(String),
    /// Two blocks of one draft share an id.
    DuplicateBlockId(String),
    InvalidFormatting(FormattingValidationError),
    /// Target memory does not exist.
    NotFound(DayNumber),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl EditorError {
    /// Whether the error was caused by the submitted draft.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDay(_)
                | Self::UnknownBlockType(_)
                | Self::DuplicateBlockId(_)
                | Self::InvalidFormatting(_)
        )
    }
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDay(day) => write!(f, "invalid day number: {day}"),
            Self::UnknownBlockType(tag) => write!(f, "unknown block type: `{tag}`"),
            Self::DuplicateBlockId(id) => write!(f, "duplicate block id: `{id}`"),
            Self::InvalidFormatting(err) => write!(f, "{err}"),
            Self::NotFound(day) => write!(f, "memory not found: day {day}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent memory state: {details}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFormatting(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(day) => Self::NotFound(day),
            other => Self::Repo(other),
        }
    }
}

impl From<FormattingValidationError> for EditorError {
    fn from(value: FormattingValidationError) -> Self {
        Self::InvalidFormatting(value)
    }
}

/// Editor facade over repository implementations.
pub struct EditorService<R: MemoryRepository> {
    repo: R,
}

impl<R: MemoryRepository> EditorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates or fully replaces the memory for `day`.
    ///
    /// Returns the saved page as retrieval would assemble it in preview mode.
    pub fn save_memory(&self, day: DayNumber, draft: &MemoryDraft) -> Result<Memory, EditorError> {
        let write = build_write(day, draft)?;
        let memory_id = self.repo.save_memory(&write)?;
        info!(
            "event=memory_save module=service status=ok day={day} blocks={}",
            write.blocks.len()
        );

        let row = self
            .repo
            .find_memory(day)?
            .ok_or(EditorError::InconsistentState(
                "saved memory not found in read-back",
            ))?;
        if row.id != memory_id {
            return Err(EditorError::InconsistentState(
                "saved memory id differs in read-back",
            ));
        }
        let block_rows = self.repo.list_blocks(row.id)?;
        Ok(assemble_memory(row, block_rows))
    }

    /// Deletes the memory for `day` together with its blocks.
    pub fn delete_memory(&self, day: DayNumber) -> Result<(), EditorError> {
        self.repo.delete_memory(day)?;
        info!("event=memory_delete module=service status=ok day={day}");
        Ok(())
    }
}

fn build_write(day: DayNumber, draft: &MemoryDraft) -> Result<MemoryWrite, EditorError> {
    if day == 0 {
        return Err(EditorError::InvalidDay(day));
    }
    draft.display_settings.validate()?;

    let mut seen_ids = HashSet::new();
    let mut blocks = Vec::with_capacity(draft.blocks.len());
    for (position, block) in draft.blocks.iter().enumerate() {
        if !block.block_type.is_known() {
            return Err(EditorError::UnknownBlockType(
                block.block_type.as_str().to_string(),
            ));
        }
        block.formatting.validate()?;

        let id = match block.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => generate_block_id(),
        };
        if !seen_ids.insert(id.clone()) {
            return Err(EditorError::DuplicateBlockId(id));
        }

        let sort_order = block
            .sort_order
            .unwrap_or_else(|| i64::try_from(position).unwrap_or(i64::MAX));

        blocks.push(BlockWrite {
            id,
            block_type: block.block_type.as_str().to_string(),
            content: block.content.clone(),
            formatting: encode_json(&block.formatting)?,
            sort_order,
        });
    }

    Ok(MemoryWrite {
        day_number: day,
        release_date: draft.release_date,
        display_settings: encode_json(&draft.display_settings)?,
        blocks,
    })
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, EditorError> {
    serde_json::to_string(value).map_err(|err| {
        EditorError::Repo(RepoError::InvalidData(format!(
            "failed to encode JSON column: {err}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::{build_write, BlockDraft, EditorError, MemoryDraft};
    use crate::model::block::BlockType;
    use chrono::NaiveDate;

    fn draft(blocks: Vec<BlockDraft>) -> MemoryDraft {
        MemoryDraft {
            release_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            display_settings: Default::default(),
            blocks,
        }
    }

    #[test]
    fn positions_fill_missing_sort_order() {
        let mut second = BlockDraft::new(BlockType::Paragraph, "body");
        second.sort_order = Some(10);
        let write = build_write(
            1,
            &draft(vec![BlockDraft::new(BlockType::Title, "hi"), second]),
        )
        .unwrap();

        assert_eq!(write.blocks[0].sort_order, 0);
        assert_eq!(write.blocks[1].sort_order, 10);
        assert_eq!(write.blocks[0].formatting, "{}");
        assert_eq!(write.display_settings, "{}");
    }

    #[test]
    fn rejects_day_zero_and_unknown_types() {
        assert!(matches!(
            build_write(0, &draft(Vec::new())),
            Err(EditorError::InvalidDay(0))
        ));

        let unknown = BlockDraft::new(BlockType::parse("carousel"), "x");
        let err = build_write(1, &draft(vec![unknown])).unwrap_err();
        assert!(matches!(err, EditorError::UnknownBlockType(ref tag) if tag == "carousel"));
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut first = BlockDraft::new(BlockType::Quote, "a");
        first.id = Some("same".to_string());
        let mut second = BlockDraft::new(BlockType::Quote, "b");
        second.id = Some("same".to_string());

        let err = build_write(2, &draft(vec![first, second])).unwrap_err();
        assert!(matches!(err, EditorError::DuplicateBlockId(ref id) if id == "same"));
    }
}
