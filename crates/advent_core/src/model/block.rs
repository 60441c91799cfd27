//! Content block model.
//!
//! # Responsibility
//! - Define the ordered content unit rendered inside one memory page.
//! - Carry unrecognized type tags through retrieval so rendering can skip them.
//!
//! # Invariants
//! - `id` is non-empty once a block leaves the retrieval service.
//! - Blocks of one memory are ordered by `sort_order` ascending.

use super::formatting::TextFormatting;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable block identifier in string form.
pub type BlockId = String;

/// Block type tag as stored in `memory_blocks.block_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Title,
    Paragraph,
    /// Legacy tag for media blocks; rendered exactly like `Media`.
    Image,
    Media,
    Quote,
    Highlight,
    /// Any tag this build does not recognize. Never rendered.
    Unknown(String),
}

impl BlockType {
    /// Parses a stored tag. Matching is exact, as written by the editor.
    pub fn parse(value: &str) -> Self {
        match value {
            "title" => Self::Title,
            "paragraph" => Self::Paragraph,
            "image" => Self::Image,
            "media" => Self::Media,
            "quote" => Self::Quote,
            "highlight" => Self::Highlight,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Paragraph => "paragraph",
            Self::Image => "image",
            Self::Media => "media",
            Self::Quote => "quote",
            Self::Highlight => "highlight",
            Self::Unknown(value) => value.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    pub fn is_media(&self) -> bool {
        matches!(self, Self::Image | Self::Media)
    }
}

impl From<String> for BlockType {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<BlockType> for String {
    fn from(value: BlockType) -> Self {
        value.as_str().to_string()
    }
}

/// One content unit of a memory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    /// Free text for text blocks, a URL for image/media blocks.
    pub content: String,
    #[serde(default)]
    pub formatting: TextFormatting,
    pub sort_order: i64,
}

impl Block {
    /// Creates a block with a freshly generated id and empty formatting.
    pub fn new(block_type: BlockType, content: impl Into<String>, sort_order: i64) -> Self {
        Self {
            id: generate_block_id(),
            block_type,
            content: content.into(),
            formatting: TextFormatting::default(),
            sort_order,
        }
    }
}

/// Generates an identifier for blocks stored without one.
pub fn generate_block_id() -> BlockId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::BlockType;

    #[test]
    fn unknown_tags_round_trip_through_serde() {
        let parsed: BlockType = serde_json::from_str("\"gallery\"").unwrap();
        assert_eq!(parsed, BlockType::Unknown("gallery".to_string()));
        assert!(!parsed.is_known());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"gallery\"");
    }

    #[test]
    fn image_and_media_are_both_media() {
        assert!(BlockType::parse("image").is_media());
        assert!(BlockType::parse("media").is_media());
        assert!(!BlockType::parse("quote").is_media());
    }
}
