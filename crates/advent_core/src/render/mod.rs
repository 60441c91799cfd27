//! Block rendering model.
//!
//! # Responsibility
//! - Map one block plus page settings to a visual node.
//! - Serialize nodes and whole pages to HTML fragments.
//!
//! # Invariants
//! - Rendering is pure: same block and settings, same node.
//! - Unknown block types render nothing and never fail the page.
//! - Only image and video nodes carry sizing.

mod html;
pub mod media;
pub mod style;

pub use media::{infer_media_kind, MediaKind};
pub use style::{resolve_style, type_defaults, ResolvedStyle, StyleKind};

use crate::model::block::Block;
use crate::model::formatting::DisplaySettings;
use crate::model::memory::Memory;

/// Rendered form of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualNode {
    /// `title` blocks.
    Heading { text: String, style: ResolvedStyle },
    /// `paragraph` blocks.
    Text { text: String, style: ResolvedStyle },
    /// `quote` blocks.
    Quote { text: String, style: ResolvedStyle },
    /// `highlight` blocks.
    Panel { text: String, style: ResolvedStyle },
    Image { src: String, style: ResolvedStyle },
    Video { src: String, style: ResolvedStyle },
    /// Fixed-width player; sizing never applies.
    Audio { src: String },
    /// Media URL whose extension is not recognized.
    Unsupported { src: String },
}

impl VisualNode {
    /// Serializes this node as an HTML fragment with escaped text.
    pub fn to_html(&self) -> String {
        html::node_to_html(self)
    }
}

/// Renders one block, or nothing for unrecognized block types.
pub fn render_block(block: &Block, settings: &DisplaySettings) -> Option<VisualNode> {
    let kind = StyleKind::of(&block.block_type)?;
    let style = resolve_style(kind, &block.formatting, settings);
    let text = block.content.clone();

    let node = match kind {
        StyleKind::Title => VisualNode::Heading { text, style },
        StyleKind::Paragraph => VisualNode::Text { text, style },
        StyleKind::Quote => VisualNode::Quote { text, style },
        StyleKind::Highlight => VisualNode::Panel { text, style },
        StyleKind::Media => match infer_media_kind(&block.content) {
            MediaKind::Image => VisualNode::Image { src: text, style },
            MediaKind::Video => VisualNode::Video { src: text, style },
            MediaKind::Audio => VisualNode::Audio { src: text },
            MediaKind::Unsupported => VisualNode::Unsupported { src: text },
        },
    };

    Some(node)
}

/// Renders every block of a memory in order, skipping unknown types.
pub fn render_nodes(memory: &Memory) -> Vec<VisualNode> {
    memory
        .blocks
        .iter()
        .filter_map(|block| render_block(block, &memory.display_settings))
        .collect()
}

/// Renders a memory page body as one HTML fragment.
pub fn render_page(memory: &Memory) -> String {
    render_nodes(memory)
        .iter()
        .map(VisualNode::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(value: &str) -> String {
    html::escape(value)
}
