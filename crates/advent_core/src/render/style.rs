//! Three-layer style resolution.
//!
//! Layers, lowest to highest: per-kind built-in defaults, block
//! `formatting`, page `display_settings`. Media sizing is the exception:
//! the block's `imageWidth` beats the page's `imageSize`. Media blocks
//! have no defaults but still carry the block's text formatting.
//!
//! Blank override values count as absent, and so do values that would
//! close their CSS declaration (`;`, braces, line breaks).

use crate::model::block::BlockType;
use crate::model::formatting::{is_plain_css_value, DisplaySettings, TextFormatting};

const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// Rendering family of a recognized block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Title,
    Paragraph,
    Quote,
    Highlight,
    Media,
}

impl StyleKind {
    /// Maps a block tag to its family; unknown tags have none.
    pub fn of(block_type: &BlockType) -> Option<Self> {
        match block_type {
            BlockType::Title => Some(Self::Title),
            BlockType::Paragraph => Some(Self::Paragraph),
            BlockType::Quote => Some(Self::Quote),
            BlockType::Highlight => Some(Self::Highlight),
            BlockType::Image | BlockType::Media => Some(Self::Media),
            BlockType::Unknown(_) => None,
        }
    }
}

/// Final inline style of one rendered node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub text_align: Option<String>,
    pub text_decoration: Option<String>,
    pub direction: Option<String>,
    pub line_height: Option<String>,
    pub padding: Option<String>,
    pub border_radius: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ResolvedStyle {
    /// Serializes set properties as a CSS declaration list in fixed order.
    pub fn to_css(&self) -> String {
        let declarations = [
            ("font-family", &self.font_family),
            ("font-size", &self.font_size),
            ("font-weight", &self.font_weight),
            ("font-style", &self.font_style),
            ("color", &self.color),
            ("background-color", &self.background_color),
            ("text-align", &self.text_align),
            ("text-decoration", &self.text_decoration),
            ("direction", &self.direction),
            ("line-height", &self.line_height),
            ("padding", &self.padding),
            ("border-radius", &self.border_radius),
            ("width", &self.width),
            ("height", &self.height),
        ];

        declarations
            .iter()
            .filter_map(|(property, value)| {
                value
                    .as_deref()
                    .map(|value| format!("{property}: {value};"))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Resolves the final style of one block.
pub fn resolve_style(
    kind: StyleKind,
    formatting: &TextFormatting,
    settings: &DisplaySettings,
) -> ResolvedStyle {
    let mut style = type_defaults(kind);

    apply(&mut style.font_family, &formatting.font_family);
    apply(&mut style.font_size, &formatting.font_size);
    apply(&mut style.color, &formatting.color);
    apply(&mut style.background_color, &formatting.background_color);
    apply(&mut style.font_weight, &formatting.font_weight);
    apply(&mut style.font_style, &formatting.font_style);
    apply(&mut style.text_align, &formatting.text_align);
    apply(&mut style.text_decoration, &formatting.text_decoration);
    apply(&mut style.direction, &formatting.direction);

    let page_font_size = match kind {
        StyleKind::Title => &settings.title_font_size,
        StyleKind::Paragraph => &settings.paragraph_font_size,
        StyleKind::Quote => &settings.quote_font_size,
        StyleKind::Highlight => &settings.highlight_font_size,
        StyleKind::Media => {
            apply(&mut style.width, &settings.image_size);
            apply(&mut style.width, &formatting.image_width);
            apply(&mut style.height, &formatting.image_height);
            return style;
        }
    };
    apply(&mut style.font_size, page_font_size);

    style
}

/// Built-in defaults per kind.
pub fn type_defaults(kind: StyleKind) -> ResolvedStyle {
    let text = ResolvedStyle {
        font_family: Some(DEFAULT_FONT_FAMILY.to_string()),
        ..ResolvedStyle::default()
    };

    match kind {
        StyleKind::Title => ResolvedStyle {
            font_size: Some("3rem".to_string()),
            font_weight: Some("bold".to_string()),
            color: Some("#1f2937".to_string()),
            ..text
        },
        StyleKind::Paragraph => ResolvedStyle {
            font_size: Some("1.25rem".to_string()),
            color: Some("#374151".to_string()),
            line_height: Some("1.75".to_string()),
            ..text
        },
        StyleKind::Quote => ResolvedStyle {
            font_size: Some("1.5rem".to_string()),
            font_style: Some("italic".to_string()),
            text_align: Some("center".to_string()),
            color: Some("#4b5563".to_string()),
            ..text
        },
        StyleKind::Highlight => ResolvedStyle {
            background_color: Some("rgba(252, 165, 165, 0.3)".to_string()),
            color: Some("#be185d".to_string()),
            padding: Some("1rem".to_string()),
            border_radius: Some("0.5rem".to_string()),
            ..text
        },
        StyleKind::Media => ResolvedStyle::default(),
    }
}

fn apply(target: &mut Option<String>, layer: &Option<String>) {
    if let Some(value) = layer.as_deref().map(str::trim) {
        if !value.is_empty() && is_plain_css_value(value) {
            *target = Some(value.to_string());
        }
    }
}
