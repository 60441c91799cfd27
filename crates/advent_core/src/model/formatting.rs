//! Style override payloads stored as JSON text.
//!
//! # Responsibility
//! - Define block-level `TextFormatting` and page-level `DisplaySettings`.
//! - Decode stored JSON leniently: bad input degrades to an empty value.
//! - Validate constrained fields before the editor persists them.
//!
//! # Invariants
//! - Every field is optional; `None` means "inherit from the next layer".
//! - Wire names are camelCase to match the editor payloads.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FONT_WEIGHTS: &[&str] = &["normal", "bold"];
const FONT_STYLES: &[&str] = &["normal", "italic"];
const TEXT_ALIGNS: &[&str] = &["left", "center", "right"];
const TEXT_DECORATIONS: &[&str] = &["none", "underline"];
const DIRECTIONS: &[&str] = &["ltr", "rtl"];

/// Per-block style overrides produced by the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormatting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// `normal` or `bold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// `normal` or `italic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    /// `left`, `center` or `right`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// `none` or `underline`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    /// `ltr` or `rtl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// Media width; wins over `DisplaySettings::image_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<String>,
}

impl TextFormatting {
    /// Decodes a stored `formatting` column.
    ///
    /// Absent, malformed or non-object JSON yields an empty value. Fields
    /// holding non-string JSON values are ignored one by one.
    pub fn from_json_text(raw: Option<&str>) -> Self {
        let Some(fields) = json_object(raw, "formatting") else {
            return Self::default();
        };

        Self {
            font_family: string_field(&fields, "fontFamily"),
            font_size: string_field(&fields, "fontSize"),
            color: string_field(&fields, "color"),
            background_color: string_field(&fields, "backgroundColor"),
            font_weight: string_field(&fields, "fontWeight"),
            font_style: string_field(&fields, "fontStyle"),
            text_align: string_field(&fields, "textAlign"),
            text_decoration: string_field(&fields, "textDecoration"),
            direction: string_field(&fields, "direction"),
            image_width: string_field(&fields, "imageWidth"),
            image_height: string_field(&fields, "imageHeight"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks enumerated fields against their allowed values and free-text
    /// fields for characters that would end their CSS declaration.
    ///
    /// Blank values are accepted and treated as absent at render time.
    pub fn validate(&self) -> Result<(), FormattingValidationError> {
        check_plain("fontFamily", self.font_family.as_deref())?;
        check_plain("fontSize", self.font_size.as_deref())?;
        check_plain("color", self.color.as_deref())?;
        check_plain("backgroundColor", self.background_color.as_deref())?;
        check_plain("imageWidth", self.image_width.as_deref())?;
        check_plain("imageHeight", self.image_height.as_deref())?;
        check_allowed("fontWeight", self.font_weight.as_deref(), FONT_WEIGHTS)?;
        check_allowed("fontStyle", self.font_style.as_deref(), FONT_STYLES)?;
        check_allowed("textAlign", self.text_align.as_deref(), TEXT_ALIGNS)?;
        check_allowed(
            "textDecoration",
            self.text_decoration.as_deref(),
            TEXT_DECORATIONS,
        )?;
        check_allowed("direction", self.direction.as_deref(), DIRECTIONS)?;
        Ok(())
    }
}

/// Page-wide style defaults attached to one memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Default width for image/video blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_font_size: Option<String>,
}

impl DisplaySettings {
    /// Decodes a stored `display_settings` column with the same leniency as
    /// [`TextFormatting::from_json_text`].
    pub fn from_json_text(raw: Option<&str>) -> Self {
        let Some(fields) = json_object(raw, "display_settings") else {
            return Self::default();
        };

        Self {
            image_size: string_field(&fields, "imageSize"),
            title_font_size: string_field(&fields, "titleFontSize"),
            paragraph_font_size: string_field(&fields, "paragraphFontSize"),
            quote_font_size: string_field(&fields, "quoteFontSize"),
            highlight_font_size: string_field(&fields, "highlightFontSize"),
        }
    }

    /// Checks every setting for characters that would end its CSS declaration.
    pub fn validate(&self) -> Result<(), FormattingValidationError> {
        check_plain("imageSize", self.image_size.as_deref())?;
        check_plain("titleFontSize", self.title_font_size.as_deref())?;
        check_plain("paragraphFontSize", self.paragraph_font_size.as_deref())?;
        check_plain("quoteFontSize", self.quote_font_size.as_deref())?;
        check_plain("highlightFontSize", self.highlight_font_size.as_deref())?;
        Ok(())
    }
}

/// Rejected formatting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingValidationError {
    pub field: &'static str,
    pub value: String,
}

impl Display for FormattingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value `{}`", self.field, self.value)
    }
}

impl Error for FormattingValidationError {}

/// Whether `value` fits inside one CSS declaration without opening another.
pub fn is_plain_css_value(value: &str) -> bool {
    !value
        .chars()
        .any(|ch| matches!(ch, ';' | '{' | '}' | '\n' | '\r'))
}

fn check_plain(field: &'static str, value: Option<&str>) -> Result<(), FormattingValidationError> {
    match value {
        Some(value) if !is_plain_css_value(value) => Err(FormattingValidationError {
            field,
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_allowed(
    field: &'static str,
    value: Option<&str>,
    allowed: &[&str],
) -> Result<(), FormattingValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(value) if allowed.contains(&value) => Ok(()),
        Some(value) => Err(FormattingValidationError {
            field,
            value: value.to_string(),
        }),
    }
}

fn json_object(raw: Option<&str>, column: &str) -> Option<Map<String, Value>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => Some(fields),
        Ok(Value::Null) => None,
        Ok(_) => {
            warn!("event=json_decode module=model status=error column={column} error=not_an_object");
            None
        }
        Err(err) => {
            warn!("event=json_decode module=model status=error column={column} error={err}");
            None
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::{DisplaySettings, TextFormatting};

    #[test]
    fn malformed_formatting_decodes_to_empty() {
        assert!(TextFormatting::from_json_text(Some("{not json")).is_empty());
        assert!(TextFormatting::from_json_text(Some("[1, 2]")).is_empty());
        assert!(TextFormatting::from_json_text(Some("null")).is_empty());
        assert!(TextFormatting::from_json_text(None).is_empty());
    }

    #[test]
    fn non_string_fields_are_skipped_individually() {
        let formatting =
            TextFormatting::from_json_text(Some(r##"{"fontSize": 16, "color": "#ff0000"}"##));
        assert_eq!(formatting.font_size, None);
        assert_eq!(formatting.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn display_settings_read_camel_case_keys() {
        let settings = DisplaySettings::from_json_text(Some(
            r#"{"imageSize": "50%", "titleFontSize": "4rem", "unknown": "x"}"#,
        ));
        assert_eq!(settings.image_size.as_deref(), Some("50%"));
        assert_eq!(settings.title_font_size.as_deref(), Some("4rem"));
        assert_eq!(settings.paragraph_font_size, None);
    }

    #[test]
    fn validate_rejects_values_that_end_the_declaration() {
        let formatting = TextFormatting {
            color: Some("red; position: fixed".to_string()),
            ..TextFormatting::default()
        };
        assert_eq!(formatting.validate().unwrap_err().field, "color");

        let settings = DisplaySettings {
            quote_font_size: Some("2rem}".to_string()),
            ..DisplaySettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().field, "quoteFontSize");

        let plain = TextFormatting {
            font_family: Some("'Comic Sans MS', cursive".to_string()),
            background_color: Some("rgba(0, 0, 0, 0.5)".to_string()),
            ..TextFormatting::default()
        };
        assert!(plain.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_enumerated_values() {
        let formatting = TextFormatting {
            text_align: Some("justify".to_string()),
            ..TextFormatting::default()
        };
        let err = formatting.validate().unwrap_err();
        assert_eq!(err.field, "textAlign");
        assert_eq!(err.value, "justify");

        let blank = TextFormatting {
            font_weight: Some(String::new()),
            ..TextFormatting::default()
        };
        assert!(blank.validate().is_ok());
    }
}
