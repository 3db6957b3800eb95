//! FILENAME: core/table-engine/src/config.rs
//! PURPOSE: Engine configuration (locale, glyphs, identity and grouping defaults).
//! CONTEXT: Every field has a default, so a host can supply a partial JSON
//! document (or nothing at all).

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::grouping::ExpandState;

/// Locale settings used by number and date formatters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Locale {
    /// Digit grouping separator ("," in en-US)
    pub thousands_separator: String,
    /// Decimal point ("." in en-US)
    pub decimal_separator: String,
    /// strftime pattern for date cells
    pub date_format: String,
    /// Upper bound on fraction digits shown for numbers
    pub max_fraction_digits: u8,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
            max_fraction_digits: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub locale: Locale,
    /// Glyph for a true boolean cell
    pub checked_glyph: String,
    /// Glyph for a false boolean cell
    pub unchecked_glyph: String,
    /// Explicit identity field. When unset: `id` if present, else the first field.
    pub key_field: Option<String>,
    /// State of a group the user has never toggled
    pub default_expand_state: ExpandState,
    /// Append a trailing, read-only "Actions" column
    pub actions_column: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            checked_glyph: "\u{2714}".to_string(),
            unchecked_glyph: "\u{2718}".to_string(),
            key_field: None,
            default_expand_state: ExpandState::Collapsed,
            actions_column: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
