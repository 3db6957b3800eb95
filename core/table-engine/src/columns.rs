//! FILENAME: core/table-engine/src/columns.rs
//! Column behaviors - how each semantic type is displayed and edited.
//!
//! A behavior pairs a formatter (value -> display text) with an editor
//! (raw input -> typed value). The registry resolves a behavior per column:
//! the synthetic actions column always gets the actions behavior; for data
//! columns a field-specific override wins, then the behavior registered for
//! the column's semantic type, then the text fallback.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{EngineConfig, Locale};
use crate::dates::{format_with, normalize, parse_date};
use crate::editor::{CellEditor, CommitMode, RawInput};
use crate::error::CoercionError;
use crate::number_format::{format_currency, format_fixed, format_grouped, group_plain, parse_number, CurrencyPosition};
use crate::record::Value;
use crate::schema::{ColumnDefinition, ColumnRole, SemanticType, ACTIONS_FIELD};

/// Formatter + editor pair for one kind of column.
pub trait ColumnBehavior: fmt::Debug + Send + Sync {
    /// Display text for a cell.
    fn format(&self, value: &Value) -> String;

    /// Convert editor input into a value of the column's type.
    /// `current` is the value being replaced.
    fn coerce(&self, current: &Value, input: &RawInput) -> Result<Value, CoercionError>;

    fn commit_mode(&self) -> CommitMode {
        CommitMode::OnBlur
    }

    /// Start an editing session for a cell holding `current`.
    fn begin_edit(&self, current: &Value) -> CellEditor {
        CellEditor::new(self.commit_mode(), current.display_raw())
    }
}

fn text_input(input: &RawInput) -> Result<&str, CoercionError> {
    match input {
        RawInput::Text(text) => Ok(text.as_str()),
        RawInput::Toggle => Err(CoercionError::ToggleUnsupported),
    }
}

// ============================================================================
// BUILT-IN BEHAVIORS
// ============================================================================

/// Raw display, raw commit. Also the fallback for unknown types.
#[derive(Debug, Clone, Default)]
pub struct TextBehavior;

impl ColumnBehavior for TextBehavior {
    fn format(&self, value: &Value) -> String {
        value.display_raw()
    }

    fn coerce(&self, _current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        Ok(Value::Text(text_input(input)?.to_string()))
    }
}

/// Locale-grouped numbers.
#[derive(Debug, Clone)]
pub struct NumberBehavior {
    locale: Locale,
}

impl NumberBehavior {
    pub fn new(locale: Locale) -> Self {
        NumberBehavior { locale }
    }
}

impl ColumnBehavior for NumberBehavior {
    fn format(&self, value: &Value) -> String {
        match value {
            // exact digits for integers beyond f64 precision
            Value::Number(n) if n.is_i64() || n.is_u64() => group_plain(&n.to_string(), &self.locale),
            Value::Number(n) => match n.as_f64() {
                Some(f) => format_grouped(f, &self.locale),
                None => n.to_string(),
            },
            Value::Text(s) => match parse_number(s, &self.locale) {
                Some(n) => format_grouped(n, &self.locale),
                None => s.clone(),
            },
            other => other.display_raw(),
        }
    }

    fn coerce(&self, _current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        let text = text_input(input)?;
        parse_number(text, &self.locale)
            .map(Value::number)
            .ok_or_else(|| CoercionError::NotANumber(text.to_string()))
    }
}

/// Checked/unchecked glyphs, single-click toggle.
#[derive(Debug, Clone)]
pub struct BooleanBehavior {
    checked: String,
    unchecked: String,
}

impl BooleanBehavior {
    pub fn new(checked: impl Into<String>, unchecked: impl Into<String>) -> Self {
        BooleanBehavior {
            checked: checked.into(),
            unchecked: unchecked.into(),
        }
    }
}

/// Accepts true/false, yes/no, on/off and 1/0 (case-insensitive).
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Text(s) => parse_bool(s).unwrap_or(false),
        Value::Number(_) => value.as_f64().is_some_and(|n| n != 0.0),
        Value::Null | Value::Composite(_) => false,
    }
}

impl ColumnBehavior for BooleanBehavior {
    fn format(&self, value: &Value) -> String {
        if truthy(value) {
            self.checked.clone()
        } else {
            self.unchecked.clone()
        }
    }

    fn coerce(&self, current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        match input {
            RawInput::Toggle => Ok(Value::Bool(!truthy(current))),
            RawInput::Text(text) => parse_bool(text)
                .map(Value::Bool)
                .ok_or_else(|| CoercionError::NotABoolean(text.clone())),
        }
    }

    fn commit_mode(&self) -> CommitMode {
        CommitMode::Immediate
    }
}

/// Locale date display; edits are stored as `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct DateBehavior {
    pattern: String,
}

impl DateBehavior {
    pub fn new(pattern: impl Into<String>) -> Self {
        DateBehavior {
            pattern: pattern.into(),
        }
    }
}

impl ColumnBehavior for DateBehavior {
    fn format(&self, value: &Value) -> String {
        match value.as_str().and_then(parse_date) {
            Some(date) => format_with(date, &self.pattern),
            None => value.display_raw(),
        }
    }

    fn coerce(&self, _current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        let text = text_input(input)?;
        parse_date(text)
            .map(|date| Value::Text(normalize(date)))
            .ok_or_else(|| CoercionError::NotADate(text.to_string()))
    }
}

/// Currency amounts, e.g. a "Balance ($)" column.
#[derive(Debug, Clone)]
pub struct CurrencyBehavior {
    symbol: String,
    decimal_places: u8,
    position: CurrencyPosition,
    locale: Locale,
}

impl CurrencyBehavior {
    pub fn new(symbol: impl Into<String>, decimal_places: u8, position: CurrencyPosition, locale: Locale) -> Self {
        CurrencyBehavior {
            symbol: symbol.into(),
            decimal_places,
            position,
            locale,
        }
    }

    pub fn dollars(locale: Locale) -> Self {
        Self::new("$", 2, CurrencyPosition::Before, locale)
    }
}

impl ColumnBehavior for CurrencyBehavior {
    fn format(&self, value: &Value) -> String {
        match value.as_f64() {
            Some(n) => format_currency(n, self.decimal_places, &self.symbol, self.position, &self.locale),
            None => value.display_raw(),
        }
    }

    fn coerce(&self, _current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        let text = text_input(input)?;
        let stripped = text.trim().replace(self.symbol.trim(), "");
        parse_number(&stripped, &self.locale)
            .map(Value::number)
            .ok_or_else(|| CoercionError::NotANumber(text.to_string()))
    }
}

/// Numbers with a fixed count of decimals, e.g. a score.
#[derive(Debug, Clone)]
pub struct FixedDecimalBehavior {
    decimal_places: u8,
    locale: Locale,
}

impl FixedDecimalBehavior {
    pub fn new(decimal_places: u8, locale: Locale) -> Self {
        FixedDecimalBehavior { decimal_places, locale }
    }
}

impl ColumnBehavior for FixedDecimalBehavior {
    fn format(&self, value: &Value) -> String {
        match value.as_f64() {
            Some(n) => format_fixed(n, self.decimal_places, &self.locale),
            None => value.display_raw(),
        }
    }

    fn coerce(&self, _current: &Value, input: &RawInput) -> Result<Value, CoercionError> {
        let text = text_input(input)?;
        parse_number(text, &self.locale)
            .map(Value::number)
            .ok_or_else(|| CoercionError::NotANumber(text.to_string()))
    }
}

/// Row action buttons. Display only.
#[derive(Debug, Clone, Default)]
pub struct ActionsBehavior;

impl ColumnBehavior for ActionsBehavior {
    fn format(&self, _value: &Value) -> String {
        "Edit | Delete".to_string()
    }

    fn coerce(&self, _current: &Value, _input: &RawInput) -> Result<Value, CoercionError> {
        Err(CoercionError::ReadOnly(ACTIONS_FIELD.to_string()))
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Maps semantic types (and optionally individual fields) to behaviors.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    by_type: FxHashMap<SemanticType, Arc<dyn ColumnBehavior>>,
    by_field: FxHashMap<String, Arc<dyn ColumnBehavior>>,
    actions: Arc<dyn ColumnBehavior>,
    fallback: Arc<dyn ColumnBehavior>,
}

impl ColumnRegistry {
    /// Registry with the built-in behaviors, configured from `config`.
    /// `Unknown` is left unregistered and resolves to the text fallback.
    pub fn new(config: &EngineConfig) -> Self {
        let mut registry = ColumnRegistry {
            by_type: FxHashMap::default(),
            by_field: FxHashMap::default(),
            actions: Arc::new(ActionsBehavior),
            fallback: Arc::new(TextBehavior),
        };
        registry.register(SemanticType::Text, TextBehavior);
        registry.register(SemanticType::Number, NumberBehavior::new(config.locale.clone()));
        registry.register(
            SemanticType::Boolean,
            BooleanBehavior::new(config.checked_glyph.clone(), config.unchecked_glyph.clone()),
        );
        registry.register(SemanticType::Date, DateBehavior::new(config.locale.date_format.clone()));
        registry
    }

    pub fn register(&mut self, semantic_type: SemanticType, behavior: impl ColumnBehavior + 'static) {
        self.by_type.insert(semantic_type, Arc::new(behavior));
    }

    /// Override the behavior of one field regardless of its inferred type.
    pub fn register_field(&mut self, field: impl Into<String>, behavior: impl ColumnBehavior + 'static) {
        self.by_field.insert(field.into(), Arc::new(behavior));
    }

    /// Behavior for a semantic type; unregistered types fall back to text.
    pub fn resolve(&self, semantic_type: SemanticType) -> &dyn ColumnBehavior {
        self.by_type
            .get(&semantic_type)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Behavior for a concrete column: actions column, then field
    /// override, then type.
    pub fn resolve_column(&self, column: &ColumnDefinition) -> &dyn ColumnBehavior {
        if column.role == ColumnRole::Actions {
            return self.actions.as_ref();
        }
        match self.by_field.get(&column.field) {
            Some(behavior) => behavior.as_ref(),
            None => self.resolve(column.semantic_type),
        }
    }
}

impl Default for ColumnRegistry {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
