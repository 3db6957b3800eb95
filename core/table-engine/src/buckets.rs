//! FILENAME: core/table-engine/src/buckets.rs
//! PURPOSE: Ready-made group key functions.
//! CONTEXT: `DateBucketer` sorts rows into due-date style buckets relative to
//! a fixed reference day; `FieldValueKey` groups by a field's raw text.
//! Both are pure and total: every record gets a key.

use chrono::{Datelike, Local, NaiveDate};

use crate::dates::parse_date;
use crate::grouping::{GroupKey, GroupKeyFn};
use crate::record::Record;

pub const PAST_DUE: &str = "Past Due";
pub const TODAY: &str = "Today";
pub const THIS_WEEK: &str = "This Week";
pub const NEXT_WEEK: &str = "Next Week";
pub const THIS_MONTH: &str = "This Month";
pub const NEXT_MONTH: &str = "Next Month";
pub const LATER: &str = "Later";

/// Buckets in evaluation order.
pub const DATE_BUCKETS: [&str; 7] = [PAST_DUE, TODAY, THIS_WEEK, NEXT_WEEK, THIS_MONTH, NEXT_MONTH, LATER];

/// Label used by `FieldValueKey` for null/missing values.
pub const BLANK: &str = "(blank)";

/// Buckets a date field against a reference day. Only calendar days are
/// compared, so any timestamp on the reference day lands in "Today".
#[derive(Debug, Clone)]
pub struct DateBucketer {
    field: String,
    today: NaiveDate,
}

impl DateBucketer {
    pub fn new(field: impl Into<String>, today: NaiveDate) -> Self {
        DateBucketer {
            field: field.into(),
            today,
        }
    }

    /// Reference day taken from the local clock, once, at construction.
    pub fn from_local_today(field: impl Into<String>) -> Self {
        Self::new(field, Local::now().date_naive())
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// First matching bucket for `date`.
    pub fn bucket(&self, date: NaiveDate) -> &'static str {
        let days = (date - self.today).num_days();
        if days < 0 {
            return PAST_DUE;
        }
        if days == 0 {
            return TODAY;
        }
        if days <= 7 {
            return THIS_WEEK;
        }
        if days <= 14 {
            return NEXT_WEEK;
        }
        if date.year() == self.today.year() && date.month() == self.today.month() {
            return THIS_MONTH;
        }
        let (next_year, next_month) = if self.today.month() == 12 {
            (self.today.year() + 1, 1)
        } else {
            (self.today.year(), self.today.month() + 1)
        };
        if date.year() == next_year && date.month() == next_month {
            return NEXT_MONTH;
        }
        LATER
    }
}

impl GroupKeyFn for DateBucketer {
    /// Records without a parseable date fall into "Later".
    fn key(&self, record: &Record) -> GroupKey {
        record
            .get(&self.field)
            .and_then(|value| value.as_str())
            .and_then(parse_date)
            .map(|date| self.bucket(date))
            .unwrap_or(LATER)
            .to_string()
    }
}

/// Groups by the raw text of one field.
#[derive(Debug, Clone)]
pub struct FieldValueKey {
    field: String,
}

impl FieldValueKey {
    pub fn new(field: impl Into<String>) -> Self {
        FieldValueKey { field: field.into() }
    }
}

impl GroupKeyFn for FieldValueKey {
    fn key(&self, record: &Record) -> GroupKey {
        match record.get(&self.field).map(|value| value.display_raw()) {
            Some(text) if !text.is_empty() => text,
            _ => BLANK.to_string(),
        }
    }
}

/// Everything in one group.
#[derive(Debug, Clone)]
pub struct SingleGroup {
    label: String,
}

impl SingleGroup {
    pub fn new(label: impl Into<String>) -> Self {
        SingleGroup { label: label.into() }
    }
}

impl Default for SingleGroup {
    fn default() -> Self {
        Self::new("All")
    }
}

impl GroupKeyFn for SingleGroup {
    fn key(&self, _record: &Record) -> GroupKey {
        self.label.clone()
    }
}
