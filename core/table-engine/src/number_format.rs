//! FILENAME: core/table-engine/src/number_format.rs
//! PURPOSE: Number formatting and parsing for numeric columns.
//! CONTEXT: Converts raw numeric values to display strings using the
//! engine locale (grouping and decimal separators), and parses user input
//! back into numbers.

use serde::{Deserialize, Serialize};

use crate::config::Locale;

/// Where a currency symbol sits relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyPosition {
    Before,
    After,
}

/// Format a number with thousands grouping and at most
/// `locale.max_fraction_digits` fraction digits (trailing zeros trimmed).
pub fn format_grouped(value: f64, locale: &Locale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.prec$}", value, prec = locale.max_fraction_digits as usize);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };
    // -0.0001 rounds to "-0"
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };

    group_plain(trimmed, locale)
}

/// Format a number with a fixed count of decimals and no grouping.
pub fn format_fixed(value: f64, decimal_places: u8, locale: &Locale) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);
    localize_decimal_point(&rounded, locale)
}

/// Format a number as currency. Negative amounts are shown in parentheses,
/// unless they round to zero.
pub fn format_currency(
    value: f64,
    decimal_places: u8,
    symbol: &str,
    position: CurrencyPosition,
    locale: &Locale,
) -> String {
    let amount = group_plain(&format!("{:.prec$}", value.abs(), prec = decimal_places as usize), locale);
    let negative = value < 0.0 && amount.bytes().any(|b| (b'1'..=b'9').contains(&b));

    let body = match position {
        CurrencyPosition::Before => [symbol, amount.as_str()].concat(),
        CurrencyPosition::After => [amount.as_str(), symbol].concat(),
    };
    if negative {
        format!("({})", body)
    } else {
        body
    }
}

/// Parse user input as a number. Thousands separators are ignored and the
/// locale decimal separator is honored. Non-finite results are rejected.
pub fn parse_number(input: &str, locale: &Locale) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut normalized = trimmed.to_string();
    if !locale.thousands_separator.is_empty() {
        normalized = normalized.replace(&locale.thousands_separator, "");
    }
    if locale.decimal_separator != "." {
        normalized = normalized.replace(&locale.decimal_separator, ".");
    }

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Group the integer digits of a plain decimal string ("-1234.5") and
/// swap in the locale decimal separator.
pub fn group_plain(plain: &str, locale: &Locale) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::from(sign);
    for (index, digit) in integer.char_indices() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push_str(&locale.thousands_separator);
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push_str(&locale.decimal_separator);
        grouped.push_str(fraction);
    }
    grouped
}

fn localize_decimal_point(s: &str, locale: &Locale) -> String {
    if locale.decimal_separator == "." {
        s.to_string()
    } else {
        s.replace('.', &locale.decimal_separator)
    }
}
