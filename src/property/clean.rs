//! Conversions from the site's Chilean-formatted text to numbers
//!
//! Thousands are separated with `.` and decimals with `,`.

use thiserror::Error;

/// A single label's value failed its conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("unexpected money format: '{0}'")]
    MoneyFormat(String),

    #[error("empty value")]
    Empty,

    #[error("invalid number '{value}': {reason}")]
    Number { value: String, reason: String },
}

/// Parses a currency-prefixed amount, e.g. `"UF 1.234,56"` or `"$ 150.000.000"`
///
/// The value must contain at least two whitespace-separated tokens; the
/// second one is the amount.
pub fn clean_money(text: &str) -> Result<f64, FieldError> {
    let amount = text
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| FieldError::MoneyFormat(text.to_string()))?;
    parse_decimal(amount)
}

/// Parses the leading integer of a value such as `"3 habitaciones"` or `"1.200 m²"`
pub fn clean_integer(text: &str) -> Result<i64, FieldError> {
    let token = first_token(text)?;
    let digits = token.replace('.', "");
    digits.parse::<i64>().map_err(|e| FieldError::Number {
        value: token.to_string(),
        reason: e.to_string(),
    })
}

/// Parses the leading decimal of an area such as `"120,5 m²"`
pub fn clean_area(text: &str) -> Result<f64, FieldError> {
    parse_decimal(first_token(text)?)
}

fn first_token(text: &str) -> Result<&str, FieldError> {
    text.split_whitespace().next().ok_or(FieldError::Empty)
}

fn parse_decimal(token: &str) -> Result<f64, FieldError> {
    let normalized = token.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().map_err(|e| FieldError::Number {
        value: token.to_string(),
        reason: e.to_string(),
    })
}
