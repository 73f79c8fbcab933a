//! Form field validation helpers

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::AppError;

const PRICE_ERROR: &str = "Price must be a valid non-negative number.";

/// Largest value that fits `NUMERIC(10, 2)`.
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Trimmed, non-empty text or a validation error carrying `message`.
pub fn required_text(raw: &str, message: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parses an id made of ASCII digits only.
pub fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parses an optional price. Empty input means "no price".
pub fn parse_price(raw: &str) -> Result<Option<Decimal>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let price = Decimal::from_str(trimmed)
        .map_err(|_| AppError::Validation(PRICE_ERROR.to_string()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::Validation(PRICE_ERROR.to_string()));
    }

    let price = price.round_dp(2);
    if price > max_price() {
        return Err(AppError::Validation(PRICE_ERROR.to_string()));
    }
    Ok(Some(price))
}

/// Lower-cased extension after the last dot, if the name has one.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Whether `filename` carries one of the `allowed` extensions (case-insensitive).
pub fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    file_extension(filename)
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false)
}

/// Accepts only same-site absolute paths such as `/store?page=2`.
///
/// Rejects scheme-relative (`//evil.example`) and backslash variants browsers
/// normalize into them.
pub fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(|c| c.is_control())
}
