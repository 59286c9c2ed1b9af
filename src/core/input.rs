//! Validation of user-supplied amounts before they reach the engine.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Most fractional digits accepted in a pound amount.
pub const MAX_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("'{0}' is not a valid amount")]
    Invalid(String),
    #[error("'{0}' is negative; enter a non-negative amount")]
    Negative(String),
    #[error("'{0}' has more than 2 decimal places")]
    TooPrecise(String),
    #[error("unknown student loan plan '{0}': expected none, plan_1 or plan_2")]
    UnknownPlan(String),
}

/// Parse an annual pound amount such as `50000`, `£52,000.50` or an empty
/// string (zero).
pub fn parse_amount(s: &str) -> Result<Decimal, InputError> {
    let trimmed = s.trim();
    let cleaned: String = trimmed
        .strip_prefix('£')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return Err(InputError::Invalid(s.to_string()));
    }

    let amount = Decimal::from_str(&cleaned).map_err(|_| InputError::Invalid(s.to_string()))?;
    validate_amount(amount).map_err(|e| match e {
        InputError::Negative(_) => InputError::Negative(s.to_string()),
        InputError::TooPrecise(_) => InputError::TooPrecise(s.to_string()),
        other => other,
    })
}

/// Check an already-parsed amount is non-negative with at most two decimals.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, InputError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(InputError::Negative(amount.to_string()));
    }
    let normalized = amount.normalize();
    if normalized.scale() > MAX_DECIMAL_PLACES {
        return Err(InputError::TooPrecise(amount.to_string()));
    }
    Ok(normalized.abs())
}
