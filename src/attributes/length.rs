//! Heights and wingspans: feet/inches strings to whole inches and back.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthError {
    #[error("invalid length '{0}' (use 7'0\", 7-0 or 84)")]
    Invalid(String),
    #[error("inches component out of range in '{0}'")]
    InchesOutOfRange(String),
}

/// Parse a user-supplied length: `6'7"`, `6'7`, `7-0` or plain inches like `84`.
pub fn parse_length(raw: &str) -> Result<u32, LengthError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LengthError::Invalid(raw.to_string()));
    }

    let separator = trimmed.find(['\'', '-']);
    let Some(idx) = separator else {
        return trimmed
            .parse::<u32>()
            .map_err(|_| LengthError::Invalid(raw.to_string()));
    };

    let feet = trimmed[..idx]
        .trim()
        .parse::<u32>()
        .map_err(|_| LengthError::Invalid(raw.to_string()))?;
    let inches_part = trimmed[idx + 1..]
        .trim()
        .trim_end_matches(['"', '\''])
        .trim();
    let inches = if inches_part.is_empty() {
        0
    } else {
        inches_part
            .parse::<u32>()
            .map_err(|_| LengthError::Invalid(raw.to_string()))?
    };
    if inches >= 12 {
        return Err(LengthError::InchesOutOfRange(raw.to_string()));
    }
    feet.checked_mul(12)
        .and_then(|total| total.checked_add(inches))
        .ok_or_else(|| LengthError::Invalid(raw.to_string()))
}

/// Catalog height bound (`6'3`). Empty or malformed cells mean "no bound" and yield 0.
pub fn parse_catalog_height(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.contains('\'') {
        return 0;
    }
    parse_length(trimmed).unwrap_or(0)
}

/// Format whole inches as `6'7"`.
pub fn format_length(inches: u32) -> String {
    format!("{}'{}\"", inches / 12, inches % 12)
}
