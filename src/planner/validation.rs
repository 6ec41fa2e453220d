//! Boundary between raw form text and validated numbers.
//!
//! Every numeric field reaches the pipeline as text. Nothing downstream
//! consumes a string: fields are parsed here and anything unusable becomes
//! an error, which callers turn into "absent".

use crate::error::ParseError;

/// Parse text as a finite number.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ParseError::NotANumber(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(ParseError::NotFinite(trimmed.to_string()));
    }

    Ok(value)
}

/// Parse a physical quantity that must be strictly positive.
///
/// Zero is rejected: a zero weight, height, factor or age is "not entered".
pub fn parse_positive(text: &str) -> Result<f64, ParseError> {
    let value = parse_number(text)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange(text.trim().to_string()))
    }
}

/// Parse a serving count. Zero servings is a legitimate plan entry.
pub fn parse_count(text: &str) -> Result<f64, ParseError> {
    let value = parse_number(text)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange(text.trim().to_string()))
    }
}

/// Parse a whole, strictly positive number of years.
pub fn parse_age(text: &str) -> Result<u32, ParseError> {
    let value = parse_positive(text)?;
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(ParseError::OutOfRange(text.trim().to_string()));
    }
    Ok(value as u32)
}
