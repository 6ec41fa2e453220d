//! Imperial to metric conversions for form inputs, and back for display.
//!
//! Inputs are optional and a zero value counts as missing, so `6 ft 0 in`
//! does not convert. Callers that need a zero to mean zero must handle it
//! before calling.

use crate::planner::constants::{FT_TO_INCHES, INCHES_TO_CM, LBS_TO_KGS};

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Round to two decimal places.
pub fn round_2dp(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Height in centimetres from feet and inches.
pub fn feet_and_inches_to_cm(feet: Option<f64>, inches: Option<f64>) -> Option<f64> {
    let feet = present(feet)?;
    let inches = present(inches)?;
    Some((feet * FT_TO_INCHES + inches) * INCHES_TO_CM)
}

/// Display variant of [`feet_and_inches_to_cm`].
pub fn feet_and_inches_to_cm_rounded(feet: Option<f64>, inches: Option<f64>) -> Option<f64> {
    feet_and_inches_to_cm(feet, inches).map(round_2dp)
}

/// Weight in kilograms from pounds.
pub fn lbs_to_kg(lbs: Option<f64>) -> Option<f64> {
    present(lbs).map(|lbs| lbs * LBS_TO_KGS)
}

/// Display variant of [`lbs_to_kg`].
pub fn lbs_to_kg_rounded(lbs: Option<f64>) -> Option<f64> {
    lbs_to_kg(lbs).map(round_2dp)
}

/// Pounds from kilograms, rounded to two decimals for display.
pub fn kg_to_lbs(kg: f64) -> f64 {
    round_2dp(kg / LBS_TO_KGS)
}

/// Whole feet and remaining inches (one decimal) from centimetres.
pub fn cm_to_feet_and_inches(cm: f64) -> (u32, f64) {
    let total_inches = round_half_up(cm / INCHES_TO_CM * 10.0) / 10.0;
    let feet = (total_inches / FT_TO_INCHES).floor();
    let inches = round_half_up((total_inches - feet * FT_TO_INCHES) * 10.0) / 10.0;
    (feet as u32, inches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;

    #[test]
    fn test_feet_and_inches_to_cm() {
        let cm = feet_and_inches_to_cm(Some(5.0), Some(11.0)).unwrap();
        assert_float_absolute_eq!(cm, 180.34, 1e-9);
        assert_eq!(feet_and_inches_to_cm_rounded(Some(5.0), Some(10.0)), Some(177.8));
    }

    #[test]
    fn test_zero_counts_as_missing() {
        assert_eq!(feet_and_inches_to_cm(Some(6.0), Some(0.0)), None);
        assert_eq!(feet_and_inches_to_cm(None, Some(4.0)), None);
        assert_eq!(lbs_to_kg(Some(0.0)), None);
        assert_eq!(lbs_to_kg(None), None);
    }

    #[test]
    fn test_lbs_to_kg() {
        let kg = lbs_to_kg(Some(176.0)).unwrap();
        assert_float_absolute_eq!(kg, 79.832192, 1e-9);
        assert_eq!(lbs_to_kg_rounded(Some(176.0)), Some(79.83));
    }

    #[test]
    fn test_display_conversions() {
        assert_eq!(cm_to_feet_and_inches(177.8), (5, 10.0));
        assert_eq!(kg_to_lbs(79.832192), 176.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }
}
