use tracing::debug;

use crate::models::{Biometrics, EstimationMethod, Sex};
use crate::planner::constants::*;
use crate::planner::conversions::round_half_up;

/// Mifflin-St Jeor BMR (kcal/day).
pub fn mifflin_st_jeor(sex: Sex, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    let sex_constant = match sex {
        Sex::Male => MSJ_MALE_CONSTANT,
        Sex::Female => MSJ_FEMALE_CONSTANT,
    };
    MSJ_WEIGHT_COEF * weight_kg + MSJ_HEIGHT_COEF * height_cm - MSJ_AGE_COEF * age + sex_constant
}

/// Revised Harris-Benedict BMR (kcal/day).
pub fn harris_benedict(sex: Sex, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    let c = match sex {
        Sex::Male => HB_MALE,
        Sex::Female => HB_FEMALE,
    };
    c.constant + c.weight * weight_kg + c.height * height_cm - c.age * age
}

/// Cunningham BMR from lean body mass (kcal/day).
pub fn cunningham(lean_body_mass_kg: f64) -> f64 {
    CUNNINGHAM_CONSTANT + CUNNINGHAM_LBM_COEF * lean_body_mass_kg
}

/// Katch-McArdle BMR from lean body mass (kcal/day).
pub fn katch_mcardle(lean_body_mass_kg: f64) -> f64 {
    KATCH_MCARDLE_CONSTANT + KATCH_MCARDLE_LBM_COEF * lean_body_mass_kg
}

/// Boer (1984) lean body mass estimate.
pub fn boer_lean_body_mass(sex: Sex, weight_kg: f64, height_cm: f64) -> f64 {
    let c = match sex {
        Sex::Male => BOER_MALE,
        Sex::Female => BOER_FEMALE,
    };
    c.weight * weight_kg + c.height * height_cm + c.constant
}

/// Supplied LBM when present, otherwise the Boer estimate.
pub fn effective_lean_body_mass(
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    lean_body_mass_kg: Option<f64>,
) -> f64 {
    lean_body_mass_kg.unwrap_or_else(|| boer_lean_body_mass(sex, weight_kg, height_cm))
}

/// Unrounded BMR for the chosen method.
///
/// Sex, weight, height and age must all be present for every method, LBM
/// formulas included (they need sex/weight/height for the Boer fallback).
/// Any missing field yields `None`.
pub fn estimate_bmr_raw(bio: &Biometrics, method: EstimationMethod) -> Option<f64> {
    let (Some(sex), Some(weight), Some(height), Some(age)) =
        (bio.sex, bio.weight_kg, bio.height_cm, bio.age_years)
    else {
        debug!(?method, "BMR not computable: biometrics incomplete");
        return None;
    };
    let age = f64::from(age);

    let bmr = match method {
        EstimationMethod::MifflinStJeor => mifflin_st_jeor(sex, weight, height, age),
        EstimationMethod::HarrisBenedict => harris_benedict(sex, weight, height, age),
        EstimationMethod::Cunningham => cunningham(effective_lean_body_mass(
            sex,
            weight,
            height,
            bio.lean_body_mass_kg,
        )),
        EstimationMethod::KatchMcArdle => katch_mcardle(effective_lean_body_mass(
            sex,
            weight,
            height,
            bio.lean_body_mass_kg,
        )),
    };

    Some(bmr)
}

/// BMR rounded to whole kcal, the value that feeds TDEE.
pub fn estimate_bmr(bio: &Biometrics, method: EstimationMethod) -> Option<f64> {
    estimate_bmr_raw(bio, method).map(round_half_up)
}
