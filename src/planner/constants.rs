use crate::models::{FoodGroup, ServingProfile, Servings};

// ─────────────────────────────────────────────────────────────────────────────
// Unit conversion
// ─────────────────────────────────────────────────────────────────────────────

pub const FT_TO_INCHES: f64 = 12.0;
pub const INCHES_TO_CM: f64 = 2.54;
pub const LBS_TO_KGS: f64 = 0.453592;

// ─────────────────────────────────────────────────────────────────────────────
// BMR formula coefficients
// ─────────────────────────────────────────────────────────────────────────────

/// Mifflin-St Jeor (1990): 10w + 6.25h - 5a + s.
pub const MSJ_WEIGHT_COEF: f64 = 10.0;
pub const MSJ_HEIGHT_COEF: f64 = 6.25;
pub const MSJ_AGE_COEF: f64 = 5.0;
pub const MSJ_MALE_CONSTANT: f64 = 5.0;
pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Harris-Benedict (revised, Roza & Shizgal 1984).
pub const HB_MALE: BmrCoefficients = BmrCoefficients {
    constant: 88.362,
    weight: 13.397,
    height: 4.799,
    age: 5.677,
};
pub const HB_FEMALE: BmrCoefficients = BmrCoefficients {
    constant: 447.593,
    weight: 9.247,
    height: 3.098,
    age: 4.330,
};

/// Cunningham: 500 + 22 * LBM.
pub const CUNNINGHAM_CONSTANT: f64 = 500.0;
pub const CUNNINGHAM_LBM_COEF: f64 = 22.0;

/// Katch-McArdle: 370 + 21.6 * LBM.
pub const KATCH_MCARDLE_CONSTANT: f64 = 370.0;
pub const KATCH_MCARDLE_LBM_COEF: f64 = 21.6;

/// Boer lean body mass estimate, used when no LBM is supplied.
pub const BOER_MALE: LbmCoefficients = LbmCoefficients {
    weight: 0.407,
    height: 0.267,
    constant: -19.2,
};
pub const BOER_FEMALE: LbmCoefficients = LbmCoefficients {
    weight: 0.252,
    height: 0.473,
    constant: -48.3,
};

/// Linear BMR equation: constant + weight*w + height*h - age*a.
#[derive(Debug, Clone, Copy)]
pub struct BmrCoefficients {
    pub constant: f64,
    pub weight: f64,
    pub height: f64,
    pub age: f64,
}

/// Linear LBM equation: weight*w + height*h + constant.
#[derive(Debug, Clone, Copy)]
pub struct LbmCoefficients {
    pub weight: f64,
    pub height: f64,
    pub constant: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Energy and macros
// ─────────────────────────────────────────────────────────────────────────────

/// Default kcal per kg of goal weight when losing or gaining.
pub const DEFAULT_TARGET_CALORIE_FACTOR: f64 = 33.0;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Protein grams per kg body weight.
pub const PROTEIN_MIN_G_PER_KG: f64 = 0.8;
pub const PROTEIN_DEFAULT_G_PER_KG: f64 = 1.6;
pub const PROTEIN_MAX_G_PER_KG: f64 = 2.4;

/// Fat share of target calories.
pub const FAT_MIN_SHARE: f64 = 0.2;
pub const FAT_DEFAULT_SHARE: f64 = 0.3;
pub const FAT_MAX_SHARE: f64 = 0.6;

/// Minimum carb share of target calories.
pub const CARB_MIN_SHARE: f64 = 0.2;

// ─────────────────────────────────────────────────────────────────────────────
// Tolerances
// ─────────────────────────────────────────────────────────────────────────────

/// Allowed |macro calories - target calories| on the macro sliders.
pub const MACRO_CALORIE_TOLERANCE: f64 = 50.0;

/// Allowed |portion grams - macro grams| per macronutrient.
pub const MACRO_TOLERANCE: f64 = 10.0;

/// Allowed |portion calories - target calories| for the serving plan.
pub const CALORIE_TOLERANCE: f64 = 100.0;

// ─────────────────────────────────────────────────────────────────────────────
// Food groups
// ─────────────────────────────────────────────────────────────────────────────

pub const VEGETABLE_SERVING: ServingProfile = ServingProfile {
    calories: 25.0,
    protein_grams: 2.0,
    carb_grams: 5.0,
    fat_grams: 0.0,
};

pub const FRUIT_SERVING: ServingProfile = ServingProfile {
    calories: 60.0,
    protein_grams: 0.0,
    carb_grams: 15.0,
    fat_grams: 0.0,
};

pub const GRAIN_SERVING: ServingProfile = ServingProfile {
    calories: 80.0,
    protein_grams: 3.0,
    carb_grams: 15.0,
    fat_grams: 1.0,
};

pub const LEAN_PROTEIN_SERVING: ServingProfile = ServingProfile {
    calories: 105.0,
    protein_grams: 21.0,
    carb_grams: 0.0,
    fat_grams: 3.0,
};

pub const DAIRY_SERVING: ServingProfile = ServingProfile {
    calories: 90.0,
    protein_grams: 8.0,
    carb_grams: 12.0,
    fat_grams: 0.0,
};

pub const FAT_SERVING: ServingProfile = ServingProfile {
    calories: 45.0,
    protein_grams: 0.0,
    carb_grams: 0.0,
    fat_grams: 5.0,
};

/// Per-serving profile for a food group.
pub fn serving_profile(group: FoodGroup) -> ServingProfile {
    match group {
        FoodGroup::Vegetable => VEGETABLE_SERVING,
        FoodGroup::Fruit => FRUIT_SERVING,
        FoodGroup::Grain => GRAIN_SERVING,
        FoodGroup::LeanProtein => LEAN_PROTEIN_SERVING,
        FoodGroup::Dairy => DAIRY_SERVING,
        FoodGroup::Fat => FAT_SERVING,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily portion templates
// ─────────────────────────────────────────────────────────────────────────────

pub const TEMPLATE_1200_CAL: Servings = Servings::new(6.0, 2.0, 3.0, 2.0, 2.0, 4.0);
pub const TEMPLATE_1600_CAL: Servings = Servings::new(6.0, 2.0, 5.0, 3.0, 2.0, 6.0);
pub const TEMPLATE_2000_CAL: Servings = Servings::new(6.0, 3.0, 7.0, 3.0, 3.0, 8.0);
pub const TEMPLATE_2400_CAL: Servings = Servings::new(6.0, 4.0, 8.0, 4.0, 3.0, 10.0);
pub const TEMPLATE_2800_CAL: Servings = Servings::new(6.0, 4.0, 10.0, 5.0, 3.0, 12.0);
pub const TEMPLATE_3200_CAL: Servings = Servings::new(6.0, 5.0, 11.0, 6.0, 3.0, 14.0);

/// Calorie bands, ascending by lower bound. A band applies from its lower
/// bound (inclusive) up to the next band's lower bound.
pub static SERVING_TEMPLATES: [(f64, u32, Servings); 6] = [
    (f64::NEG_INFINITY, 1200, TEMPLATE_1200_CAL),
    (1400.0, 1600, TEMPLATE_1600_CAL),
    (1800.0, 2000, TEMPLATE_2000_CAL),
    (2200.0, 2400, TEMPLATE_2400_CAL),
    (2600.0, 2800, TEMPLATE_2800_CAL),
    (3000.0, 3200, TEMPLATE_3200_CAL),
];
