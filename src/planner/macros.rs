use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{GramRange, Macro, MacroBounds, MacroPlan, ToleranceCheck};
use crate::planner::constants::*;
use crate::planner::conversions::round_half_up;
use crate::planner::energy::GoalPolicy;

/// Slider bounds for a calorie target and body weight.
///
/// The carb ceiling is what remains after the minimum fat and protein.
pub fn macro_bounds(target_calories: f64, body_weight_kg: f64) -> MacroBounds {
    let protein = GramRange {
        min: round_half_up(PROTEIN_MIN_G_PER_KG * body_weight_kg),
        max: round_half_up(PROTEIN_MAX_G_PER_KG * body_weight_kg),
    };
    let fat = GramRange {
        min: round_half_up(FAT_MIN_SHARE * target_calories / KCAL_PER_GRAM_FAT),
        max: round_half_up(FAT_MAX_SHARE * target_calories / KCAL_PER_GRAM_FAT),
    };
    let carb = GramRange {
        min: round_half_up(CARB_MIN_SHARE * target_calories / KCAL_PER_GRAM_CARB),
        max: round_half_up(
            (target_calories - fat.min * KCAL_PER_GRAM_FAT - protein.min * KCAL_PER_GRAM_PROTEIN)
                / KCAL_PER_GRAM_CARB,
        ),
    };

    MacroBounds { protein, carb, fat }
}

/// Default split: 1.6 g/kg protein, 30% of calories as fat, carbs fill
/// the remainder.
pub fn default_macros(target_calories: f64, body_weight_kg: f64) -> MacroPlan {
    let protein_grams = round_half_up(PROTEIN_DEFAULT_G_PER_KG * body_weight_kg);
    let fat_grams = round_half_up(FAT_DEFAULT_SHARE * target_calories / KCAL_PER_GRAM_FAT);
    let carb_grams = round_half_up(
        (target_calories - protein_grams * KCAL_PER_GRAM_PROTEIN - fat_grams * KCAL_PER_GRAM_FAT)
            / KCAL_PER_GRAM_CARB,
    );

    MacroPlan {
        protein_grams,
        carb_grams,
        fat_grams,
    }
}

/// Calories supplied by a macro plan (4/4/9).
pub fn macro_calories(plan: &MacroPlan) -> f64 {
    plan.protein_grams * KCAL_PER_GRAM_PROTEIN
        + plan.carb_grams * KCAL_PER_GRAM_CARB
        + plan.fat_grams * KCAL_PER_GRAM_FAT
}

/// kcal contributed by one macronutrient.
pub fn calories_from(which: Macro, grams: f64) -> f64 {
    let per_gram = match which {
        Macro::Protein => KCAL_PER_GRAM_PROTEIN,
        Macro::Carb => KCAL_PER_GRAM_CARB,
        Macro::Fat => KCAL_PER_GRAM_FAT,
    };
    grams * per_gram
}

/// Macros resolved for the current calorie target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroAllocation {
    pub target_calories: f64,
    pub body_weight_kg: f64,
    pub bounds: MacroBounds,
    pub defaults: MacroPlan,
    /// Defaults with any in-bounds overrides applied.
    pub plan: MacroPlan,
    pub calorie_check: ToleranceCheck,
}

impl MacroAllocation {
    pub fn total_calories(&self) -> f64 {
        macro_calories(&self.plan)
    }

    /// Grams per kg of body weight, one decimal.
    pub fn grams_per_kg(&self, which: Macro) -> f64 {
        round_half_up(self.plan.grams(which) * 10.0 / self.body_weight_kg) / 10.0
    }

    /// Whole-percent share of the plan's own calories.
    pub fn percent_of_calories(&self, which: Macro) -> f64 {
        let total = self.total_calories();
        if total <= 0.0 {
            return 0.0;
        }
        round_half_up(calories_from(which, self.plan.grams(which)) * 100.0 / total)
    }

    pub fn bounds_for(&self, which: Macro) -> GramRange {
        match which {
            Macro::Protein => self.bounds.protein,
            Macro::Carb => self.bounds.carb,
            Macro::Fat => self.bounds.fat,
        }
    }
}

/// Split target calories into macronutrient grams.
///
/// Needs both the calorie target and the current body weight from the goal
/// policy. Overrides are clamped into their slider bounds.
pub fn allocate_macros(
    target_calories: Option<f64>,
    policy: Option<&GoalPolicy>,
    overrides: &BTreeMap<Macro, f64>,
    calorie_tolerance: f64,
) -> Option<MacroAllocation> {
    let target_calories = target_calories?;
    let body_weight_kg = policy?.body_weight_kg()?;

    let bounds = macro_bounds(target_calories, body_weight_kg);
    let defaults = default_macros(target_calories, body_weight_kg);

    let mut plan = defaults;
    for (&which, &grams) in overrides {
        let range = match which {
            Macro::Protein => bounds.protein,
            Macro::Carb => bounds.carb,
            Macro::Fat => bounds.fat,
        };
        plan.set_grams(which, range.clamp(round_half_up(grams)));
    }

    let calorie_check = ToleranceCheck::new(macro_calories(&plan), target_calories, calorie_tolerance);

    Some(MacroAllocation {
        target_calories,
        body_weight_kg,
        bounds,
        defaults,
        plan,
        calorie_check,
    })
}
