use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FoodGroup, MacroPlan, PortionTotals, Servings, ToleranceCheck};
use crate::planner::constants::{SERVING_TEMPLATES, serving_profile};
use crate::planner::macros::macro_calories;

/// A calorie band's serving template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServingTemplate {
    /// Nominal calories of the band (1200, 1600, ... 3200).
    pub band_calories: u32,
    pub servings: Servings,
}

/// Template for a calorie level. Band edges belong to the higher band.
pub fn serving_template(calories: f64) -> ServingTemplate {
    let (_, band_calories, servings) = SERVING_TEMPLATES
        .iter()
        .rev()
        .find(|(lower, _, _)| calories >= *lower)
        .copied()
        .unwrap_or(SERVING_TEMPLATES[0]);

    ServingTemplate {
        band_calories,
        servings,
    }
}

/// Nutrients contributed by `servings` of one group.
pub fn group_contribution(group: FoodGroup, servings: f64) -> PortionTotals {
    let mut totals = PortionTotals::default();
    totals.add(&serving_profile(group), servings);
    totals
}

/// Sum of every group's contribution.
pub fn portion_totals(servings: &Servings) -> PortionTotals {
    let mut totals = PortionTotals::default();
    for (group, count) in servings.iter() {
        totals.add(&serving_profile(group), count);
    }
    totals
}

/// Serving counts seeded from a template, each individually overridable.
///
/// A `None` count means the user's entry for that group was unusable; the
/// plan then has no totals until it is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPortionPlan {
    /// Calories of the macro plan the template was picked for.
    pub seed_calories: f64,
    pub template: ServingTemplate,
    pub counts: BTreeMap<FoodGroup, Option<f64>>,
}

impl DailyPortionPlan {
    /// Seed from the calories of the current macro grams.
    pub fn seed(macros: &MacroPlan) -> Self {
        let seed_calories = macro_calories(macros);
        let template = serving_template(seed_calories);
        let counts = template.servings.iter().map(|(g, s)| (g, Some(s))).collect();

        Self {
            seed_calories,
            template,
            counts,
        }
    }

    pub fn count(&self, group: FoodGroup) -> Option<f64> {
        self.counts.get(&group).copied().flatten()
    }

    pub fn set_count(&mut self, group: FoodGroup, servings: Option<f64>) {
        self.counts.insert(group, servings);
    }

    /// Groups without a usable count.
    pub fn missing_groups(&self) -> Vec<FoodGroup> {
        FoodGroup::ALL
            .into_iter()
            .filter(|g| self.count(*g).is_none())
            .collect()
    }

    /// All six counts, or `None` while any is missing.
    pub fn resolved(&self) -> Option<Servings> {
        let mut servings = self.template.servings;
        for group in FoodGroup::ALL {
            servings.set(group, self.count(group)?);
        }
        Some(servings)
    }

    pub fn totals(&self) -> Option<PortionTotals> {
        self.resolved().map(|s| portion_totals(&s))
    }
}

/// Advisory checks of a serving plan against the macro targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionCheck {
    pub protein: ToleranceCheck,
    pub carb: ToleranceCheck,
    pub fat: ToleranceCheck,
    pub calories: ToleranceCheck,
}

impl PortionCheck {
    pub fn all_within(&self) -> bool {
        [self.protein, self.carb, self.fat, self.calories]
            .iter()
            .all(|c| c.status.is_within())
    }
}

/// Compare portion totals with macro grams (macro tolerance) and with the
/// seed calories (calorie tolerance). Never blocks anything downstream.
pub fn check_portions(
    totals: &PortionTotals,
    macros: &MacroPlan,
    target_calories: f64,
    macro_tolerance: f64,
    calorie_tolerance: f64,
) -> PortionCheck {
    PortionCheck {
        protein: ToleranceCheck::new(totals.protein_grams, macros.protein_grams, macro_tolerance),
        carb: ToleranceCheck::new(totals.carb_grams, macros.carb_grams, macro_tolerance),
        fat: ToleranceCheck::new(totals.fat_grams, macros.fat_grams, macro_tolerance),
        calories: ToleranceCheck::new(totals.calories, target_calories, calorie_tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::constants::*;

    #[test]
    fn test_band_edges_pick_higher_band() {
        let edges = [
            (1400.0, 1200, 1600),
            (1800.0, 1600, 2000),
            (2200.0, 2000, 2400),
            (2600.0, 2400, 2800),
            (3000.0, 2800, 3200),
        ];
        for (edge, below, at) in edges {
            assert_eq!(serving_template(edge - 0.01).band_calories, below);
            assert_eq!(serving_template(edge).band_calories, at);
        }
        assert_eq!(serving_template(0.0).band_calories, 1200);
        assert_eq!(serving_template(9000.0).band_calories, 3200);
    }

    #[test]
    fn test_2000_template_totals() {
        let template = serving_template(2000.0);
        assert_eq!(template.servings, TEMPLATE_2000_CAL);

        let totals = portion_totals(&template.servings);
        assert_eq!(totals.protein_grams, 120.0);
        // 30 + 45 + 105 + 0 + 36 + 0
        assert_eq!(totals.carb_grams, 216.0);
        // 7 + 9 + 40
        assert_eq!(totals.fat_grams, 56.0);
        assert_eq!(totals.calories, 1835.0);
    }

    #[test]
    fn test_seed_uses_macro_calories() {
        // 100*4 + 250*4 + 70*9 = 2030
        let macros = MacroPlan {
            protein_grams: 100.0,
            carb_grams: 250.0,
            fat_grams: 70.0,
        };
        let plan = DailyPortionPlan::seed(&macros);
        assert_eq!(plan.seed_calories, 2030.0);
        assert_eq!(plan.template.band_calories, 2000);
        assert_eq!(plan.count(FoodGroup::Grain), Some(7.0));
    }

    #[test]
    fn test_missing_count_blocks_totals() {
        let macros = MacroPlan {
            protein_grams: 100.0,
            carb_grams: 250.0,
            fat_grams: 70.0,
        };
        let mut plan = DailyPortionPlan::seed(&macros);
        plan.set_count(FoodGroup::Fruit, None);
        assert!(plan.totals().is_none());
        assert_eq!(plan.missing_groups(), vec![FoodGroup::Fruit]);

        plan.set_count(FoodGroup::Fruit, Some(0.0));
        let totals = plan.totals().unwrap();
        assert_eq!(totals.calories, 1835.0 - 3.0 * 60.0);
    }

    #[test]
    fn test_group_contribution() {
        let c = group_contribution(FoodGroup::LeanProtein, 3.0);
        assert_eq!(c.protein_grams, 63.0);
        assert_eq!(c.fat_grams, 9.0);
        assert_eq!(c.calories, 315.0);
    }

    #[test]
    fn test_check_portions() {
        let totals = portion_totals(&TEMPLATE_2000_CAL);
        let macros = MacroPlan {
            protein_grams: 130.0,
            carb_grams: 230.0,
            fat_grams: 60.0,
        };
        let check = check_portions(&totals, &macros, 1935.0, MACRO_TOLERANCE, CALORIE_TOLERANCE);
        assert!(check.protein.status.is_within());
        assert!(!check.carb.status.is_within());
        assert!(check.fat.status.is_within());
        assert!(check.calories.status.is_within());
        assert!(!check.all_within());
    }
}
