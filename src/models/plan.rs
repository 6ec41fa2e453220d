use serde::{Deserialize, Serialize};

use super::EstimationMethod;

/// Energy figures derived from biometrics, activity and goal.
///
/// Each field stays `None` until everything it depends on is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    pub method: EstimationMethod,
    pub bmr: Option<f64>,
    pub physical_activity_factor: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calorie_factor: Option<f64>,
    pub target_calories: Option<f64>,
}

/// Inclusive gram range for one macronutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GramRange {
    pub min: f64,
    pub max: f64,
}

impl GramRange {
    pub fn clamp(&self, grams: f64) -> f64 {
        grams.max(self.min).min(self.max)
    }
}

/// Slider bounds for every macronutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBounds {
    pub protein: GramRange,
    pub carb: GramRange,
    pub fat: GramRange,
}

/// Daily macronutrient grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroPlan {
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
}

/// Which macronutrient a value or override refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Macro {
    Protein,
    Carb,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 3] = [Macro::Protein, Macro::Carb, Macro::Fat];

    pub fn label(&self) -> &'static str {
        match self {
            Macro::Protein => "Protein",
            Macro::Carb => "Carbs",
            Macro::Fat => "Fat",
        }
    }
}

impl MacroPlan {
    pub fn grams(&self, which: Macro) -> f64 {
        match which {
            Macro::Protein => self.protein_grams,
            Macro::Carb => self.carb_grams,
            Macro::Fat => self.fat_grams,
        }
    }

    pub fn set_grams(&mut self, which: Macro, grams: f64) {
        match which {
            Macro::Protein => self.protein_grams = grams,
            Macro::Carb => self.carb_grams = grams,
            Macro::Fat => self.fat_grams = grams,
        }
    }
}

/// Food groups of the daily portion plan, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FoodGroup {
    Vegetable,
    Fruit,
    Grain,
    LeanProtein,
    Dairy,
    Fat,
}

impl FoodGroup {
    pub const ALL: [FoodGroup; 6] = [
        FoodGroup::Vegetable,
        FoodGroup::Fruit,
        FoodGroup::Grain,
        FoodGroup::LeanProtein,
        FoodGroup::Dairy,
        FoodGroup::Fat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FoodGroup::Vegetable => "Vegetables",
            FoodGroup::Fruit => "Fruit",
            FoodGroup::Grain => "Grains",
            FoodGroup::LeanProtein => "Lean Protein",
            FoodGroup::Dairy => "Dairy",
            FoodGroup::Fat => "Fat",
        }
    }

    /// Case-insensitive lookup by label or by snake_case key.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL.into_iter().find(|g| {
            let name = g.label().to_lowercase();
            name == wanted || name.trim_end_matches('s') == wanted
        })
    }
}

/// Nutrients and calories in one serving of a food group.
///
/// Calories are listed directly; they are not derived from the 4/4/9 rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServingProfile {
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
}

/// Serving counts for all six food groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Servings {
    pub vegetable: f64,
    pub fruit: f64,
    pub grain: f64,
    pub lean_protein: f64,
    pub dairy: f64,
    pub fat: f64,
}

impl Servings {
    pub const fn new(
        vegetable: f64,
        fruit: f64,
        grain: f64,
        lean_protein: f64,
        dairy: f64,
        fat: f64,
    ) -> Self {
        Self {
            vegetable,
            fruit,
            grain,
            lean_protein,
            dairy,
            fat,
        }
    }

    pub fn get(&self, group: FoodGroup) -> f64 {
        match group {
            FoodGroup::Vegetable => self.vegetable,
            FoodGroup::Fruit => self.fruit,
            FoodGroup::Grain => self.grain,
            FoodGroup::LeanProtein => self.lean_protein,
            FoodGroup::Dairy => self.dairy,
            FoodGroup::Fat => self.fat,
        }
    }

    pub fn set(&mut self, group: FoodGroup, servings: f64) {
        match group {
            FoodGroup::Vegetable => self.vegetable = servings,
            FoodGroup::Fruit => self.fruit = servings,
            FoodGroup::Grain => self.grain = servings,
            FoodGroup::LeanProtein => self.lean_protein = servings,
            FoodGroup::Dairy => self.dairy = servings,
            FoodGroup::Fat => self.fat = servings,
        }
    }

    /// (group, servings) pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FoodGroup, f64)> + '_ {
        FoodGroup::ALL.into_iter().map(|g| (g, self.get(g)))
    }
}

/// Summed nutrients across a serving plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortionTotals {
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub calories: f64,
}

impl PortionTotals {
    pub fn add(&mut self, profile: &ServingProfile, servings: f64) {
        self.protein_grams += profile.protein_grams * servings;
        self.carb_grams += profile.carb_grams * servings;
        self.fat_grams += profile.fat_grams * servings;
        self.calories += profile.calories * servings;
    }
}

/// Advisory outcome of comparing a total with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToleranceStatus {
    Within,
    Outside,
}

impl ToleranceStatus {
    pub fn is_within(&self) -> bool {
        matches!(self, ToleranceStatus::Within)
    }
}

/// One actual-vs-target comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceCheck {
    pub actual: f64,
    pub target: f64,
    pub tolerance: f64,
    pub status: ToleranceStatus,
}

impl ToleranceCheck {
    /// A deviation exactly equal to the tolerance still passes.
    pub fn new(actual: f64, target: f64, tolerance: f64) -> Self {
        let status = if (actual - target).abs() <= tolerance {
            ToleranceStatus::Within
        } else {
            ToleranceStatus::Outside
        };
        Self {
            actual,
            target,
            tolerance,
            status,
        }
    }

    pub fn deviation(&self) -> f64 {
        self.actual - self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        assert!(ToleranceCheck::new(110.0, 100.0, 10.0).status.is_within());
        assert!(ToleranceCheck::new(90.0, 100.0, 10.0).status.is_within());
        assert!(!ToleranceCheck::new(110.5, 100.0, 10.0).status.is_within());
    }

    #[test]
    fn test_gram_range_clamp() {
        let range = GramRange { min: 64.0, max: 192.0 };
        assert_eq!(range.clamp(10.0), 64.0);
        assert_eq!(range.clamp(300.0), 192.0);
        assert_eq!(range.clamp(100.0), 100.0);
    }

    #[test]
    fn test_food_group_lookup() {
        assert_eq!(FoodGroup::from_label("lean_protein"), Some(FoodGroup::LeanProtein));
        assert_eq!(FoodGroup::from_label("Vegetable"), Some(FoodGroup::Vegetable));
        assert_eq!(FoodGroup::from_label("grains"), Some(FoodGroup::Grain));
        assert_eq!(FoodGroup::from_label("sweets"), None);
    }

    #[test]
    fn test_servings_get_set() {
        let mut servings = Servings::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        servings.set(FoodGroup::Dairy, 0.0);
        assert_eq!(servings.get(FoodGroup::Dairy), 0.0);
        let collected: Vec<f64> = servings.iter().map(|(_, s)| s).collect();
        assert_eq!(collected, vec![1.0, 2.0, 3.0, 4.0, 0.0, 6.0]);
    }
}
