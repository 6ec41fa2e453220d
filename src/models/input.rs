use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FoodGroup, Goal, Macro};

/// Raw planning form as the user typed it.
///
/// Every numeric field is text, imperial where the form is imperial. This is
/// the shape saved to and loaded from disk; nothing in it has been validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub first_name: String,
    pub last_name: String,
    pub sex: String,
    pub age: String,
    pub height_feet: String,
    pub height_inches: String,
    pub weight_lbs: String,
    pub lean_body_mass_lbs: String,
    pub goal: String,
    pub goal_weight_lbs: String,
    /// Free-text goal statement shown on both reports.
    pub goal_notes: String,
    pub dietitian_notes: String,
    pub method: String,
    pub physical_activity_factor: String,
    /// Manual calorie factor; empty means "use the derived factor".
    pub target_calorie_factor: String,
    pub macro_grams: BTreeMap<Macro, String>,
    pub servings: BTreeMap<FoodGroup, String>,
    /// Derived values the overrides above were made against. `None` for
    /// hand-written forms, whose overrides are taken as they are.
    pub basis: Option<OverrideBasis>,
}

/// Upstream values in effect when overrides were saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideBasis {
    pub tdee: Option<f64>,
    pub goal: Option<Goal>,
    pub body_weight_kg: Option<f64>,
    pub calorie_reference_weight_kg: Option<f64>,
    pub target_calories: Option<f64>,
    pub band_calories: Option<u32>,
}

impl OverrideBasis {
    /// The calorie factor override still applies.
    pub fn factor_matches(&self, current: &OverrideBasis) -> bool {
        self.tdee == current.tdee
            && self.goal == current.goal
            && self.body_weight_kg == current.body_weight_kg
            && self.calorie_reference_weight_kg == current.calorie_reference_weight_kg
    }

    /// Macro gram overrides still apply.
    pub fn macros_match(&self, current: &OverrideBasis) -> bool {
        self.target_calories == current.target_calories
            && self.body_weight_kg == current.body_weight_kg
    }

    /// Serving overrides still apply.
    pub fn servings_match(&self, current: &OverrideBasis) -> bool {
        self.band_calories == current.band_calories
    }
}

impl FormInput {
    fn energy_inputs(&self) -> [&str; 10] {
        [
            self.sex.trim(),
            self.age.trim(),
            self.height_feet.trim(),
            self.height_inches.trim(),
            self.weight_lbs.trim(),
            self.lean_body_mass_lbs.trim(),
            self.goal.trim(),
            self.goal_weight_lbs.trim(),
            self.method.trim(),
            self.physical_activity_factor.trim(),
        ]
    }

    /// Whether any field feeding BMR, TDEE or the goal policy differs.
    pub fn energy_inputs_differ(&self, other: &FormInput) -> bool {
        self.energy_inputs() != other.energy_inputs()
    }

    /// Drop macro and serving overrides along with their basis.
    pub fn clear_plan_overrides(&mut self) {
        self.macro_grams.clear();
        self.servings.clear();
        self.basis = None;
    }

    /// Drop every override, the calorie factor included.
    pub fn clear_overrides(&mut self) {
        self.target_calorie_factor.clear();
        self.clear_plan_overrides();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let input: FormInput = serde_json::from_str(r#"{"first_name": "Ana"}"#).unwrap();
        assert_eq!(input.first_name, "Ana");
        assert!(input.weight_lbs.is_empty());
        assert!(input.servings.is_empty());
        assert!(input.basis.is_none());
    }

    #[test]
    fn test_enum_keyed_maps() {
        let json = r#"{"servings": {"LeanProtein": "4"}, "macro_grams": {"Fat": "70"}}"#;
        let input: FormInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.servings.get(&FoodGroup::LeanProtein).map(String::as_str), Some("4"));
        assert_eq!(input.macro_grams.get(&Macro::Fat).map(String::as_str), Some("70"));
    }

    #[test]
    fn test_energy_inputs_differ_ignores_notes_and_padding() {
        let before = FormInput {
            weight_lbs: "176".into(),
            goal: "Maintain weight".into(),
            ..Default::default()
        };

        let mut after = before.clone();
        after.goal_notes = "new note".into();
        after.weight_lbs = " 176 ".into();
        after.macro_grams.insert(Macro::Protein, "150".into());
        assert!(!before.energy_inputs_differ(&after));

        after.weight_lbs = "200".into();
        assert!(before.energy_inputs_differ(&after));
    }

    #[test]
    fn test_clear_overrides() {
        let mut form = FormInput {
            target_calorie_factor: "30".into(),
            basis: Some(OverrideBasis::default()),
            ..Default::default()
        };
        form.macro_grams.insert(Macro::Carb, "300".into());
        form.servings.insert(FoodGroup::Fruit, "2".into());

        form.clear_plan_overrides();
        assert_eq!(form.target_calorie_factor, "30");
        assert!(form.macro_grams.is_empty() && form.servings.is_empty());
        assert!(form.basis.is_none());

        form.clear_overrides();
        assert!(form.target_calorie_factor.is_empty());
    }

    #[test]
    fn test_basis_comparisons() {
        let saved = OverrideBasis {
            tdee: Some(2670.0),
            goal: Some(Goal::MaintainWeight),
            body_weight_kg: Some(80.0),
            calorie_reference_weight_kg: Some(80.0),
            target_calories: Some(2400.0),
            band_calories: Some(2400),
        };

        let moved_band = OverrideBasis {
            band_calories: Some(2800),
            ..saved
        };
        assert!(saved.factor_matches(&moved_band));
        assert!(saved.macros_match(&moved_band));
        assert!(!saved.servings_match(&moved_band));

        let heavier = OverrideBasis {
            body_weight_kg: Some(90.0),
            ..saved
        };
        assert!(!saved.factor_matches(&heavier));
        assert!(!saved.macros_match(&heavier));
    }
}
