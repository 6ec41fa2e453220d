use serde::{Deserialize, Serialize};

/// Biological sex, as used by the sex-specific BMR and LBM equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    /// Exact match only: anything but "Male" or "Female" is not a sex.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label.trim())
    }
}

/// Weight goal selected for the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    LoseWeight,
    GainWeight,
    MaintainWeight,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::GainWeight, Goal::MaintainWeight];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose weight",
            Goal::GainWeight => "Gain weight",
            Goal::MaintainWeight => "Maintain weight",
        }
    }

    /// Case-insensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.label().to_lowercase() == wanted)
    }

    /// Whether the goal needs a goal weight distinct from the current weight.
    pub fn changes_weight(&self) -> bool {
        matches!(self, Goal::LoseWeight | Goal::GainWeight)
    }
}

/// BMR estimation formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimationMethod {
    MifflinStJeor,
    #[default]
    HarrisBenedict,
    Cunningham,
    KatchMcArdle,
}

impl EstimationMethod {
    pub const ALL: [EstimationMethod; 4] = [
        EstimationMethod::MifflinStJeor,
        EstimationMethod::HarrisBenedict,
        EstimationMethod::Cunningham,
        EstimationMethod::KatchMcArdle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EstimationMethod::MifflinStJeor => "Mifflin-St. Jeor",
            EstimationMethod::HarrisBenedict => "Harris and Benedict",
            EstimationMethod::Cunningham => "Cunningham",
            EstimationMethod::KatchMcArdle => "Katch-McArdle",
        }
    }

    /// Case-insensitive label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.label().to_lowercase() == wanted)
    }

    /// Formulas driven by lean body mass rather than weight/height/age.
    pub fn uses_lean_body_mass(&self) -> bool {
        matches!(
            self,
            EstimationMethod::Cunningham | EstimationMethod::KatchMcArdle
        )
    }
}

/// Validated biometric inputs, metric units. Each field is absent until the
/// form supplies a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biometrics {
    pub sex: Option<Sex>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub lean_body_mass_kg: Option<f64>,
}

impl Biometrics {
    /// True once every field a BMR estimate needs is present.
    pub fn is_complete(&self) -> bool {
        self.sex.is_some()
            && self.weight_kg.is_some()
            && self.height_cm.is_some()
            && self.age_years.is_some()
    }

    /// True when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        self.sex.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.age_years.is_none()
            && self.lean_body_mass_kg.is_none()
    }
}

/// Goal plus its goal weight (only meaningful for lose/gain).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub goal: Option<Goal>,
    pub goal_weight_kg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_label_exact() {
        assert_eq!(Sex::from_label("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_label("Female"), Some(Sex::Female));
        assert_eq!(Sex::from_label("male"), None);
        assert_eq!(Sex::from_label(""), None);
    }

    #[test]
    fn test_method_label_roundtrip() {
        for method in EstimationMethod::ALL {
            assert_eq!(EstimationMethod::from_label(method.label()), Some(method));
        }
        assert_eq!(
            EstimationMethod::from_label("katch-mcardle"),
            Some(EstimationMethod::KatchMcArdle)
        );
        assert_eq!(EstimationMethod::from_label("Schofield"), None);
    }

    #[test]
    fn test_default_method() {
        assert_eq!(EstimationMethod::default(), EstimationMethod::HarrisBenedict);
    }

    #[test]
    fn test_goal_changes_weight() {
        assert!(Goal::LoseWeight.changes_weight());
        assert!(Goal::GainWeight.changes_weight());
        assert!(!Goal::MaintainWeight.changes_weight());
    }

    #[test]
    fn test_biometrics_complete() {
        let mut bio = Biometrics {
            sex: Some(Sex::Female),
            weight_kg: Some(60.0),
            height_cm: Some(165.0),
            age_years: None,
            lean_body_mass_kg: None,
        };
        assert!(!bio.is_complete());
        bio.age_years = Some(25);
        assert!(bio.is_complete());
    }
}
