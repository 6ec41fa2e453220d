use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::planner::constants::{
    CALORIE_TOLERANCE, DEFAULT_TARGET_CALORIE_FACTOR, MACRO_CALORIE_TOLERANCE, MACRO_TOLERANCE,
};

/// Tunable thresholds and defaults, loaded once at start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Grams a portion total may differ from its macro target.
    pub macro_tolerance_g: f64,
    /// kcal the portion plan may differ from its seed calories.
    pub portion_calorie_tolerance_kcal: f64,
    /// kcal the macro split may differ from the calorie target.
    pub macro_calorie_tolerance_kcal: f64,
    /// kcal per kg of goal weight for lose/gain goals.
    pub default_target_calorie_factor: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            macro_tolerance_g: MACRO_TOLERANCE,
            portion_calorie_tolerance_kcal: CALORIE_TOLERANCE,
            macro_calorie_tolerance_kcal: MACRO_CALORIE_TOLERANCE,
            default_target_calorie_factor: DEFAULT_TARGET_CALORIE_FACTOR,
        }
    }
}

impl PlannerConfig {
    /// Load from a JSON file; keys left out keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        info!(path = %path.as_ref().display(), ?config, "loaded planner config");
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"macro_tolerance_g": 5}"#).unwrap();

        let config = PlannerConfig::load(file.path()).unwrap();
        assert_eq!(config.macro_tolerance_g, 5.0);
        assert_eq!(config.portion_calorie_tolerance_kcal, CALORIE_TOLERANCE);
        assert_eq!(config.default_target_calorie_factor, 33.0);
    }

    #[test]
    fn test_no_path_gives_default() {
        let config = PlannerConfig::load_or_default(None::<&Path>).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }
}
