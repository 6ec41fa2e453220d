pub mod bmr;
pub mod config;
pub mod constants;
pub mod conversions;
pub mod energy;
pub mod macros;
pub mod portions;
pub mod validation;

pub use bmr::{estimate_bmr, estimate_bmr_raw};
pub use config::PlannerConfig;
pub use constants::*;
pub use energy::{CalorieTarget, GoalPolicy, calculate_tdee, resolve_target_calories};
pub use macros::{MacroAllocation, allocate_macros, default_macros, macro_bounds, macro_calories};
pub use portions::{
    DailyPortionPlan, PortionCheck, ServingTemplate, check_portions, portion_totals,
    serving_template,
};
