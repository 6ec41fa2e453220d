pub mod biometrics;
pub mod input;
pub mod plan;

pub use biometrics::{Biometrics, EstimationMethod, Goal, GoalSpec, Sex};
pub use input::{FormInput, OverrideBasis};
pub use plan::{
    EnergyState, FoodGroup, GramRange, Macro, MacroBounds, MacroPlan, PortionTotals,
    ServingProfile, Servings, ToleranceCheck, ToleranceStatus,
};
