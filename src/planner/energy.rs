use serde::{Deserialize, Serialize};

use crate::models::Goal;
use crate::planner::conversions::{round_2dp, round_half_up};

/// Total daily energy expenditure, rounded to whole kcal.
///
/// Both inputs must be present; a missing one clears TDEE.
pub fn calculate_tdee(bmr: Option<f64>, physical_activity_factor: Option<f64>) -> Option<f64> {
    Some(round_half_up(bmr? * physical_activity_factor?))
}

/// How the calorie target is derived for a goal.
///
/// Resolved once per recompute and shared by the target calorie resolver
/// and the macro allocator, so neither re-tests the goal enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoalPolicy {
    /// Eat at TDEE; the calorie factor is TDEE per kg of current weight.
    Maintain { weight_kg: f64 },
    /// Fixed kcal/kg applied to the goal weight.
    Lose {
        goal_weight_kg: f64,
        weight_kg: Option<f64>,
    },
    Gain {
        goal_weight_kg: f64,
        weight_kg: Option<f64>,
    },
}

impl GoalPolicy {
    /// Pick the policy for a goal. `None` when the weight that goal's
    /// branch multiplies is missing.
    pub fn resolve(
        goal: Option<Goal>,
        weight_kg: Option<f64>,
        goal_weight_kg: Option<f64>,
    ) -> Option<Self> {
        match goal? {
            Goal::MaintainWeight => Some(GoalPolicy::Maintain {
                weight_kg: weight_kg?,
            }),
            Goal::LoseWeight => Some(GoalPolicy::Lose {
                goal_weight_kg: goal_weight_kg?,
                weight_kg,
            }),
            Goal::GainWeight => Some(GoalPolicy::Gain {
                goal_weight_kg: goal_weight_kg?,
                weight_kg,
            }),
        }
    }

    pub fn goal(&self) -> Goal {
        match self {
            GoalPolicy::Maintain { .. } => Goal::MaintainWeight,
            GoalPolicy::Lose { .. } => Goal::LoseWeight,
            GoalPolicy::Gain { .. } => Goal::GainWeight,
        }
    }

    /// Weight the calorie factor is multiplied by.
    pub fn calorie_reference_weight(&self) -> f64 {
        match *self {
            GoalPolicy::Maintain { weight_kg } => weight_kg,
            GoalPolicy::Lose { goal_weight_kg, .. } | GoalPolicy::Gain { goal_weight_kg, .. } => {
                goal_weight_kg
            }
        }
    }

    /// Current body weight, which anchors the protein range.
    pub fn body_weight_kg(&self) -> Option<f64> {
        match *self {
            GoalPolicy::Maintain { weight_kg } => Some(weight_kg),
            GoalPolicy::Lose { weight_kg, .. } | GoalPolicy::Gain { weight_kg, .. } => weight_kg,
        }
    }

    /// Seed value for the calorie factor before any manual override.
    pub fn default_factor(&self, tdee: Option<f64>, change_factor: f64) -> Option<f64> {
        match *self {
            GoalPolicy::Maintain { weight_kg } => Some(round_2dp(tdee? / weight_kg)),
            GoalPolicy::Lose { .. } | GoalPolicy::Gain { .. } => Some(change_factor),
        }
    }

    /// Target calories for an explicit calorie factor.
    pub fn calories_for_factor(&self, factor: f64) -> f64 {
        round_half_up(factor * self.calorie_reference_weight())
    }

    /// Whether the target depends on TDEE.
    pub fn needs_tdee(&self) -> bool {
        matches!(self, GoalPolicy::Maintain { .. })
    }
}

/// Resolved calorie factor and daily target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalorieTarget {
    pub factor: f64,
    pub calories: f64,
    /// True when the factor came from a manual override.
    pub overridden: bool,
}

/// Resolve the calorie factor and daily calorie target.
///
/// Maintain: factor = TDEE/kg (2 decimals) and the target is TDEE itself;
/// an overridden factor gives factor * weight. Lose/Gain: factor defaults to
/// `change_factor` and the target is factor * goal weight. Without the
/// inputs its branch needs (TDEE for maintain) the result is `None`.
pub fn resolve_target_calories(
    policy: Option<GoalPolicy>,
    tdee: Option<f64>,
    factor_override: Option<f64>,
    change_factor: f64,
) -> Option<CalorieTarget> {
    let policy = policy?;
    if policy.needs_tdee() && tdee.is_none() {
        return None;
    }

    if let Some(factor) = factor_override {
        return Some(CalorieTarget {
            factor,
            calories: policy.calories_for_factor(factor),
            overridden: true,
        });
    }

    let factor = policy.default_factor(tdee, change_factor)?;
    let calories = match policy {
        GoalPolicy::Maintain { .. } => tdee?,
        _ => policy.calories_for_factor(factor),
    };

    Some(CalorieTarget {
        factor,
        calories,
        overridden: false,
    })
}
