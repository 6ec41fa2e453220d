use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::models::{
    Biometrics, EnergyState, EstimationMethod, FoodGroup, FormInput, Goal, GoalSpec, Macro,
    OverrideBasis, Sex,
};
use crate::planner::conversions::{feet_and_inches_to_cm, lbs_to_kg};
use crate::planner::validation::{parse_age, parse_count, parse_number, parse_positive};
use crate::planner::{
    CalorieTarget, DailyPortionPlan, GoalPolicy, MacroAllocation, PlannerConfig, PortionCheck,
    allocate_macros, calculate_tdee, check_portions, estimate_bmr, resolve_target_calories,
};

/// How far the pipeline has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanStage {
    Empty,
    BiometricsPartial,
    BiometricsComplete,
    EnergyResolved,
    MacroResolved,
    PortionsResolved,
}

/// Names and free text carried through to the reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CadetProfile {
    pub first_name: String,
    pub last_name: String,
    pub goal_notes: String,
    pub dietitian_notes: String,
}

impl CadetProfile {
    /// "First Last", empty when neither name is given.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Upstream values a calorie-factor override was made against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FactorBasis {
    tdee: Option<f64>,
    policy: Option<GoalPolicy>,
}

/// Upstream values macro overrides were made against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MacroBasis {
    target_calories: Option<f64>,
    body_weight_kg: Option<f64>,
}

/// One planning session: inputs, user overrides and everything derived.
///
/// Every setter re-derives the whole chain before returning, so readers
/// never see a half-updated state. Overrides are tied to the upstream values
/// they were made against and are dropped as soon as those change.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    config: PlannerConfig,
    profile: CadetProfile,

    biometrics: Biometrics,
    goal: GoalSpec,
    method: EstimationMethod,
    physical_activity_factor: Option<f64>,

    factor_override: Option<f64>,
    macro_overrides: BTreeMap<Macro, f64>,
    serving_overrides: BTreeMap<FoodGroup, Option<f64>>,

    factor_basis: Option<FactorBasis>,
    macro_basis: Option<MacroBasis>,
    portion_basis: Option<u32>,

    energy: EnergyState,
    policy: Option<GoalPolicy>,
    calorie_target: Option<CalorieTarget>,
    macros: Option<MacroAllocation>,
    portions: Option<DailyPortionPlan>,
    portion_check: Option<PortionCheck>,
}

impl PlanningSession {
    pub fn new(config: PlannerConfig) -> Self {
        let mut session = Self {
            config,
            profile: CadetProfile::default(),
            biometrics: Biometrics::default(),
            goal: GoalSpec::default(),
            method: EstimationMethod::default(),
            physical_activity_factor: None,
            factor_override: None,
            macro_overrides: BTreeMap::new(),
            serving_overrides: BTreeMap::new(),
            factor_basis: None,
            macro_basis: None,
            portion_basis: None,
            energy: EnergyState::default(),
            policy: None,
            calorie_target: None,
            macros: None,
            portions: None,
            portion_check: None,
        };
        session.recompute();
        session
    }

    /// Build a session from a raw form, applying overrides in pipeline order.
    ///
    /// Unusable text leaves the field absent. An override saved against
    /// upstream values that no longer hold is dropped, the same as a live
    /// edit would drop it. Returns the session together with a description
    /// of every field that was rejected.
    pub fn from_form(form: &FormInput, config: PlannerConfig) -> (Self, Vec<String>) {
        let mut rejected = Vec::new();
        let mut session = Self::new(config);

        session.profile = CadetProfile {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            goal_notes: form.goal_notes.trim().to_string(),
            dietitian_notes: form.dietitian_notes.trim().to_string(),
        };

        let mut number = |field: &str, text: &str| -> Option<f64> {
            accept(field, parse_positive(text), &mut rejected)
        };

        let feet = number("height_feet", &form.height_feet);
        let inches = number("height_inches", &form.height_inches);
        let weight_lbs = number("weight_lbs", &form.weight_lbs);
        let lbm_lbs = number("lean_body_mass_lbs", &form.lean_body_mass_lbs);
        let goal_weight_lbs = number("goal_weight_lbs", &form.goal_weight_lbs);
        let activity = number("physical_activity_factor", &form.physical_activity_factor);
        let factor = number("target_calorie_factor", &form.target_calorie_factor);
        let age = accept("age", parse_age(&form.age), &mut rejected);

        let sex = label(&form.sex, "sex", Sex::from_label, &mut rejected);
        let goal = label(&form.goal, "goal", Goal::from_label, &mut rejected);
        let method = label(
            &form.method,
            "method",
            EstimationMethod::from_label,
            &mut rejected,
        );

        session.biometrics = Biometrics {
            sex,
            weight_kg: lbs_to_kg(weight_lbs),
            height_cm: feet_and_inches_to_cm(feet, inches),
            age_years: age,
            lean_body_mass_kg: lbs_to_kg(lbm_lbs),
        };
        session.goal = GoalSpec {
            goal,
            goal_weight_kg: lbs_to_kg(goal_weight_lbs),
        };
        if let Some(method) = method {
            session.method = method;
        }
        session.physical_activity_factor = activity;
        session.recompute();

        let still_applies = |session: &Self, matches: fn(&OverrideBasis, &OverrideBasis) -> bool| {
            form.basis
                .as_ref()
                .is_none_or(|saved| matches(saved, &session.override_basis()))
        };

        if factor.is_some() {
            if still_applies(&session, OverrideBasis::factor_matches) {
                session.set_target_calorie_factor(factor);
            } else {
                info!("saved calorie factor override dropped, upstream values changed");
            }
        }

        if !form.macro_grams.is_empty() {
            if still_applies(&session, OverrideBasis::macros_match) {
                for (&which, text) in &form.macro_grams {
                    if text.trim().is_empty() {
                        continue;
                    }
                    if let Some(grams) = accept(which.label(), parse_number(text), &mut rejected) {
                        session.set_macro_grams(which, grams);
                    }
                }
            } else {
                info!("saved macro overrides dropped, upstream values changed");
            }
        }

        if !form.servings.is_empty() {
            if still_applies(&session, OverrideBasis::servings_match) {
                for (&group, text) in &form.servings {
                    if text.trim().is_empty() {
                        continue;
                    }
                    let count = accept(group.label(), parse_count(text), &mut rejected);
                    session.set_servings(group, count);
                }
            } else {
                info!("saved serving overrides dropped, template changed");
            }
        }

        (session, rejected)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inputs
    // ─────────────────────────────────────────────────────────────────────

    // Quantities below are absent unless finite and positive.

    pub fn set_sex(&mut self, sex: Option<Sex>) {
        self.biometrics.sex = sex;
        self.recompute();
    }

    pub fn set_weight_kg(&mut self, weight_kg: Option<f64>) {
        self.biometrics.weight_kg = positive("weight_kg", weight_kg);
        self.recompute();
    }

    pub fn set_height_cm(&mut self, height_cm: Option<f64>) {
        self.biometrics.height_cm = positive("height_cm", height_cm);
        self.recompute();
    }

    pub fn set_age(&mut self, age_years: Option<u32>) {
        self.biometrics.age_years = age_years.filter(|a| *a > 0);
        self.recompute();
    }

    pub fn set_lean_body_mass_kg(&mut self, lean_body_mass_kg: Option<f64>) {
        self.biometrics.lean_body_mass_kg = positive("lean_body_mass_kg", lean_body_mass_kg);
        self.recompute();
    }

    pub fn set_goal(&mut self, goal: Option<Goal>) {
        self.goal.goal = goal;
        self.recompute();
    }

    pub fn set_goal_weight_kg(&mut self, goal_weight_kg: Option<f64>) {
        self.goal.goal_weight_kg = positive("goal_weight_kg", goal_weight_kg);
        self.recompute();
    }

    pub fn set_method(&mut self, method: EstimationMethod) {
        self.method = method;
        self.recompute();
    }

    pub fn set_physical_activity_factor(&mut self, factor: Option<f64>) {
        self.physical_activity_factor = positive("physical_activity_factor", factor);
        self.recompute();
    }

    /// Text variant used by interactive editing; unusable text clears TDEE.
    pub fn set_physical_activity_factor_text(&mut self, text: &str) {
        let factor = parse_positive(text)
            .inspect_err(|e| warn!(error = %e, "physical activity factor rejected"))
            .ok();
        self.set_physical_activity_factor(factor);
    }

    /// Manual calorie factor. `None` returns to the derived factor.
    pub fn set_target_calorie_factor(&mut self, factor: Option<f64>) {
        self.factor_override = positive("target_calorie_factor", factor);
        self.recompute();
    }

    /// Move one macro slider. The value is clamped into its bounds.
    pub fn set_macro_grams(&mut self, which: Macro, grams: f64) {
        if !grams.is_finite() {
            warn!(?which, grams, "macro grams rejected");
            return;
        }
        self.macro_overrides.insert(which, grams);
        self.recompute();
    }

    /// Override one serving count. `None` marks the entry as unusable.
    pub fn set_servings(&mut self, group: FoodGroup, servings: Option<f64>) {
        let servings = servings.filter(|s| s.is_finite() && *s >= 0.0);
        self.serving_overrides.insert(group, servings);
        self.recompute();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recompute
    // ─────────────────────────────────────────────────────────────────────

    /// Re-derive every stage from the current inputs in one pass.
    fn recompute(&mut self) {
        let bmr = estimate_bmr(&self.biometrics, self.method);
        let tdee = calculate_tdee(bmr, self.physical_activity_factor);
        let policy = GoalPolicy::resolve(
            self.goal.goal,
            self.biometrics.weight_kg,
            self.goal.goal_weight_kg,
        );

        let factor_basis = FactorBasis { tdee, policy };
        if self.factor_basis != Some(factor_basis) {
            if let Some(old) = self.factor_override.take() {
                info!(factor = old, "calorie factor override reset by upstream change");
            }
            self.factor_basis = Some(factor_basis);
        }

        let calorie_target = resolve_target_calories(
            policy,
            tdee,
            self.factor_override,
            self.config.default_target_calorie_factor,
        );

        self.energy = EnergyState {
            method: self.method,
            bmr,
            physical_activity_factor: self.physical_activity_factor,
            tdee,
            target_calorie_factor: calorie_target.map(|t| t.factor),
            target_calories: calorie_target.map(|t| t.calories),
        };
        self.policy = policy;
        self.calorie_target = calorie_target;

        let macro_basis = MacroBasis {
            target_calories: self.energy.target_calories,
            body_weight_kg: policy.and_then(|p| p.body_weight_kg()),
        };
        if self.macro_basis != Some(macro_basis) {
            if !self.macro_overrides.is_empty() {
                info!(
                    overrides = self.macro_overrides.len(),
                    "macro overrides reset by upstream change"
                );
                self.macro_overrides.clear();
            }
            self.macro_basis = Some(macro_basis);
        }

        self.macros = allocate_macros(
            self.energy.target_calories,
            policy.as_ref(),
            &self.macro_overrides,
            self.config.macro_calorie_tolerance_kcal,
        );

        self.portions = self.macros.as_ref().map(|m| DailyPortionPlan::seed(&m.plan));

        let band = self.portions.as_ref().map(|p| p.template.band_calories);
        if self.portion_basis != band {
            if !self.serving_overrides.is_empty() {
                info!(?band, "serving overrides reset by template change");
                self.serving_overrides.clear();
            }
            self.portion_basis = band;
        }

        if let Some(plan) = self.portions.as_mut() {
            for (&group, &count) in &self.serving_overrides {
                plan.set_count(group, count);
            }
        }

        self.portion_check = match (&self.portions, &self.macros) {
            (Some(plan), Some(macros)) => plan.totals().map(|totals| {
                check_portions(
                    &totals,
                    &macros.plan,
                    plan.seed_calories,
                    self.config.macro_tolerance_g,
                    self.config.portion_calorie_tolerance_kcal,
                )
            }),
            _ => None,
        };

        debug!(
            stage = ?self.stage(),
            bmr = ?self.energy.bmr,
            tdee = ?self.energy.tdee,
            target_calories = ?self.energy.target_calories,
            "session recomputed"
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived values
    // ─────────────────────────────────────────────────────────────────────

    pub fn stage(&self) -> PlanStage {
        if self.portions.as_ref().and_then(|p| p.resolved()).is_some() {
            PlanStage::PortionsResolved
        } else if self.macros.is_some() {
            PlanStage::MacroResolved
        } else if self.energy.target_calories.is_some() {
            PlanStage::EnergyResolved
        } else if self.energy.bmr.is_some() {
            PlanStage::BiometricsComplete
        } else if !self.biometrics.is_empty() {
            PlanStage::BiometricsPartial
        } else {
            PlanStage::Empty
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn profile(&self) -> &CadetProfile {
        &self.profile
    }

    pub fn biometrics(&self) -> &Biometrics {
        &self.biometrics
    }

    pub fn goal(&self) -> &GoalSpec {
        &self.goal
    }

    pub fn method(&self) -> EstimationMethod {
        self.method
    }

    pub fn energy(&self) -> &EnergyState {
        &self.energy
    }

    pub fn policy(&self) -> Option<&GoalPolicy> {
        self.policy.as_ref()
    }

    pub fn calorie_target(&self) -> Option<&CalorieTarget> {
        self.calorie_target.as_ref()
    }

    pub fn macros(&self) -> Option<&MacroAllocation> {
        self.macros.as_ref()
    }

    pub fn portions(&self) -> Option<&DailyPortionPlan> {
        self.portions.as_ref()
    }

    pub fn portion_check(&self) -> Option<&PortionCheck> {
        self.portion_check.as_ref()
    }

    /// Upstream values the current overrides are measured against.
    pub fn override_basis(&self) -> OverrideBasis {
        OverrideBasis {
            tdee: self.energy.tdee,
            goal: self.policy.map(|p| p.goal()),
            body_weight_kg: self.policy.and_then(|p| p.body_weight_kg()),
            calorie_reference_weight_kg: self.policy.map(|p| p.calorie_reference_weight()),
            target_calories: self.energy.target_calories,
            band_calories: self.portion_basis,
        }
    }

    /// Write the overrides still in effect back into `form`, with their basis.
    ///
    /// A serving entry that was unusable keeps the text the user typed.
    pub fn store_overrides(&self, form: &mut FormInput) {
        form.target_calorie_factor = self
            .factor_override
            .map(|f| f.to_string())
            .unwrap_or_default();
        form.macro_grams = self
            .macro_overrides
            .iter()
            .map(|(&which, grams)| (which, grams.to_string()))
            .collect();

        let typed = std::mem::take(&mut form.servings);
        form.servings = self
            .serving_overrides
            .iter()
            .map(|(&group, count)| {
                let text = match count {
                    Some(count) => count.to_string(),
                    None => typed.get(&group).cloned().unwrap_or_default(),
                };
                (group, text)
            })
            .collect();

        form.basis = Some(self.override_basis());
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

fn positive(field: &str, value: Option<f64>) -> Option<f64> {
    let kept = value.filter(|v| v.is_finite() && *v > 0.0);
    if let (Some(v), None) = (value, kept) {
        warn!(field, value = v, "value rejected, must be finite and positive");
    }
    kept
}

/// Keep a parsed value, or record why it was rejected. Empty text is simply
/// absent and not reported.
fn accept<T>(field: &str, parsed: Result<T, ParseError>, rejected: &mut Vec<String>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(ParseError::Empty) => None,
        Err(e) => {
            warn!(field, error = %e, "form field rejected");
            rejected.push(format!("{}: {}", field, e));
            None
        }
    }
}

fn label<T>(
    text: &str,
    kind: &'static str,
    parse: impl Fn(&str) -> Option<T>,
    rejected: &mut Vec<String>,
) -> Option<T> {
    if text.trim().is_empty() {
        return None;
    }
    let parsed = parse(text);
    if parsed.is_none() {
        warn!(kind, value = text, "unknown label");
        rejected.push(format!("{}: unknown value '{}'", kind, text.trim()));
    }
    parsed
}
