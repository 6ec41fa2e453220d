use std::collections::BTreeMap;

use assert_float_eq::assert_float_absolute_eq;

use cadet_nutrition_planner::models::{Biometrics, EstimationMethod, FoodGroup, Goal, Macro, Sex};
use cadet_nutrition_planner::planner::{
    DailyPortionPlan, GoalPolicy, allocate_macros, calculate_tdee, check_portions,
    estimate_bmr, estimate_bmr_raw, resolve_target_calories,
};

fn cadet(sex: Sex, weight_kg: f64, height_cm: f64, age: u32) -> Biometrics {
    Biometrics {
        sex: Some(sex),
        weight_kg: Some(weight_kg),
        height_cm: Some(height_cm),
        age_years: Some(age),
        lean_body_mass_kg: None,
    }
}

#[test]
fn test_maintain_chain_end_to_end() {
    let bio = cadet(Sex::Male, 80.0, 180.0, 30);

    let bmr = estimate_bmr(&bio, EstimationMethod::MifflinStJeor);
    assert_eq!(bmr, Some(1780.0));

    let tdee = calculate_tdee(bmr, Some(1.5));
    assert_eq!(tdee, Some(2670.0));

    let policy = GoalPolicy::resolve(Some(Goal::MaintainWeight), Some(80.0), None);
    let target = resolve_target_calories(policy, tdee, None, 33.0).unwrap();
    assert_eq!(target.calories, 2670.0);
    assert_eq!(target.factor, 33.38);

    let alloc = allocate_macros(Some(target.calories), policy.as_ref(), &BTreeMap::new(), 50.0)
        .unwrap();
    assert_eq!(alloc.plan.protein_grams, 128.0);
    assert_eq!(alloc.plan.fat_grams, 89.0);
    assert_eq!(alloc.plan.carb_grams, 339.0);
    assert!(alloc.calorie_check.status.is_within());

    let plan = DailyPortionPlan::seed(&alloc.plan);
    assert_eq!(plan.seed_calories, 2669.0);
    assert_eq!(plan.template.band_calories, 2800);

    let totals = plan.totals().unwrap();
    assert_eq!(totals.protein_grams, 171.0);
    assert_eq!(totals.carb_grams, 276.0);
    assert_eq!(totals.fat_grams, 85.0);
    assert_eq!(totals.calories, 2525.0);

    // Checks are advisory: the plan still exists when they fail.
    let check = check_portions(&totals, &alloc.plan, plan.seed_calories, 10.0, 100.0);
    assert!(!check.protein.status.is_within());
    assert!(!check.carb.status.is_within());
    assert!(check.fat.status.is_within());
    assert!(!check.calories.status.is_within());
    assert!(!check.all_within());
}

#[test]
fn test_lean_mass_methods_fall_back_to_estimate() {
    let bio = cadet(Sex::Female, 60.0, 165.0, 25);

    // Boer: 0.252*60 + 0.473*165 - 48.3 = 44.865 kg
    let katch = estimate_bmr_raw(&bio, EstimationMethod::KatchMcArdle).unwrap();
    assert_float_absolute_eq!(katch, 370.0 + 21.6 * 44.865, 1e-9);
    assert_eq!(estimate_bmr(&bio, EstimationMethod::KatchMcArdle), Some(1339.0));

    let supplied = Biometrics {
        lean_body_mass_kg: Some(50.0),
        ..bio
    };
    assert_eq!(estimate_bmr(&supplied, EstimationMethod::Cunningham), Some(1600.0));
    assert_eq!(estimate_bmr(&supplied, EstimationMethod::KatchMcArdle), Some(1450.0));
}

#[test]
fn test_every_method_needs_full_biometrics() {
    let mut bio = cadet(Sex::Male, 80.0, 180.0, 30);
    bio.age_years = None;
    bio.lean_body_mass_kg = Some(60.0);

    for method in EstimationMethod::ALL {
        assert_eq!(estimate_bmr(&bio, method), None, "{:?}", method);
    }
}

#[test]
fn test_lose_goal_macros_need_current_weight() {
    let policy = GoalPolicy::resolve(Some(Goal::LoseWeight), None, Some(75.0));
    let target = resolve_target_calories(policy, None, None, 33.0).unwrap();
    assert_eq!(target.calories, 2475.0);

    assert!(allocate_macros(Some(target.calories), policy.as_ref(), &BTreeMap::new(), 50.0)
        .is_none());

    let policy = GoalPolicy::resolve(Some(Goal::LoseWeight), Some(80.0), Some(75.0));
    let alloc = allocate_macros(Some(2475.0), policy.as_ref(), &BTreeMap::new(), 50.0).unwrap();
    // Protein scales with current weight, not goal weight.
    assert_eq!(alloc.plan.protein_grams, 128.0);
}

#[test]
fn test_override_clamped_then_portions_follow() {
    let policy = GoalPolicy::resolve(Some(Goal::MaintainWeight), Some(80.0), None);
    let mut overrides = BTreeMap::new();
    overrides.insert(Macro::Carb, 10.0);

    let alloc = allocate_macros(Some(2000.0), policy.as_ref(), &overrides, 50.0).unwrap();
    assert_eq!(alloc.plan.carb_grams, alloc.bounds.carb.min);

    let mut plan = DailyPortionPlan::seed(&alloc.plan);
    plan.set_count(FoodGroup::Fat, None);
    assert_eq!(plan.missing_groups(), vec![FoodGroup::Fat]);
    assert!(plan.totals().is_none());

    plan.set_count(FoodGroup::Fat, Some(0.0));
    assert!(plan.totals().is_some());
}
