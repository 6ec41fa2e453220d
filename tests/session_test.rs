use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, tempdir};

use cadet_nutrition_planner::PlannerError;
use cadet_nutrition_planner::interface::{
    Audience, ReportSnapshot, render_report, report_file_name, write_serving_grid,
};
use cadet_nutrition_planner::models::{FoodGroup, Macro};
use cadet_nutrition_planner::planner::PlannerConfig;
use cadet_nutrition_planner::state::{PlanStage, PlanningSession, load_form, save_form};

const SAVED_FORM: &str = r#"{
    "first_name": "Jordan",
    "last_name": "Lee",
    "sex": "Male",
    "age": "30",
    "height_feet": "5",
    "height_inches": "11",
    "weight_lbs": "176",
    "goal": "Maintain weight",
    "goal_notes": "Stay ready for the fitness test",
    "method": "Mifflin-St. Jeor",
    "physical_activity_factor": "1.5"
}"#;

fn saved_form_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAVED_FORM.as_bytes()).unwrap();
    file
}

#[test]
fn test_saved_form_resolves_whole_plan() {
    let file = saved_form_file();
    let form = load_form(file.path()).unwrap();
    let (session, rejected) = PlanningSession::from_form(&form, PlannerConfig::default());

    assert!(rejected.is_empty());
    assert_eq!(session.stage(), PlanStage::PortionsResolved);
    assert_eq!(session.energy().bmr, Some(1780.0));
    assert_eq!(session.energy().tdee, Some(2670.0));
    assert_eq!(session.energy().target_calories, Some(2670.0));
    assert!(session.portion_check().is_some());
}

#[test]
fn test_overrides_survive_save_and_reload() {
    let file = saved_form_file();
    let mut form = load_form(file.path()).unwrap();
    form.macro_grams.insert(Macro::Protein, "150".into());
    form.servings.insert(FoodGroup::Fruit, "2".into());

    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    save_form(&path, &form).unwrap();

    let reloaded = load_form(&path).unwrap();
    let (session, _) = PlanningSession::from_form(&reloaded, PlannerConfig::default());
    assert_eq!(session.macros().unwrap().plan.protein_grams, 150.0);
    assert_eq!(session.portions().unwrap().count(FoodGroup::Fruit), Some(2.0));
}

#[test]
fn test_saved_overrides_reset_after_weight_edit() {
    let file = saved_form_file();
    let mut form = load_form(file.path()).unwrap();
    let (mut session, _) = PlanningSession::from_form(&form, PlannerConfig::default());
    session.set_target_calorie_factor(Some(30.0));
    session.set_macro_grams(Macro::Protein, 150.0);
    session.set_servings(FoodGroup::Fruit, Some(2.0));
    session.store_overrides(&mut form);

    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.json");
    save_form(&path, &form).unwrap();

    let mut edited = load_form(&path).unwrap();
    assert!(edited.basis.is_some());
    edited.weight_lbs = "200".into();
    save_form(&path, &edited).unwrap();

    let reloaded = load_form(&path).unwrap();
    let (session, _) = PlanningSession::from_form(&reloaded, PlannerConfig::default());
    let target = session.calorie_target().unwrap();
    assert!(!target.overridden);
    assert_eq!(target.calories, 2834.0);

    let macros = session.macros().unwrap();
    assert_eq!(macros.plan.protein_grams, 145.0);
    assert_eq!(macros.plan, macros.defaults);

    let plan = session.portions().unwrap();
    assert_eq!(plan.count(FoodGroup::Fruit), Some(plan.template.servings.fruit));
}

#[test]
fn test_config_tolerance_changes_check() {
    let file = saved_form_file();
    let form = load_form(file.path()).unwrap();

    let strict = PlannerConfig {
        macro_calorie_tolerance_kcal: 0.0,
        ..PlannerConfig::default()
    };
    let (session, _) = PlanningSession::from_form(&form, strict);
    // Defaults come to 2669 kcal against a 2670 target.
    assert!(!session.macros().unwrap().calorie_check.status.is_within());

    let (session, _) = PlanningSession::from_form(&form, PlannerConfig::default());
    assert!(session.macros().unwrap().calorie_check.status.is_within());
}

#[test]
fn test_reports_written_to_disk() {
    let file = saved_form_file();
    let form = load_form(file.path()).unwrap();
    let (session, _) = PlanningSession::from_form(&form, PlannerConfig::default());

    let snapshot = ReportSnapshot::capture(&session, Audience::Dietitian).unwrap();
    let dir = tempdir().unwrap();

    let report_path = dir.path().join(report_file_name(&snapshot, Audience::Dietitian));
    let text = render_report(&snapshot, Audience::Dietitian).unwrap();
    fs::write(&report_path, text).unwrap();
    let text = fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("Stay ready for the fitness test"));
    assert!(text.contains("BMR:         1780 cal (Mifflin-St. Jeor)"));

    let csv_path = dir.path().join("grid.csv");
    write_serving_grid(&snapshot, fs::File::create(&csv_path).unwrap()).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(&rows[0][0], "Vegetables");
    assert_eq!(&rows[6][0], "Total");
    assert_eq!(&rows[6][5], "2525");
}

#[test]
fn test_incomplete_form_blocks_report() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{"first_name": "Jordan", "sex": "Male"}"#).unwrap();
    let form = load_form(file.path()).unwrap();
    let (session, _) = PlanningSession::from_form(&form, PlannerConfig::default());

    assert_eq!(session.stage(), PlanStage::BiometricsPartial);
    let err = ReportSnapshot::capture(&session, Audience::Cadet).unwrap_err();
    match &err {
        PlannerError::NotReady(missing) => {
            assert_eq!(missing, &vec!["age", "height", "weight", "servings"]);
        }
        other => panic!("expected NotReady, got {:?}", other),
    }
    assert!(err.to_string().contains("missing: age, height, weight, servings"));
}
