use std::fmt::{self, Write as _};
use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{FoodGroup, Macro, PortionTotals, Servings};
use crate::planner::conversions::{cm_to_feet_and_inches, kg_to_lbs};
use crate::planner::macros::calories_from;
use crate::planner::portions::{group_contribution, portion_totals};
use crate::state::PlanningSession;

/// Who a report is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Audience {
    Cadet,
    Dietitian,
}

/// One line of the dietitian macro grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRow {
    pub nutrient: Macro,
    pub grams: f64,
    pub calories: f64,
    pub grams_per_kg: f64,
    pub percent: f64,
}

/// Fully resolved values handed to a report. Nothing here is derived again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub cadet_name: String,
    pub sex: String,
    pub age: u32,
    pub height_feet: u32,
    pub height_inches: f64,
    pub weight_lbs: f64,
    pub goal_weight_lbs: Option<f64>,
    pub lean_body_mass_lbs: Option<f64>,
    pub goal: Option<String>,
    pub goal_notes: String,
    pub dietitian_notes: String,
    pub bmr_method: String,
    pub bmr: Option<f64>,
    pub physical_activity_factor: Option<f64>,
    pub tdee: Option<f64>,
    pub target_calories: Option<f64>,
    pub macros: Vec<MacroRow>,
    pub servings: Servings,
}

impl ReportSnapshot {
    /// Take a snapshot if the session has everything `audience` needs,
    /// otherwise fail with the list of missing values.
    pub fn capture(session: &PlanningSession, audience: Audience) -> Result<Self> {
        let missing = missing_for_export(session, audience);
        if !missing.is_empty() {
            return Err(PlannerError::NotReady(missing));
        }

        let bio = session.biometrics();
        let energy = session.energy();
        let profile = session.profile();
        let (Some(sex), Some(age), Some(height_cm), Some(weight_kg), Some(servings)) = (
            bio.sex,
            bio.age_years,
            bio.height_cm,
            bio.weight_kg,
            session.portions().and_then(|p| p.resolved()),
        ) else {
            return Err(PlannerError::NotReady(vec!["biometrics"]));
        };
        let (height_feet, height_inches) = cm_to_feet_and_inches(height_cm);
        let goal = session.goal();

        Ok(Self {
            cadet_name: profile.full_name(),
            sex: sex.label().to_string(),
            age,
            height_feet,
            height_inches,
            weight_lbs: kg_to_lbs(weight_kg),
            goal_weight_lbs: goal
                .goal
                .filter(|g| g.changes_weight())
                .and(goal.goal_weight_kg)
                .map(kg_to_lbs),
            lean_body_mass_lbs: bio.lean_body_mass_kg.map(kg_to_lbs),
            goal: goal.goal.map(|g| g.label().to_string()),
            goal_notes: profile.goal_notes.clone(),
            dietitian_notes: profile.dietitian_notes.clone(),
            bmr_method: energy.method.label().to_string(),
            bmr: energy.bmr,
            physical_activity_factor: energy.physical_activity_factor,
            tdee: energy.tdee,
            target_calories: energy.target_calories,
            macros: session
                .macros()
                .map(|m| {
                    Macro::ALL
                        .iter()
                        .map(|&which| MacroRow {
                            nutrient: which,
                            grams: m.plan.grams(which),
                            calories: calories_from(which, m.plan.grams(which)),
                            grams_per_kg: m.grams_per_kg(which),
                            percent: m.percent_of_calories(which),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            servings,
        })
    }

    pub fn totals(&self) -> PortionTotals {
        portion_totals(&self.servings)
    }
}

/// Values still missing before a report for `audience` may be produced.
///
/// Both reports need the name, core biometrics and all six serving counts.
/// The dietitian copy also prints the energy chain and macro grams.
pub fn missing_for_export(session: &PlanningSession, audience: Audience) -> Vec<&'static str> {
    let bio = session.biometrics();
    let energy = session.energy();
    let mut missing = Vec::new();

    if session.profile().full_name().is_empty() {
        missing.push("name");
    }
    if bio.sex.is_none() {
        missing.push("sex");
    }
    if bio.age_years.is_none() {
        missing.push("age");
    }
    if bio.height_cm.is_none() {
        missing.push("height");
    }
    if bio.weight_kg.is_none() {
        missing.push("weight");
    }
    match session.portions() {
        Some(plan) => missing.extend(plan.missing_groups().iter().map(|g| g.label())),
        None => missing.push("servings"),
    }

    if audience == Audience::Dietitian {
        if energy.bmr.is_none() {
            missing.push("BMR");
        }
        if energy.physical_activity_factor.is_none() {
            missing.push("physical activity factor");
        }
        if energy.tdee.is_none() {
            missing.push("TDEE");
        }
        if energy.target_calories.is_none() {
            missing.push("target calories");
        }
        if session.macros().is_none() {
            missing.push("macros");
        }
    }

    missing
}

/// Default file name for a report.
pub fn report_file_name(snapshot: &ReportSnapshot, audience: Audience) -> String {
    match audience {
        Audience::Cadet => "cadet-nutrition.txt".to_string(),
        Audience::Dietitian => {
            let prefix: String = snapshot
                .cadet_name
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            format!("{}_RDCopy.txt", prefix)
        }
    }
}

/// Hand-size measure and examples shown next to each group's servings.
pub fn portion_guide(group: FoodGroup) -> (&'static str, &'static [&'static str]) {
    match group {
        FoodGroup::Vegetable => (
            "fist-sized servings (1 fist = 1 cup)",
            &[
                "1 cup raw leafy greens",
                "1/2 cup chopped raw or cooked veggies",
                "6 baby carrots",
            ],
        ),
        FoodGroup::Fruit => (
            "fist-sized servings (1 fist = 1 cup)",
            &[
                "1 small piece of fruit (baseball size)",
                "1 small banana (1/2 large banana)",
                "1/2 cup berries or grapes",
                "1/2 cup canned fruit (in juice)",
                "1/4 cup dried fruit",
            ],
        ),
        FoodGroup::Grain => (
            "cupped hand servings (1 handful = 1/2 cup)",
            &[
                "1 slice bread",
                "1/2 bun or English muffin",
                "1/2 cup pasta, rice, or hot cereal",
                "1/2 cup potatoes, corn, peas",
                "1 bagel is 3-4 servings",
            ],
        ),
        FoodGroup::LeanProtein => (
            "palm-sized servings (1 palm = 3 oz)",
            &[
                "3 oz skinless chicken or turkey",
                "3 oz white fish, canned tuna",
                "3/4 cup egg substitute",
                "1 scoop protein powder",
            ],
        ),
        FoodGroup::Dairy => (
            "8 oz servings",
            &[
                "8 oz milk",
                "8 oz calcium fortified milk alternative",
                "8 oz yogurt",
                "1.5 oz cheese (2 string cheeses)",
            ],
        ),
        FoodGroup::Fat => ("thumb-sized servings", &[]),
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit).trim_end().to_string(),
        None => "-".to_string(),
    }
}

fn write_header(out: &mut String, snapshot: &ReportSnapshot, title: &str) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.len()))?;
    writeln!(out)?;
    writeln!(out, "Name:        {}", snapshot.cadet_name)?;
    writeln!(out, "Sex:         {}", snapshot.sex)?;
    writeln!(out, "Age:         {}", snapshot.age)?;
    writeln!(
        out,
        "Height:      {} ft {} in",
        snapshot.height_feet, snapshot.height_inches
    )?;
    writeln!(out, "Weight:      {} lbs", snapshot.weight_lbs)?;
    if let Some(goal_weight) = snapshot.goal_weight_lbs {
        writeln!(out, "Goal weight: {} lbs", goal_weight)?;
    }
    if let Some(goal) = &snapshot.goal {
        writeln!(out, "Goal:        {}", goal)?;
    }
    if !snapshot.goal_notes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Goals:")?;
        writeln!(out, "  {}", snapshot.goal_notes)?;
    }
    writeln!(out)
}

fn write_cadet(out: &mut String, snapshot: &ReportSnapshot) -> fmt::Result {
    write_header(out, snapshot, "Nutrition Plan")?;

    writeln!(out, "Recommended Daily Portions")?;
    writeln!(out, "--------------------------")?;
    for (group, servings) in snapshot.servings.iter() {
        let (measure, examples) = portion_guide(group);
        writeln!(out)?;
        writeln!(out, "{:<13} {} {}", group.label(), servings, measure)?;
        for example in examples {
            writeln!(out, "  - {}", example)?;
        }
    }
    Ok(())
}

fn write_dietitian(out: &mut String, snapshot: &ReportSnapshot) -> fmt::Result {
    write_header(out, snapshot, "Nutrition Plan - Dietitian Copy")?;

    if let Some(lbm) = snapshot.lean_body_mass_lbs {
        writeln!(out, "LBM:         {} lbs", lbm)?;
    }
    writeln!(
        out,
        "BMR:         {} ({})",
        fmt_opt(snapshot.bmr, "cal"),
        snapshot.bmr_method
    )?;
    writeln!(
        out,
        "PAF:         {}",
        fmt_opt(snapshot.physical_activity_factor, "")
    )?;
    writeln!(out, "TDEE:        {}", fmt_opt(snapshot.tdee, "cal"))?;
    writeln!(
        out,
        "Target:      {}",
        fmt_opt(snapshot.target_calories, "cal")
    )?;

    if !snapshot.dietitian_notes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Dietitian notes:")?;
        writeln!(out, "  {}", snapshot.dietitian_notes)?;
    }

    if !snapshot.macros.is_empty() {
        writeln!(out)?;
        writeln!(out, "Macronutrients")?;
        writeln!(out, "--------------")?;
        writeln!(
            out,
            "{:<10} {:>8} {:>8} {:>8} {:>6}",
            "", "grams", "cal", "g/kg", "%"
        )?;
        for row in &snapshot.macros {
            writeln!(
                out,
                "{:<10} {:>8} {:>8} {:>8} {:>5}%",
                row.nutrient.label(),
                row.grams,
                row.calories,
                row.grams_per_kg,
                row.percent
            )?;
        }
        let total: f64 = snapshot.macros.iter().map(|r| r.calories).sum();
        writeln!(out, "{:<10} {:>8} {:>8}", "Total", "", total)?;
    }

    writeln!(out)?;
    writeln!(out, "Servings")?;
    writeln!(out, "--------")?;
    writeln!(
        out,
        "{:<13} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "", "servings", "protein", "carbs", "fat", "cal"
    )?;
    for (group, servings) in snapshot.servings.iter() {
        let c = group_contribution(group, servings);
        writeln!(
            out,
            "{:<13} {:>8} {:>8} {:>8} {:>8} {:>8}",
            group.label(),
            servings,
            c.protein_grams,
            c.carb_grams,
            c.fat_grams,
            c.calories
        )?;
    }
    let t = snapshot.totals();
    writeln!(
        out,
        "{:<13} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Total", "", t.protein_grams, t.carb_grams, t.fat_grams, t.calories
    )
}

/// Cadet-facing report: biometrics, goal and recommended portions.
pub fn render_cadet_report(snapshot: &ReportSnapshot) -> Result<String> {
    let mut out = String::new();
    write_cadet(&mut out, snapshot)?;
    Ok(out)
}

/// Dietitian copy: adds the energy chain, macro grid and serving grid.
pub fn render_dietitian_report(snapshot: &ReportSnapshot) -> Result<String> {
    let mut out = String::new();
    write_dietitian(&mut out, snapshot)?;
    Ok(out)
}

pub fn render_report(snapshot: &ReportSnapshot, audience: Audience) -> Result<String> {
    match audience {
        Audience::Cadet => render_cadet_report(snapshot),
        Audience::Dietitian => render_dietitian_report(snapshot),
    }
}

/// Serving grid with per-group breakdown and a grand total row, as CSV.
pub fn write_serving_grid<W: io::Write>(snapshot: &ReportSnapshot, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "group",
        "servings",
        "protein_g",
        "carb_g",
        "fat_g",
        "calories",
    ])?;

    for (group, servings) in snapshot.servings.iter() {
        let c = group_contribution(group, servings);
        wtr.write_record([
            group.label().to_string(),
            servings.to_string(),
            c.protein_grams.to_string(),
            c.carb_grams.to_string(),
            c.fat_grams.to_string(),
            c.calories.to_string(),
        ])?;
    }

    let t = snapshot.totals();
    wtr.write_record([
        "Total".to_string(),
        String::new(),
        t.protein_grams.to_string(),
        t.carb_grams.to_string(),
        t.fat_grams.to_string(),
        t.calories.to_string(),
    ])?;

    wtr.flush()?;
    Ok(())
}
