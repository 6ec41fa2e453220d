use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use cadet_nutrition_planner::cli::{Cli, Command};
use cadet_nutrition_planner::error::Result;
use cadet_nutrition_planner::interface::{
    Audience, ReportSnapshot, collect_form, display_rejected, display_session, edit_macros,
    edit_servings, missing_for_export, prompt_yes_no, render_report, report_file_name,
    write_serving_grid,
};
use cadet_nutrition_planner::logging;
use cadet_nutrition_planner::models::{EnergyState, FormInput};
use cadet_nutrition_planner::planner::{DailyPortionPlan, MacroAllocation, PortionCheck};
use cadet_nutrition_planner::state::{PlanStage, load_form, save_form};
use cadet_nutrition_planner::{PlannerConfig, PlanningSession};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = PlannerConfig::load_or_default(cli.config.as_deref())?;
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan { file } => cmd_plan(&file, config),
        Command::Compute { input, json } => cmd_compute(&input, json, config),
        Command::Report {
            input,
            audience,
            out,
            csv,
        } => cmd_report(&input, audience, out, csv, config),
    }
}

/// Fill in the form interactively, show the plan, then offer to save.
fn cmd_plan(file: &Path, config: PlannerConfig) -> Result<()> {
    let form = if file.exists() {
        let form = load_form(file)?;
        println!("Loaded {}", file.display());
        form
    } else {
        FormInput::default()
    };

    let mut form = collect_form(&form)?;
    let (mut session, rejected) = PlanningSession::from_form(&form, config);
    display_rejected(&rejected);
    display_session(&session);

    if session.macros().is_some() && prompt_yes_no("Adjust macros?", false)? {
        edit_macros(&mut session)?;
    }
    if session.portions().is_some() && prompt_yes_no("Adjust servings?", false)? {
        edit_servings(&mut session, &mut form)?;
    }

    for audience in [Audience::Cadet, Audience::Dietitian] {
        let missing = missing_for_export(&session, audience);
        if missing.is_empty() {
            println!("{:?} report: ready", audience);
        } else {
            println!("{:?} report: missing {}", audience, missing.join(", "));
        }
    }
    println!();

    if prompt_yes_no(&format!("Save form to {}?", file.display()), true)? {
        session.store_overrides(&mut form);
        save_form(file, &form)?;
        println!("Form saved.");
    }

    Ok(())
}

#[derive(Serialize)]
struct ComputeOutput<'a> {
    stage: PlanStage,
    energy: &'a EnergyState,
    macros: Option<&'a MacroAllocation>,
    portions: Option<&'a DailyPortionPlan>,
    portion_check: Option<&'a PortionCheck>,
    rejected: &'a [String],
}

/// Derive a saved form and print the result.
fn cmd_compute(input: &Path, json: bool, config: PlannerConfig) -> Result<()> {
    let form = load_form(input)?;
    let (session, rejected) = PlanningSession::from_form(&form, config);

    if json {
        let output = ComputeOutput {
            stage: session.stage(),
            energy: session.energy(),
            macros: session.macros(),
            portions: session.portions(),
            portion_check: session.portion_check(),
            rejected: &rejected,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display_rejected(&rejected);
    display_session(&session);
    Ok(())
}

/// Render a report for a saved form, refusing when the plan is incomplete.
fn cmd_report(
    input: &Path,
    audience: Audience,
    out: Option<PathBuf>,
    csv: Option<PathBuf>,
    config: PlannerConfig,
) -> Result<()> {
    let form = load_form(input)?;
    let (session, rejected) = PlanningSession::from_form(&form, config);
    display_rejected(&rejected);

    let snapshot = ReportSnapshot::capture(&session, audience)?;
    let text = render_report(&snapshot, audience)?;

    match out {
        Some(out) => {
            let out = if out.is_dir() {
                out.join(report_file_name(&snapshot, audience))
            } else {
                out
            };
            fs::write(&out, text)?;
            eprintln!("Report written to {}", out.display());
        }
        None => print!("{}", text),
    }

    if let Some(csv_path) = csv {
        let file = fs::File::create(&csv_path)?;
        write_serving_grid(&snapshot, file)?;
        eprintln!("Serving grid written to {}", csv_path.display());
    }

    Ok(())
}
