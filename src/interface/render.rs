use crate::models::{FoodGroup, Macro, ToleranceCheck};
use crate::planner::portions::group_contribution;
use crate::planner::{DailyPortionPlan, MacroAllocation, PortionCheck};
use crate::state::PlanningSession;

fn value_or_dash(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// "OK" or "OFF by N" for a tolerance check.
pub fn check_marker(check: &ToleranceCheck) -> String {
    if check.status.is_within() {
        "OK".to_string()
    } else {
        format!("OFF by {:+.0}", check.deviation())
    }
}

/// Display BMR, TDEE and the calorie target.
pub fn display_energy(session: &PlanningSession) {
    let energy = session.energy();

    println!();
    println!("=== Energy ===");
    println!();
    println!("Method:            {}", energy.method.label());
    println!("BMR:               {}", value_or_dash(energy.bmr));
    if !session.biometrics().is_complete() {
        println!("                   (needs sex, weight, height and age)");
    }
    println!(
        "Activity factor:   {}",
        value_or_dash(energy.physical_activity_factor)
    );
    println!("TDEE:              {}", value_or_dash(energy.tdee));

    let overridden = session.calorie_target().is_some_and(|t| t.overridden);
    println!(
        "Calorie factor:    {}{}",
        value_or_dash(energy.target_calorie_factor),
        if overridden { " (manual)" } else { "" }
    );
    println!("Target calories:   {}", value_or_dash(energy.target_calories));
}

/// Display the macro split with bounds and the calorie cross-check.
pub fn display_macros(allocation: &MacroAllocation) {
    println!();
    println!("=== Macronutrients ===");
    println!();

    for which in Macro::ALL {
        let bounds = allocation.bounds_for(which);
        println!(
            "{:<8} {:>5} g  {:>4.1} g/kg  {:>3.0}%   [{} - {}]",
            which.label(),
            allocation.plan.grams(which),
            allocation.grams_per_kg(which),
            allocation.percent_of_calories(which),
            bounds.min,
            bounds.max
        );
    }

    println!();
    println!(
        "Macro calories: {:.0} of {:.0} target  {}",
        allocation.total_calories(),
        allocation.target_calories,
        check_marker(&allocation.calorie_check)
    );
}

/// Display serving counts, their nutrient totals and the tolerance checks.
pub fn display_portions(plan: &DailyPortionPlan, check: Option<&PortionCheck>) {
    println!();
    println!(
        "=== Daily Portions ({} cal template) ===",
        plan.template.band_calories
    );
    println!();

    for group in FoodGroup::ALL {
        match plan.count(group) {
            Some(servings) => {
                let c = group_contribution(group, servings);
                println!(
                    "{:<13} {:>4}   P {:>5}  C {:>5}  F {:>5}  {:>5} cal",
                    group.label(),
                    servings,
                    c.protein_grams,
                    c.carb_grams,
                    c.fat_grams,
                    c.calories
                );
            }
            None => println!("{:<13} {:>4}", group.label(), "?"),
        }
    }

    println!();
    match (plan.totals(), check) {
        (Some(totals), Some(check)) => {
            println!("--- Totals ---");
            println!(
                "Protein:  {:>6} g   {}",
                totals.protein_grams,
                check_marker(&check.protein)
            );
            println!(
                "Carbs:    {:>6} g   {}",
                totals.carb_grams,
                check_marker(&check.carb)
            );
            println!("Fat:      {:>6} g   {}", totals.fat_grams, check_marker(&check.fat));
            println!(
                "Calories: {:>6}     {}",
                totals.calories,
                check_marker(&check.calories)
            );
        }
        _ => {
            let missing: Vec<&str> = plan.missing_groups().iter().map(|g| g.label()).collect();
            println!("Totals unavailable, no usable count for: {}", missing.join(", "));
        }
    }
    println!();
}

/// Display everything the session has resolved so far.
pub fn display_session(session: &PlanningSession) {
    display_energy(session);

    match session.macros() {
        Some(allocation) => display_macros(allocation),
        None => {
            println!();
            println!("Macros need target calories and body weight.");
        }
    }

    if let Some(plan) = session.portions() {
        display_portions(plan, session.portion_check());
    }
}

/// List form fields that could not be used. Goes to stderr so a report
/// printed on stdout is not mixed with it.
pub fn display_rejected(rejected: &[String]) {
    if rejected.is_empty() {
        return;
    }
    eprintln!("Ignored {} field(s):", rejected.len());
    for entry in rejected {
        eprintln!("  {}", entry);
    }
}
