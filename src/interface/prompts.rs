use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::Result;
use crate::interface::render::{display_macros, display_portions};
use crate::models::{EstimationMethod, FoodGroup, FormInput, Goal, Macro, Sex};
use crate::planner::validation::{parse_count, parse_number};
use crate::state::PlanningSession;

/// Minimum similarity for a fuzzy label suggestion.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Prompt for a free-text field, keeping `current` when Enter is pressed.
pub fn prompt_text(prompt: &str, current: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(current.to_string())
        .allow_empty(true)
        .interact_text()?;
    Ok(input.trim().to_string())
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Pick one of `labels`. The current label is preselected; an extra
/// "(not set)" entry maps to an empty string.
pub fn prompt_choice(prompt: &str, labels: &[&str], current: &str) -> Result<String> {
    let mut items: Vec<&str> = labels.to_vec();
    items.push("(not set)");

    let default = labels
        .iter()
        .position(|l| l.eq_ignore_ascii_case(current.trim()))
        .unwrap_or(labels.len());

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact()?;

    Ok(labels
        .get(selection)
        .map(|l| l.to_string())
        .unwrap_or_default())
}

/// Labels ranked by similarity to `input`, best first.
///
/// A case-insensitive exact match is returned alone.
pub fn rank_labels<'a>(input: &str, labels: &[&'a str]) -> Vec<&'a str> {
    let wanted = input.trim().to_lowercase();
    if let Some(exact) = labels.iter().find(|l| l.to_lowercase() == wanted) {
        return vec![*exact];
    }

    let mut candidates: Vec<(&str, f64)> = labels
        .iter()
        .map(|l| (*l, jaro_winkler(&l.to_lowercase(), &wanted)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.into_iter().map(|(l, _)| l).collect()
}

/// Ask which of `labels` the user means, with fuzzy matching.
/// Returns `None` when the user gives up on this entry.
fn resolve_label<'a>(input: &str, labels: &[&'a str]) -> Result<Option<&'a str>> {
    let candidates = rank_labels(input, labels);

    match candidates.as_slice() {
        [] => {
            println!("No match for '{}'", input);
            Ok(None)
        }
        [only] if only.eq_ignore_ascii_case(input.trim()) => Ok(Some(*only)),
        [only] => {
            let confirm = prompt_yes_no(&format!("Did you mean '{}'?", only), true)?;
            Ok(confirm.then_some(*only))
        }
        many => {
            let mut options: Vec<&str> = many.iter().take(5).copied().collect();
            let shown = options.len();
            options.push("None of these");

            let selection = Select::new()
                .with_prompt("Which did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            Ok((selection < shown).then(|| options[selection]))
        }
    }
}

/// Walk through every form field, starting from `form`.
///
/// Editing anything upstream of an override clears it: energy inputs clear
/// every override, a new calorie factor clears macro and serving overrides.
pub fn collect_form(form: &FormInput) -> Result<FormInput> {
    let before = form.clone();
    let mut form = form.clone();

    println!("--- Cadet ---");
    form.first_name = prompt_text("First name", &form.first_name)?;
    form.last_name = prompt_text("Last name", &form.last_name)?;

    let sexes: Vec<&str> = Sex::ALL.iter().map(|s| s.label()).collect();
    form.sex = prompt_choice("Sex", &sexes, &form.sex)?;
    form.age = prompt_text("Age (years)", &form.age)?;
    form.height_feet = prompt_text("Height (feet)", &form.height_feet)?;
    form.height_inches = prompt_text("Height (inches)", &form.height_inches)?;
    form.weight_lbs = prompt_text("Weight (lbs)", &form.weight_lbs)?;

    println!("--- Goal ---");
    let goals: Vec<&str> = Goal::ALL.iter().map(|g| g.label()).collect();
    form.goal = prompt_choice("Goal", &goals, &form.goal)?;
    if Goal::from_label(&form.goal).is_some_and(|g| g.changes_weight()) {
        form.goal_weight_lbs = prompt_text("Goal weight (lbs)", &form.goal_weight_lbs)?;
    }
    form.goal_notes = prompt_text("Goals (free text)", &form.goal_notes)?;

    println!("--- Energy ---");
    let methods: Vec<&str> = EstimationMethod::ALL.iter().map(|m| m.label()).collect();
    form.method = prompt_choice("BMR estimation method", &methods, &form.method)?;
    if EstimationMethod::from_label(&form.method).is_some_and(|m| m.uses_lean_body_mass()) {
        form.lean_body_mass_lbs = prompt_text(
            "Lean body mass (lbs, blank to estimate)",
            &form.lean_body_mass_lbs,
        )?;
    }
    form.physical_activity_factor =
        prompt_text("Physical activity factor", &form.physical_activity_factor)?;
    if form.energy_inputs_differ(&before) {
        form.clear_overrides();
    }

    let factor_before = form.target_calorie_factor.clone();
    form.target_calorie_factor = prompt_text(
        "Target calorie factor (blank for default)",
        &form.target_calorie_factor,
    )?;
    if form.target_calorie_factor != factor_before.trim() {
        form.clear_plan_overrides();
    }

    form.dietitian_notes = prompt_text("Dietitian notes", &form.dietitian_notes)?;

    Ok(form)
}

/// Adjust macro grams until the user is done.
pub fn edit_macros(session: &mut PlanningSession) -> Result<()> {
    let labels: Vec<&str> = Macro::ALL.iter().map(|m| m.label()).collect();

    loop {
        let Some(allocation) = session.macros() else {
            println!("Macros are not available yet.");
            return Ok(());
        };
        display_macros(allocation);

        let input: String = Input::new()
            .with_prompt("Macro to change (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(());
        }

        let Some(label) = resolve_label(&input, &labels)? else {
            continue;
        };
        let Some(which) = Macro::ALL.into_iter().find(|m| m.label() == label) else {
            continue;
        };

        let text = prompt_text(&format!("{} grams", which.label()), "")?;
        match parse_number(&text) {
            Ok(grams) => session.set_macro_grams(which, grams),
            Err(e) => println!("{}", e),
        }
    }
}

/// Adjust serving counts until the user is done. Typed text is kept in
/// `form` so an unusable entry is saved as the user wrote it.
pub fn edit_servings(session: &mut PlanningSession, form: &mut FormInput) -> Result<()> {
    let labels: Vec<&str> = FoodGroup::ALL.iter().map(|g| g.label()).collect();

    loop {
        let Some(plan) = session.portions() else {
            println!("Portions are not available yet.");
            return Ok(());
        };
        display_portions(plan, session.portion_check());

        let input: String = Input::new()
            .with_prompt("Food group to change (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;
        if input.trim().is_empty() {
            return Ok(());
        }

        let Some(label) = resolve_label(&input, &labels)? else {
            continue;
        };
        let Some(group) = FoodGroup::from_label(label) else {
            continue;
        };

        let text = prompt_text(&format!("{} servings", group.label()), "")?;
        let count = parse_count(&text);
        if let Err(e) = &count {
            println!("{}", e);
        }
        session.set_servings(group, count.ok());
        form.servings.insert(group, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUPS: [&str; 6] = [
        "Vegetables",
        "Fruit",
        "Grains",
        "Lean Protein",
        "Dairy",
        "Fat",
    ];

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(rank_labels("dairy", &GROUPS), vec!["Dairy"]);
    }

    #[test]
    fn test_fuzzy_suggestion() {
        let ranked = rank_labels("vegtables", &GROUPS);
        assert_eq!(ranked.first(), Some(&"Vegetables"));
    }

    #[test]
    fn test_no_suggestion_for_nonsense() {
        assert!(rank_labels("zzzz", &GROUPS).is_empty());
    }
}
