use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::interface::Audience;

/// Cadet nutrition planner: BMR, TDEE, calorie target, macros and daily portions.
#[derive(Parser, Debug)]
#[command(name = "nutrition_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Planner config JSON (tolerances and default calorie factor).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill in the planning form interactively.
    Plan {
        /// Saved form to start from and save back to.
        #[arg(short, long, default_value = "cadet_plan.json")]
        file: PathBuf,
    },

    /// Derive the plan for a saved form and print it.
    Compute {
        /// Saved form JSON.
        #[arg(short, long)]
        input: PathBuf,

        /// Print the derived values as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Write a cadet or dietitian report for a saved form.
    Report {
        /// Saved form JSON.
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "cadet")]
        audience: Audience,

        /// Report file, or a directory to receive the usual file name.
        /// Printed to stdout when left out.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write the serving grid as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            file: PathBuf::from("cadet_plan.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::parse_from([
            "nutrition_planner",
            "report",
            "--input",
            "plan.json",
            "--audience",
            "dietitian",
            "--csv",
            "grid.csv",
        ]);
        match cli.command {
            Some(Command::Report {
                audience, out, csv, ..
            }) => {
                assert_eq!(audience, Audience::Dietitian);
                assert!(out.is_none());
                assert_eq!(csv, Some(PathBuf::from("grid.csv")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_no_subcommand_defaults_to_plan() {
        let cli = Cli::parse_from(["nutrition_planner", "--log-level", "debug"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Command::Plan { .. }));
        assert_eq!(cli.log_level, "debug");
    }
}
