//! `learnveda plan`: fill in the study form and print the timetable.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use learnveda_core::plan::{AdvisoryStatus, PlanRequest};
use learnveda_planner::{Planner, render_text};
use tracing::{info, warn};

use crate::form::Form;

#[derive(Args, Debug, Default)]
pub struct PlanArgs {
    /// Read subjects and constraints from a TOML or JSON file instead of asking
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override the number of study days
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Override the daily study hours
    #[arg(long)]
    pub hours: Option<f64>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config_path: Option<&Path>, args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    // Provider problems stop the run before the student fills anything in.
    let planner = Planner::from_config(&config)?;

    let mut request = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "Reading plan file");
            read_plan_file(path)?
        }
        None => {
            println!("📚 LearnVeda Study Planner");
            println!("=========================\n");
            let stdin = io::stdin();
            let mut form = Form::new(stdin.lock(), io::stdout());
            let request = form.read_request(&config.planner)?;
            println!();
            request
        }
    };
    apply_overrides(&mut request, &args);

    eprint!("  Generating timetable...");
    let plan = planner.generate(&request).await;
    eprint!("\r                         \r");
    let plan = plan?;

    match &plan.advisory {
        AdvisoryStatus::Generated { model } => info!(
            model = %model,
            days = plan.timetable.days.len(),
            "Study plan ready"
        ),
        AdvisoryStatus::Fallback { reason } => warn!(
            reason = %reason,
            "Study plan ready without generated advice"
        ),
    }

    let mut stdout = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &plan)?;
        writeln!(stdout)?;
    } else {
        write!(stdout, "{}", render_text(&plan))?;
    }

    Ok(())
}

/// Read a plan request from `path`. Files ending in `.json` are JSON,
/// anything else is TOML.
pub fn read_plan_file(path: &Path) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read plan file {}: {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let request = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| format!("Invalid plan file {}: {e}", path.display()))?
    } else {
        toml::from_str(&content)
            .map_err(|e| format!("Invalid plan file {}: {e}", path.display()))?
    };

    Ok(request)
}

fn apply_overrides(request: &mut PlanRequest, args: &PlanArgs) {
    if let Some(days) = args.days {
        request.total_days = days;
    }
    if let Some(hours) = args.hours {
        request.daily_hours = hours;
    }
}
