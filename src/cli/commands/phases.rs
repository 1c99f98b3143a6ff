//! `phases`: the lifecycle table.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PhasesArgs};
use crate::error::BreedlineError;
use crate::phase::{PHASES, Phase, confirmation_for, rules_for};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhaseRow {
    index: usize,
    phase: Phase,
    label: &'static str,
    requirements: Vec<RequirementRow>,
    requires_confirmation: bool,
}

#[derive(Debug, Serialize)]
struct RequirementRow {
    key: &'static str,
    label: &'static str,
}

fn rows() -> Vec<PhaseRow> {
    PHASES
        .iter()
        .map(|&phase| PhaseRow {
            index: phase.index(),
            phase,
            label: phase.label(),
            requirements: rules_for(phase)
                .iter()
                .map(|key| RequirementRow {
                    key: key.as_str(),
                    label: key.label(),
                })
                .collect(),
            requires_confirmation: phase
                .index()
                .checked_sub(1)
                .and_then(Phase::from_index)
                .is_some_and(|from| confirmation_for(from, phase).is_some()),
        })
        .collect()
}

/// Print every phase with the requirements for entering it.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &PhasesArgs) -> Result<(), BreedlineError> {
    let rows = rows();
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Human => {
            for row in &rows {
                let confirm = if row.requires_confirmation {
                    " (confirmation required)"
                } else {
                    ""
                };
                println!("{}. {} - {}{confirm}", row.index, row.phase, row.label);
                for req in &row.requirements {
                    println!("     - {}", req.label);
                }
            }
        }
    }
    Ok(())
}
