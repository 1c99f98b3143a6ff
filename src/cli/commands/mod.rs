//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod phases;
pub mod plan;
pub mod version;

use crate::cli::args::{Cli, Commands, EvidenceSubcommand, PlanSubcommand};
use crate::error::BreedlineError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails, including
/// [`BreedlineError::NotAdvanced`] when an advance does not commit.
pub async fn dispatch(cli: Cli) -> Result<(), BreedlineError> {
    match cli.command {
        Commands::Phases(args) => phases::run(&args),
        Commands::Plan(cmd) => match cmd.subcommand {
            PlanSubcommand::New(args) => plan::new(&args).await,
            PlanSubcommand::List(args) => plan::list(&args).await,
            PlanSubcommand::Status(args) => plan::status(&args).await,
            PlanSubcommand::Advance(args) => plan::advance(&args).await,
            PlanSubcommand::Evidence(ev) => match ev.subcommand {
                EvidenceSubcommand::Set(args) => plan::evidence_set(&args).await,
                EvidenceSubcommand::Clear(args) => plan::evidence_clear(&args).await,
            },
            PlanSubcommand::Validate(args) => plan::validate(&args),
        },
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
