//! `plan` commands: create, inspect, edit evidence, advance, validate.

use std::sync::Arc;

use serde::Serialize;

use crate::cli::args::{
    EvidenceClearArgs, EvidenceSetArgs, OutputFormat, PlanAdvanceArgs, PlanListArgs, PlanNewArgs,
    PlanStatusArgs, PlanValidateArgs, StoreArgs,
};
use crate::cli::prompt::TerminalGate;
use crate::config::{LoaderOptions, PlanLoader};
use crate::error::{BreedlineError, ConfigError, ValidationIssue};
use crate::observability::EventEmitter;
use crate::phase::{AlwaysConfirm, Checklist, ConfirmGate, LifecycleEngine, Phase, TransitionOutcome};
use crate::plan::{AnimalRef, EvidenceField, Plan, PlanId};
use crate::store::{PlanStore, YamlDirStore};

type Engine = LifecycleEngine<YamlDirStore>;

async fn open_engine(args: &StoreArgs) -> Result<Engine, BreedlineError> {
    let store = YamlDirStore::open(args.plans_dir.clone()).await?;
    let events = match &args.events_file {
        Some(path) if path.as_os_str() == "-" => EventEmitter::stderr(),
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };
    Ok(LifecycleEngine::with_events(Arc::new(store), Arc::new(events)))
}

fn animal(id: Option<&String>) -> Option<AnimalRef> {
    id.map(|id| AnimalRef {
        id: id.clone(),
        name: None,
    })
}

/// Status report for one plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    plan_id: PlanId,
    name: Option<String>,
    version: u64,
    phase: Phase,
    phase_index: usize,
    checklist: Checklist,
}

impl StatusReport {
    fn new(plan: &Plan) -> Self {
        Self {
            plan_id: plan.id.clone(),
            name: plan.name.clone(),
            version: plan.version,
            phase: plan.phase(),
            phase_index: plan.phase_index(),
            checklist: Checklist::for_plan(plan),
        }
    }

    fn print_human(&self) {
        match &self.name {
            Some(name) => println!("{} ({name})", self.plan_id),
            None => println!("{}", self.plan_id),
        }
        println!(
            "  phase:   {} [{}/{}]",
            self.phase,
            self.phase_index + 1,
            crate::phase::PHASES.len()
        );
        let Some(target) = self.checklist.target else {
            println!("  next:    none (plan is complete)");
            return;
        };
        println!(
            "  next:    {target} ({}/{} requirements met)",
            self.checklist.met_count(),
            self.checklist.total_count()
        );
        for req in &self.checklist.requirements {
            if req.satisfied {
                println!("    [x] {}", req.label);
            } else {
                println!("    [ ] {} - {}", req.label, req.action_hint);
            }
        }
    }
}

fn print_report(plan: &Plan, format: OutputFormat) -> Result<(), BreedlineError> {
    let report = StatusReport::new(plan);
    match format {
        OutputFormat::Human => report.print_human(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Create a new plan.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the id is taken.
pub async fn new(args: &PlanNewArgs) -> Result<(), BreedlineError> {
    let engine = open_engine(&args.store).await?;
    let id = args
        .id
        .as_ref()
        .map_or_else(PlanId::generate, |id| PlanId::new(id.clone()));

    let mut draft = Plan::new(id);
    draft.name.clone_from(&args.name);
    draft.species.clone_from(&args.species);
    draft.breed.clone_from(&args.breed);
    draft.dam = animal(args.dam.as_ref());
    draft.sire = animal(args.sire.as_ref());

    let created = engine.store().create_plan(draft).await?;
    tracing::info!(plan_id = %created.id, "plan created");
    println!("{}", created.id);
    Ok(())
}

/// List stored plans.
///
/// A plan document that cannot be read is reported on stderr and skipped.
///
/// # Errors
///
/// Returns an error if the store directory cannot be read.
pub async fn list(args: &PlanListArgs) -> Result<(), BreedlineError> {
    let engine = open_engine(&args.store).await?;
    let mut plans = Vec::new();
    for id in engine.store().list().await? {
        match engine.store().load_plan(&id).await {
            Ok(plan) => plans.push(plan),
            Err(e) => {
                tracing::warn!(plan_id = %id, error = %e, "skipping unreadable plan");
                eprintln!("skipped {id}: {e}");
            }
        }
    }

    match args.format {
        OutputFormat::Human => {
            for plan in &plans {
                println!(
                    "{:<40} {:<20} {}",
                    plan.id,
                    plan.phase(),
                    plan.name.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Json => {
            let reports: Vec<StatusReport> = plans.iter().map(StatusReport::new).collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }
    Ok(())
}

/// Show a plan's phase and checklist.
///
/// # Errors
///
/// Returns an error if the plan cannot be loaded.
pub async fn status(args: &PlanStatusArgs) -> Result<(), BreedlineError> {
    let engine = open_engine(&args.store).await?;
    let plan = engine.load(&PlanId::new(args.id.clone())).await?;
    print_report(&plan, args.format)
}

/// Advance a plan one phase.
///
/// # Errors
///
/// Returns [`BreedlineError::NotAdvanced`] with the outcome's exit code when
/// the transition does not commit, or a store error if the plan cannot be
/// loaded.
pub async fn advance(args: &PlanAdvanceArgs) -> Result<(), BreedlineError> {
    let engine = open_engine(&args.store).await?;
    let id = PlanId::new(args.id.clone());

    let outcome = if args.yes {
        engine.advance_by_id(&id, Some(&AlwaysConfirm)).await?
    } else {
        let gate = TerminalGate::stdio();
        engine
            .advance_by_id(&id, Some(&gate as &dyn ConfirmGate))
            .await?
    };

    let code = outcome.exit_code();
    let message = match outcome {
        TransitionOutcome::Advanced(plan) => {
            if args.format == OutputFormat::Human {
                println!("{} advanced to {}", plan.id, plan.phase());
            }
            return print_report(&plan, args.format);
        }
        TransitionOutcome::Blocked(unmet) if unmet.is_empty() => {
            format!("{id} is complete; there is no further phase")
        }
        TransitionOutcome::Blocked(unmet) => {
            let labels: Vec<&str> = unmet.iter().map(|r| r.label).collect();
            format!("{id} cannot advance yet: {}", labels.join("; "))
        }
        TransitionOutcome::Declined => format!("{id} was not advanced: confirmation declined"),
        TransitionOutcome::Conflict { .. } => {
            format!("{id} changed since it was loaded; reload and retry")
        }
        TransitionOutcome::PersistenceFailure(e) => format!("{id} could not be saved: {e}"),
    };
    Err(BreedlineError::NotAdvanced { message, code })
}

/// Set an evidence field.
///
/// # Errors
///
/// Returns an error for an unknown field, a malformed value, or a store
/// failure.
pub async fn evidence_set(args: &EvidenceSetArgs) -> Result<(), BreedlineError> {
    let field: EvidenceField = args.field.parse()?;
    let value = field.parse_value(&args.value)?;
    let engine = open_engine(&args.store).await?;
    let plan = engine.load(&PlanId::new(args.id.clone())).await?;
    let saved = engine.edit_evidence(&plan, field, Some(value)).await?;
    print_report(&saved, OutputFormat::Human)
}

/// Clear an evidence field.
///
/// # Errors
///
/// Returns an error for an unknown field or a store failure.
pub async fn evidence_clear(args: &EvidenceClearArgs) -> Result<(), BreedlineError> {
    let field: EvidenceField = args.field.parse()?;
    let engine = open_engine(&args.store).await?;
    let plan = engine.load(&PlanId::new(args.id.clone())).await?;
    let saved = engine.edit_evidence(&plan, field, None).await?;
    print_report(&saved, OutputFormat::Human)
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn messages(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}

/// Validate plan documents.
///
/// # Errors
///
/// Returns the first load failure after every file has been reported.
pub fn validate(args: &PlanValidateArgs) -> Result<(), BreedlineError> {
    let loader = PlanLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let mut reports = Vec::new();
    let mut first_error = None;
    for path in &args.files {
        tracing::info!(file = %path.display(), "validating plan");
        let file = path.display().to_string();
        match loader.load(path) {
            Ok(loaded) => reports.push(FileReport {
                file,
                valid: true,
                errors: Vec::new(),
                warnings: messages(&loaded.warnings),
            }),
            Err(e) => {
                let errors = match &e {
                    ConfigError::ValidationError { errors, .. } => messages(errors),
                    other => vec![other.to_string()],
                };
                reports.push(FileReport {
                    file,
                    valid: false,
                    errors,
                    warnings: Vec::new(),
                });
                first_error.get_or_insert(e);
            }
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Human => {
            for report in &reports {
                let verdict = if report.valid { "valid" } else { "invalid" };
                println!("{}: {verdict}", report.file);
                for line in report.errors.iter().chain(&report.warnings) {
                    println!("  {line}");
                }
            }
        }
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}
