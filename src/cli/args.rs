//! CLI argument definitions
//!
//! All Clap derive structs for `breedline` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Breeding-plan lifecycle tracker.
#[derive(Parser, Debug)]
#[command(name = "breedline", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "BREEDLINE_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "BREEDLINE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the lifecycle phases and what each one requires.
    Phases(PhasesArgs),

    /// Create, inspect, and advance breeding plans.
    Plan(PlanCommand),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `phases`.
#[derive(Args, Debug)]
pub struct PhasesArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Plan Command
// ============================================================================

/// Plan management commands.
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// Plan subcommand.
    #[command(subcommand)]
    pub subcommand: PlanSubcommand,
}

/// Plan subcommands.
#[derive(Subcommand, Debug)]
pub enum PlanSubcommand {
    /// Create a new plan in PLANNING.
    New(PlanNewArgs),

    /// List stored plans with their current phase.
    List(PlanListArgs),

    /// Show a plan's phase and the checklist for its next transition.
    Status(PlanStatusArgs),

    /// Advance a plan to its next phase.
    Advance(PlanAdvanceArgs),

    /// Record or clear milestone evidence.
    Evidence(EvidenceCommand),

    /// Validate plan documents without touching the store.
    Validate(PlanValidateArgs),
}

/// Where plans are stored and where lifecycle events go.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory holding one YAML document per plan.
    #[arg(long, default_value = "./plans", env = "BREEDLINE_PLANS_DIR")]
    pub plans_dir: PathBuf,

    /// Append lifecycle events (JSONL) to this file, or `-` for stderr.
    #[arg(long, env = "BREEDLINE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `plan new`.
#[derive(Args, Debug)]
pub struct PlanNewArgs {
    /// Plan id. A random id is generated when omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// Plan name.
    #[arg(long)]
    pub name: Option<String>,

    /// Species, e.g. `dog`.
    #[arg(long)]
    pub species: Option<String>,

    /// Breed.
    #[arg(long)]
    pub breed: Option<String>,

    /// Dam id.
    #[arg(long)]
    pub dam: Option<String>,

    /// Sire id.
    #[arg(long)]
    pub sire: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `plan list`.
#[derive(Args, Debug)]
pub struct PlanListArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `plan status`.
#[derive(Args, Debug)]
pub struct PlanStatusArgs {
    /// Plan id.
    pub id: String,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `plan advance`.
#[derive(Args, Debug)]
pub struct PlanAdvanceArgs {
    /// Plan id.
    pub id: String,

    /// Confirm without prompting.
    #[arg(short, long)]
    pub yes: bool,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Evidence editing commands.
#[derive(Args, Debug)]
pub struct EvidenceCommand {
    /// Evidence subcommand.
    #[command(subcommand)]
    pub subcommand: EvidenceSubcommand,
}

/// Evidence subcommands.
#[derive(Subcommand, Debug)]
pub enum EvidenceSubcommand {
    /// Set an evidence field, e.g. `birth 2025-05-01` or `locked_cycle true`.
    Set(EvidenceSetArgs),

    /// Clear an evidence field.
    Clear(EvidenceClearArgs),
}

/// Arguments for `plan evidence set`.
#[derive(Args, Debug)]
pub struct EvidenceSetArgs {
    /// Plan id.
    pub id: String,

    /// Evidence field (`locked_cycle`, `<milestone>`, `<milestone>.recorded`,
    /// `<milestone>.expected`).
    pub field: String,

    /// Value: a `YYYY-MM-DD` date, or `true`/`false` for flags.
    pub value: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `plan evidence clear`.
#[derive(Args, Debug)]
pub struct EvidenceClearArgs {
    /// Plan id.
    pub id: String,

    /// Evidence field.
    pub field: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for `plan validate`.
#[derive(Args, Debug)]
pub struct PlanValidateArgs {
    /// Plan documents to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
