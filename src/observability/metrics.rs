//! Lifecycle metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is up to
//! the embedding application. Every label value is drawn from a closed set
//! (phase names, outcome names), so label cardinality stays bounded.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};

use crate::phase::Phase;

/// Label for a phase slot that has no phase (advancing from COMPLETE).
const NO_PHASE: &str = "NONE";

/// Outcome label values for `breedline_transitions_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeLabel {
    Advanced,
    Blocked,
    Declined,
    Conflict,
    PersistenceFailure,
}

impl OutcomeLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advanced => "advanced",
            Self::Blocked => "blocked",
            Self::Declined => "declined",
            Self::Conflict => "conflict",
            Self::PersistenceFailure => "persistence_failure",
        }
    }
}

fn phase_label(phase: Option<Phase>) -> &'static str {
    phase.map_or(NO_PHASE, Phase::as_str)
}

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        "breedline_transitions_total",
        "Advancement attempts by outcome and edge"
    );
    describe_counter!(
        "breedline_requirement_checks_total",
        "Requirement evaluations by target phase"
    );
    describe_gauge!(
        "breedline_requirements_unmet",
        "Unmet requirements at the last evaluation, by target phase"
    );
    describe_histogram!(
        "breedline_advance_duration_ms",
        "Advancement duration in milliseconds, including confirmation"
    );
}

/// Records the outcome of one advancement attempt.
pub fn record_transition(outcome: OutcomeLabel, from: Phase, to: Option<Phase>) {
    counter!(
        "breedline_transitions_total",
        "outcome" => outcome.as_str(),
        "from" => from.as_str(),
        "to" => phase_label(to),
    )
    .increment(1);
}

/// Records a requirement evaluation and its unmet count.
#[allow(clippy::cast_precision_loss)]
pub fn record_requirement_check(target: Option<Phase>, unmet: usize) {
    let target = phase_label(target);
    counter!("breedline_requirement_checks_total", "target" => target).increment(1);
    gauge!("breedline_requirements_unmet", "target" => target).set(unmet as f64);
}

/// Records how long an advancement took end to end.
pub fn record_advance_duration(duration: Duration) {
    histogram!("breedline_advance_duration_ms").record(duration.as_secs_f64() * 1000.0);
}
