//! Phase registry
//!
//! The eight lifecycle phases of a breeding plan in their fixed order, and a
//! total mapping from arbitrary persisted status values to a phase index.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhaseError;

/// A lifecycle phase of a breeding plan.
///
/// Declaration order is lifecycle order; [`Phase::index`] is the sole
/// measure of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Plan drafted; dam, sire and cycle are still freely editable.
    Planning,
    /// Pairing and cycle locked in.
    Committed,
    /// Breeding has taken place.
    Bred,
    /// Litter born.
    Birthed,
    /// Litter weaned.
    Weaned,
    /// Offspring placement under way.
    PlacementStarted,
    /// All offspring placed.
    PlacementCompleted,
    /// Plan closed out. Terminal.
    Complete,
}

/// All phases in lifecycle order.
pub const PHASES: [Phase; 8] = [
    Phase::Planning,
    Phase::Committed,
    Phase::Bred,
    Phase::Birthed,
    Phase::Weaned,
    Phase::PlacementStarted,
    Phase::PlacementCompleted,
    Phase::Complete,
];

impl Phase {
    /// Zero-based position in [`PHASES`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Phase at `index`, or `None` past the end.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PHASES.len() {
            Some(PHASES[index])
        } else {
            None
        }
    }

    /// The immediate successor, or `None` for [`Phase::Complete`].
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Returns `true` for the terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Canonical persisted key, e.g. `"PLACEMENT_STARTED"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "PLANNING",
            Self::Committed => "COMMITTED",
            Self::Bred => "BRED",
            Self::Birthed => "BIRTHED",
            Self::Weaned => "WEANED",
            Self::PlacementStarted => "PLACEMENT_STARTED",
            Self::PlacementCompleted => "PLACEMENT_COMPLETED",
            Self::Complete => "COMPLETE",
        }
    }

    /// Display label, e.g. `"Placement Started"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Committed => "Committed",
            Self::Bred => "Bred",
            Self::Birthed => "Birthed",
            Self::Weaned => "Weaned",
            Self::PlacementStarted => "Placement Started",
            Self::PlacementCompleted => "Placement Completed",
            Self::Complete => "Complete",
        }
    }

    /// Lenient lookup: trims and ignores ASCII case.
    fn lookup(value: &str) -> Option<Self> {
        let value = value.trim();
        PHASES
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = PhaseError;

    /// Strict parse for input boundaries. Hyphens are accepted in place of
    /// underscores so `placement-started` works on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::lookup(&normalized).ok_or_else(|| PhaseError::Unknown {
            value: s.to_string(),
            suggestion: suggest_phase(&normalized.to_ascii_uppercase()),
        })
    }
}

/// Maps a persisted status value to a phase index.
///
/// Total: `None`, empty, and unrecognized values all map to `0` (PLANNING).
/// Matching trims whitespace and ignores ASCII case.
#[must_use]
pub fn phase_index(status: Option<&str>) -> usize {
    status.and_then(Phase::lookup).map_or(0, Phase::index)
}

/// Resolves a persisted status value to a phase, with the same fallback as
/// [`phase_index`].
#[must_use]
pub fn resolve_phase(status: Option<&str>) -> Phase {
    PHASES[phase_index(status)]
}

/// The phase a plan at `status` would advance to, or `None` if terminal.
#[must_use]
pub fn next_phase(status: Option<&str>) -> Option<Phase> {
    resolve_phase(status).next()
}

/// Returns `true` when `status` is a recognized phase key.
#[must_use]
pub fn is_recognized(status: Option<&str>) -> bool {
    status.and_then(Phase::lookup).is_some()
}

fn suggest_phase(input: &str) -> Option<String> {
    PHASES
        .iter()
        .map(|p| (p.as_str(), strsim::damerau_levenshtein(input, p.as_str())))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}
