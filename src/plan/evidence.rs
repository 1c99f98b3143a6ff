//! Evidence editor
//!
//! Pure set/clear operations on a plan's evidence. Each returns a new
//! snapshot and leaves `status` untouched: clearing evidence that satisfied
//! the next transition only makes the guard report "not ready" again.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::EvidenceError;

use super::model::{MILESTONES, MilestoneKind, Plan};

/// An editable evidence field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "milestone", rename_all = "snake_case")]
pub enum EvidenceField {
    /// The cycle-locked commitment flag.
    LockedCycle,
    /// Actual date of a milestone. Setting it also raises `recorded`.
    Actual(MilestoneKind),
    /// The "has-evidence" flag on its own.
    Recorded(MilestoneKind),
    /// Projected date of a milestone.
    Expected(MilestoneKind),
}

/// A value for [`set_evidence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceValue {
    Flag(bool),
    Date(NaiveDate),
}

impl EvidenceField {
    /// Canonical name, e.g. `birth`, `birth.expected`, `locked_cycle`.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::LockedCycle => "locked_cycle".to_string(),
            Self::Actual(kind) => kind.as_str().to_string(),
            Self::Recorded(kind) => format!("{}.recorded", kind.as_str()),
            Self::Expected(kind) => format!("{}.expected", kind.as_str()),
        }
    }

    /// Returns `true` for boolean fields.
    #[must_use]
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::LockedCycle | Self::Recorded(_))
    }

    /// All editable fields.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut fields = vec![Self::LockedCycle];
        for kind in MILESTONES {
            fields.push(Self::Actual(kind));
            fields.push(Self::Recorded(kind));
            fields.push(Self::Expected(kind));
        }
        fields
    }

    /// Parses a raw string into a value of the kind this field accepts.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::InvalidValue`] if the text is not a boolean
    /// (flag fields) or a `YYYY-MM-DD` date (date fields).
    pub fn parse_value(self, raw: &str) -> Result<EvidenceValue, EvidenceError> {
        let raw = raw.trim();
        if self.is_flag() {
            match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(EvidenceValue::Flag(true)),
                "false" | "no" | "0" => Ok(EvidenceValue::Flag(false)),
                _ => Err(EvidenceError::InvalidValue {
                    field: self.name(),
                    value: raw.to_string(),
                    expected: "true or false",
                }),
            }
        } else {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(EvidenceValue::Date)
                .map_err(|_| EvidenceError::InvalidValue {
                    field: self.name(),
                    value: raw.to_string(),
                    expected: "a date as YYYY-MM-DD",
                })
        }
    }
}

impl std::fmt::Display for EvidenceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for EvidenceField {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| EvidenceError::UnknownField {
                value: s.to_string(),
                suggestion: suggest_field(&normalized),
            })
    }
}

fn suggest_field(input: &str) -> Option<String> {
    EvidenceField::all()
        .into_iter()
        .map(|f| {
            let name = f.name();
            let dist = strsim::damerau_levenshtein(input, &name);
            (name, dist)
        })
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

/// Returns a copy of `plan` with `field` set to `value`.
///
/// # Errors
///
/// Returns [`EvidenceError::TypeMismatch`] when a date is given for a flag
/// field or a flag for a date field.
pub fn set_evidence(
    plan: &Plan,
    field: EvidenceField,
    value: EvidenceValue,
) -> Result<Plan, EvidenceError> {
    let mut next = plan.clone();
    match (field, value) {
        (EvidenceField::LockedCycle, EvidenceValue::Flag(flag)) => next.locked_cycle = flag,
        (EvidenceField::Recorded(kind), EvidenceValue::Flag(flag)) => {
            next.evidence.milestone_mut(kind).recorded = flag;
        }
        (EvidenceField::Actual(kind), EvidenceValue::Date(date)) => {
            let milestone = next.evidence.milestone_mut(kind);
            milestone.recorded = true;
            milestone.actual = Some(date);
        }
        (EvidenceField::Expected(kind), EvidenceValue::Date(date)) => {
            next.evidence.milestone_mut(kind).expected = Some(date);
        }
        (field, _) => {
            return Err(EvidenceError::TypeMismatch {
                field: field.name(),
                expected: if field.is_flag() { "flag" } else { "date" },
            });
        }
    }
    Ok(next)
}

/// Returns a copy of `plan` with `field` cleared.
///
/// Clearing either the actual date or the recorded flag withdraws the
/// milestone's evidence entirely; the expected date is kept.
#[must_use]
pub fn clear_evidence(plan: &Plan, field: EvidenceField) -> Plan {
    let mut next = plan.clone();
    match field {
        EvidenceField::LockedCycle => next.locked_cycle = false,
        EvidenceField::Actual(kind) | EvidenceField::Recorded(kind) => {
            let milestone = next.evidence.milestone_mut(kind);
            milestone.recorded = false;
            milestone.actual = None;
        }
        EvidenceField::Expected(kind) => next.evidence.milestone_mut(kind).expected = None,
    }
    next
}
