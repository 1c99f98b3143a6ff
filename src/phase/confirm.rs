//! Confirmation gate
//!
//! An injected, asynchronous human-in-the-loop check run before sensitive
//! transitions commit. The gate only answers yes or no; it never mutates
//! anything, so a declined confirmation leaves no trace.

use std::future::Future;

use async_trait::async_trait;
use serde::Serialize;

use super::registry::Phase;

/// Prompt content shown to the person confirming a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmContext {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

/// Asks a human (or a policy standing in for one) to approve a transition.
///
/// Implementations must be `Send + Sync` so a single gate can be shared
/// across tasks.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    /// Resolves `true` to proceed, `false` to decline.
    async fn confirm(&self, context: &ConfirmContext) -> bool;
}

/// Approves every prompt. For automation and `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmGate for AlwaysConfirm {
    async fn confirm(&self, _context: &ConfirmContext) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

#[async_trait]
impl ConfirmGate for NeverConfirm {
    async fn confirm(&self, _context: &ConfirmContext) -> bool {
        false
    }
}

/// Adapts an async closure into a [`ConfirmGate`].
///
/// The closure receives an owned copy of the context.
pub struct FnGate<F>(pub F);

impl<F> std::fmt::Debug for FnGate<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGate").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F, Fut> ConfirmGate for FnGate<F>
where
    F: Fn(ConfirmContext) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn confirm(&self, context: &ConfirmContext) -> bool {
        (self.0)(context.clone()).await
    }
}

/// Returns the confirmation prompt required for `from -> to`, if any.
///
/// Only PLANNING -> COMMITTED is gated: it locks the dam, sire and cycle
/// choices that are freely editable while planning.
#[must_use]
pub fn confirmation_for(from: Phase, to: Phase) -> Option<ConfirmContext> {
    match (from, to) {
        (Phase::Planning, Phase::Committed) => Some(ConfirmContext {
            title: "Commit this breeding plan?".to_string(),
            message: "Committing locks in the selected dam, sire and heat cycle. \
                      They can no longer be changed freely once the plan is committed."
                .to_string(),
            confirm_text: "Commit plan".to_string(),
            cancel_text: "Keep planning".to_string(),
        }),
        _ => None,
    }
}
