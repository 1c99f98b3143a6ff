//! `breedline`: a breeding-plan lifecycle engine.
//!
//! Tracks a breeding plan through eight sequential phases, from PLANNING to
//! COMPLETE, and decides whether it may advance based on recorded evidence.
//!
//! - [`phase`]: the registry, requirement table, guard, confirmation gate and
//!   [`LifecycleEngine`](phase::LifecycleEngine)
//! - [`plan`]: the `Plan` snapshot and the evidence editor
//! - [`store`]: persistence with optimistic concurrency
//! - [`config`]: YAML plan documents and their validation
//! - [`observability`]: logging, lifecycle events and metrics
//! - [`cli`]: the `breedline` command-line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod phase;
pub mod plan;
pub mod store;

pub use error::{BreedlineError, Result};
