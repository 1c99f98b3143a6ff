//! Command-line interface
//!
//! A thin demo layer over the lifecycle engine and the directory store.

pub mod args;
pub mod commands;
pub mod prompt;
