//! Command-line bootstrap for validators.
//!
//! Parses arguments with clap, sets up logging, resolves the validation domain
//! and dispatches to the commands in [`commands`].

pub mod commands;
pub mod logging;
pub mod output;
pub mod runner;

pub use commands::Cli;
pub use output::Output;
pub use runner::{RunContext, ValidationRunner, WorkFolder, bootstrap};
