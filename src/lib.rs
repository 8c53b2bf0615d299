//! # validator-commons
//!
//! Delivery scaffolding shared by document validators. The validation engine
//! itself lives elsewhere; this crate takes its Test Assertion Report (TAR)
//! and turns it into something people and systems can consume.
//!
//! ## Features
//!
//! - **Reports**: flatten the result context, summarise findings and render a PDF
//! - **Summaries**: plain text digest of a result for the command line
//! - **Configuration**: layered application settings and per-domain folders
//! - **Usage statistics**: anonymous usage records posted to a webhook
//! - **Web policies**: upload domain checks, frame options and error bodies
//!
//! ## Quick Start
//!
//! ```bash
//! # Render a result as PDF
//! validator --domain invoice report result.json
//!
//! # Print its summary
//! validator --domain invoice summary result.json
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod reports;
pub mod summary;
pub mod tar;
pub mod telemetry;
pub mod web;

pub use cli::{Cli, Output};
pub use config::{AppConfig, DomainConfig};
pub use error::ValidatorError;

/// Result type alias for command level operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
