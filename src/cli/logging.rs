use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Name of the log file written in the configured log folder.
pub const LOG_FILE_NAME: &str = "validator.log";

fn console_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info,hyper=warn,reqwest=warn"),
        2 => EnvFilter::new("debug,hyper=warn,reqwest=warn"),
        _ => EnvFilter::new("trace"),
    })
}

fn file_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 | 1 => EnvFilter::new("info,hyper=warn,reqwest=warn"),
        2 => EnvFilter::new("debug,hyper=warn,reqwest=warn"),
        _ => EnvFilter::new("trace"),
    }
}

/// Console logging on stderr unless `no_output`, and a plain text log file when
/// `log_file` is given.
pub fn setup_logging(verbose: u8, no_output: bool, log_file: Option<&Path>) -> Result<()> {
    let console = (!no_output).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter(verbose))
    });

    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log folder {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(file_filter(verbose)),
            )
        }
        None => None,
    };

    // A subscriber may already be installed when running inside tests
    let _ = tracing_subscriber::registry().with(console).with(file).try_init();
    Ok(())
}
