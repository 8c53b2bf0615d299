use crate::cli::Output;
use crate::cli::logging::{LOG_FILE_NAME, setup_logging};
use crate::config::AppConfig;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod domains;
pub mod report;
pub mod summary;
pub mod version;

#[derive(Parser)]
#[command(
    name = "validator",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validation report tooling shared by document validators",
    long_about = "Renders validation results as PDF or CSV reports, prints result summaries \
                  and inspects the configured validation domains."
)]
pub struct Cli {
    /// Do not print anything to the console
    #[arg(long = "nooutput", visible_alias = "no-output", global = true)]
    pub no_output: bool,

    /// Do not write a log file
    #[arg(long = "nolog", visible_alias = "no-log", global = true)]
    pub no_log: bool,

    /// Validation domain to use, required when several are configured
    #[arg(short, long, env = "VALIDATOR_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a validation result as a PDF or CSV report
    Report(report::ReportArgs),
    /// Print the summary of a validation result
    Summary(summary::SummaryArgs),
    /// List the configured validation domains
    Domains(domains::DomainsArgs),
    /// Show the effective configuration
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Settings every command receives.
pub struct CommandContext {
    pub app: AppConfig,
    pub domain: Option<String>,
    pub output: Output,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.no_output);

        let app = match AppConfig::load_with_custom_config(self.config.as_deref()) {
            Ok(app) => app,
            Err(e) => {
                output.error(&e.to_string());
                return Err(e.into());
            }
        };

        let log_file = (!self.no_log).then(|| app.log_folder.join(LOG_FILE_NAME));
        setup_logging(self.verbose, self.no_output, log_file.as_deref())?;
        tracing::debug!("Configuration loaded for validator [{}]", app.identifier);

        let ctx = CommandContext {
            app,
            domain: self.domain,
            output,
        };

        match self.command {
            Some(Commands::Report(args)) => report::execute(args, &ctx).await,
            Some(Commands::Summary(args)) => summary::execute(args, &ctx).await,
            Some(Commands::Domains(args)) => domains::execute(args, &ctx).await,
            Some(Commands::Config(args)) => config::execute(args, &ctx).await,
            Some(Commands::Version(args)) => version::execute(args, &ctx).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}
