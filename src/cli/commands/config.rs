use super::CommandContext;
use crate::config::ConfigFormat;
use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the merged configuration
    Show {
        /// Output format (toml, json, yaml)
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Check that the configuration and every domain load
    Validate,
}

pub async fn execute(args: ConfigArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => show(&format, ctx),
        ConfigCommand::Validate => validate(ctx),
    }
}

fn show(format: &str, ctx: &CommandContext) -> Result<()> {
    let format = ConfigFormat::from_extension(format)
        .ok_or_else(|| anyhow!("Unsupported format: {format}. Use toml, json or yaml."))?;
    // Printed even with --nooutput: the configuration is the command's result
    print!("{}", format.export(&ctx.app)?);
    Ok(())
}

fn validate(ctx: &CommandContext) -> Result<()> {
    let domains = crate::config::DomainConfigCache::load(&ctx.app)?;
    ctx.output.success("Configuration is valid");
    ctx.output.key_value("Validator:", &ctx.app.identifier, true);
    ctx.output.key_value("Domains:", &domains.domain_names().join(", "), false);
    ctx.output.key_value(
        "Statistics:",
        ctx.app.webhook.statistics_url().unwrap_or("disabled"),
        false,
    );
    Ok(())
}
