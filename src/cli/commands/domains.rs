use super::CommandContext;
use crate::config::DomainConfigCache;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct DomainsArgs {
    /// Show channels and interface options of each domain
    #[arg(long)]
    pub detailed: bool,
}

pub async fn execute(args: DomainsArgs, ctx: &CommandContext) -> Result<()> {
    let output = &ctx.output;
    let domains = DomainConfigCache::load(&ctx.app)?;
    if domains.is_empty() {
        output.warning("No validation domains could be found.");
        return Ok(());
    }

    output.header("Validation domains");
    for domain in domains.all() {
        output.category(&domain.domain_name);
        if let Some(alias) = &domain.domain_alias {
            output.key_value("Alias of:", alias, false);
        }
        output.key_value("Validation types:", &domain.validation_types.join(", "), false);
        if let Some(default_type) = &domain.default_type {
            output.key_value("Default type:", default_type, true);
        }
        if args.detailed {
            let channels: Vec<&str> = domain.channels.iter().map(|c| c.name()).collect();
            output.key_value("Channels:", &channels.join(", "), false);
            output.key_value("Folder:", &domain.domain_root.display().to_string(), false);
            output.key_value(
                "Minimal interface:",
                yes_no(domain.support_minimal_user_interface),
                false,
            );
            output.key_value(
                "Embedding:",
                yes_no(domain.support_user_interface_embedding),
                false,
            );
            output.key_value("Rich text reports:", yes_no(domain.rich_text_reports), false);
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
