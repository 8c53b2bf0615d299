use super::CommandContext;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(long = "detailed")]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs, ctx: &CommandContext) -> Result<()> {
    let output = &ctx.output;
    output.plain(&format!("{} {}", crate::PKG_NAME, crate::VERSION));
    if args.detailed {
        output.key_value("Validator:", &ctx.app.identifier, false);
        output.key_value("Description:", crate::PKG_DESCRIPTION, false);
        output.key_value("License:", env!("CARGO_PKG_LICENSE"), false);
        output.key_value("Rust edition:", "2024", false);
        output.key_value(
            "Profile:",
            if cfg!(debug_assertions) { "debug" } else { "release" },
            false,
        );
    }
    Ok(())
}
