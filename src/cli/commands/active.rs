//! Active command implementation
//!
//! Implements `multibuild active` to show or switch the active build target.

use anyhow::{Context, Result};

use super::CommandContext;
use crate::cli::output::status;
use crate::core::environment::EnvironmentState;
use crate::core::target::Target;
use crate::infra::environment::FileEnvironment;

/// Execute the active command
pub async fn execute(ctx: &CommandContext, requested: Option<&str>) -> Result<()> {
    let session = ctx.open_session().await?;
    let env = FileEnvironment::new(session.project.active_target_path());

    let target = match requested {
        Some(raw) => {
            let target: Target = raw.parse()?;
            session.catalog.ensure_contains(target)?;
            env.set_active_target(target)
                .with_context(|| format!("Failed to switch active target to {target}"))?;
            target
        }
        None => env.active_target()?,
    };

    if ctx.output.json {
        println!(
            "{}",
            serde_json::json!({
                "id": target.identifier(),
                "name": target.display_name(),
                "triple": target.triple(),
            })
        );
    } else if !ctx.output.quiet {
        let prefix = if requested.is_some() {
            status::SUCCESS
        } else {
            status::INFO
        };
        println!("{prefix} Active target: {target} ({})", target.display_name());
    }
    Ok(())
}
