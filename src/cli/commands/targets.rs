//! Targets command implementation
//!
//! Implements `multibuild targets` to list buildable targets with their
//! selection state.

use anyhow::Result;

use super::CommandContext;
use crate::cli::output::status;
use crate::core::environment::EnvironmentState;
use crate::infra::environment::FileEnvironment;

/// Execute the targets command
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.open_session().await?;
    let active = FileEnvironment::new(session.project.active_target_path())
        .active_target()
        .ok();

    if ctx.output.json {
        let entries: Vec<serde_json::Value> = session
            .selection
            .entries()
            .iter()
            .map(|(target, selected)| {
                serde_json::json!({
                    "id": target.identifier(),
                    "name": target.display_name(),
                    "triple": target.triple(),
                    "family": target.family(),
                    "selected": selected,
                    "active": active == Some(*target),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if ctx.output.quiet {
        return Ok(());
    }

    if session.catalog.is_empty() {
        println!(
            "{} No buildable targets. Install one with 'rustup target add <triple>'.",
            status::INFO
        );
        return Ok(());
    }

    for (target, selected) in session.selection.entries() {
        let mark = if *selected { "[x]" } else { "[ ]" };
        let active_mark = if active == Some(*target) { " (active)" } else { "" };
        println!(
            "{mark} {:<14} {:<20} {}{active_mark}",
            target.identifier(),
            target.display_name(),
            target.family()
        );
    }
    println!(
        "\n{} of {} targets selected",
        session.selection.selected().len(),
        session.catalog.len()
    );
    Ok(())
}
