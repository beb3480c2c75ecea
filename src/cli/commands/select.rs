//! Select/deselect command implementation
//!
//! Implements `multibuild select` and `multibuild deselect`.

use anyhow::{bail, Result};

use super::{parse_targets, CommandContext};
use crate::cli::output::status;

/// Set the selected flag of `raw_targets` (or every target with `all`)
pub async fn execute(
    ctx: &CommandContext,
    raw_targets: &[String],
    all: bool,
    value: bool,
) -> Result<()> {
    if raw_targets.is_empty() && !all {
        bail!("No targets given. Name targets or pass --all.");
    }

    let targets = parse_targets(raw_targets)?;
    let mut session = ctx.open_session().await?;

    if all {
        session.selection.set_all(value);
    } else {
        for target in &targets {
            session.selection.toggle(*target, value)?;
        }
    }
    session.project.save_selection(&session.selection)?;

    let verb = if value { "Selected" } else { "Deselected" };
    let changed = if all {
        session.selection.targets()
    } else {
        targets
    };

    if ctx.output.json {
        let ids: Vec<&str> = changed.iter().map(|t| t.identifier()).collect();
        println!(
            "{}",
            serde_json::json!({ "selected": value, "targets": ids })
        );
    } else if !ctx.output.quiet {
        for target in &changed {
            println!("{} {verb} {target} ({})", status::SUCCESS, target.display_name());
        }
    }
    Ok(())
}
