//! Build command implementation
//!
//! Implements `multibuild build` to build the selected targets in catalog
//! order, stopping at the first failure.

use anyhow::{bail, Context, Result};
use tokio::sync::watch;

use super::{parse_targets, CommandContext};
use crate::cli::output::{status, TerminalProgress};
use crate::core::backend::BuildOutcome;
use crate::core::environment::RestoreStatus;
use crate::core::orchestrator::{BuildOrchestrator, BuildRun, RunOutcome, RunReport};
use crate::infra::cargo::CargoBackend;
use crate::infra::environment::FileEnvironment;
use crate::infra::rustup::locate;

/// Execute the build command
pub async fn execute(ctx: &CommandContext, requested: &[String]) -> Result<()> {
    let session = ctx.open_session().await?;

    let run = if requested.is_empty() {
        BuildRun::from_selection(&session.selection, &session.catalog)?
    } else {
        BuildRun::new(&session.catalog, parse_targets(requested)?)?
    };

    if run.is_empty() {
        if !ctx.output.quiet && !ctx.output.json {
            println!(
                "{} No targets selected. Use 'multibuild select' to choose some.",
                status::INFO
            );
        }
        return Ok(());
    }

    let cargo = locate("cargo", ctx.cargo.as_deref()).context("cargo not found in PATH")?;
    let env = FileEnvironment::new(session.project.active_target_path());
    let backend = CargoBackend::new(cargo, env.clone());
    let progress = TerminalProgress::new(ctx.output.progress_enabled());

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current target");
            let _ = cancel_tx.send(true);
        }
    });

    tracing::info!(
        "Building {} for: {}",
        session.project.manifest().project.name,
        run.targets()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let orchestrator = BuildOrchestrator::new(backend, env, progress, session.project.metadata())
        .with_cancellation(cancel_rx);
    let report = orchestrator.run(run).await;
    ctrl_c.abort();
    let report = report?;

    if ctx.output.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else if !ctx.output.quiet {
        print_summary(&report);
    }

    match &report.outcome {
        RunOutcome::AllSucceeded => Ok(()),
        RunOutcome::AbortedAt { target, .. } => bail!("Build aborted at {target}"),
        RunOutcome::Cancelled { before } => bail!("Build cancelled before {before}"),
    }
}

fn print_summary(report: &RunReport) {
    for result in &report.results {
        match &result.outcome {
            BuildOutcome::Succeeded(elapsed) => println!(
                "{} {} built in {:.1}s",
                status::SUCCESS,
                result.target.display_name(),
                elapsed.as_secs_f64()
            ),
            BuildOutcome::Failed(_) => {
                println!("{} {} failed", status::ERROR, result.target.display_name());
            }
        }
    }

    match &report.outcome {
        RunOutcome::AllSucceeded => println!(
            "{} Build complete! {} targets in {:.1}s",
            status::SUCCESS,
            report.results.len(),
            report.total_elapsed().as_secs_f64()
        ),
        RunOutcome::AbortedAt { target, reason } => {
            println!("{} Build failed for {target}:", status::ERROR);
            for line in reason.lines() {
                println!("    {line}");
            }
        }
        RunOutcome::Cancelled { before } => {
            println!("{} Build cancelled before {before}", status::WARNING);
        }
    }

    match &report.restore {
        RestoreStatus::Failed(_) => println!("{} {}", status::WARNING, report.restore),
        other => println!("{} {other}", status::INFO),
    }
}

fn report_json(report: &RunReport) -> serde_json::Value {
    let results: Vec<serde_json::Value> = report
        .results
        .iter()
        .map(|r| match &r.outcome {
            BuildOutcome::Succeeded(elapsed) => serde_json::json!({
                "target": r.target.identifier(),
                "succeeded": true,
                "elapsed_secs": elapsed.as_secs_f64(),
            }),
            BuildOutcome::Failed(reason) => serde_json::json!({
                "target": r.target.identifier(),
                "succeeded": false,
                "reason": reason,
            }),
        })
        .collect();

    let outcome = match &report.outcome {
        RunOutcome::AllSucceeded => serde_json::json!({ "status": "succeeded" }),
        RunOutcome::AbortedAt { target, reason } => serde_json::json!({
            "status": "aborted",
            "target": target.identifier(),
            "reason": reason,
        }),
        RunOutcome::Cancelled { before } => serde_json::json!({
            "status": "cancelled",
            "before": before.identifier(),
        }),
    };

    let restore = match &report.restore {
        RestoreStatus::Unchanged => serde_json::json!({ "status": "unchanged" }),
        RestoreStatus::Restored(target) => {
            serde_json::json!({ "status": "restored", "target": target.identifier() })
        }
        RestoreStatus::Failed(reason) => {
            serde_json::json!({ "status": "failed", "reason": reason })
        }
    };

    serde_json::json!({
        "outcome": outcome,
        "results": results,
        "restore": restore,
    })
}
