//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod active;
pub mod build;
pub mod select;
pub mod targets;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::PathBuf;

use crate::cli::output::OutputConfig;
use crate::core::catalog::TargetCatalog;
use crate::core::project::Project;
use crate::core::selection::{ReconcileReport, TargetSelectionStore};
use crate::core::target::Target;
use crate::infra::rustup::RustupProbe;

/// Shared state for every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Project root
    pub project_dir: PathBuf,
    /// Output preferences
    pub output: OutputConfig,
    /// Explicit rustup binary
    pub rustup: Option<PathBuf>,
    /// Explicit cargo binary
    pub cargo: Option<PathBuf>,
}

/// A project with its freshly reconciled catalog and selection
pub struct Session {
    /// Opened project
    pub project: Project,
    /// Buildable targets
    pub catalog: TargetCatalog,
    /// Selection reconciled against `catalog`
    pub selection: TargetSelectionStore,
}

impl CommandContext {
    /// Open the project, refresh the catalog and reconcile the selection
    pub async fn open_session(&self) -> Result<Session> {
        let project = Project::open(&self.project_dir)?;

        let probe = match &self.rustup {
            Some(program) => RustupProbe::query_with(program).await,
            None => RustupProbe::query().await,
        }
        .context("Failed to discover buildable targets")?;

        let catalog = project.refresh_catalog(&probe)?;
        let (selection, report) = project.load_selection(&catalog)?;
        log_reconcile(&report);

        Ok(Session {
            project,
            catalog,
            selection,
        })
    }
}

fn log_reconcile(report: &ReconcileReport) {
    for target in &report.added {
        tracing::info!("New buildable target {target}, selected by default");
    }
    for target in &report.removed {
        tracing::info!("Target {target} is no longer buildable, dropped from selection");
    }
}

/// Parse target identifiers given on the command line
pub fn parse_targets(raw: &[String]) -> Result<Vec<Target>> {
    raw.iter()
        .map(|s| s.parse::<Target>().map_err(anyhow::Error::from))
        .collect()
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List buildable targets and their selection
    Targets,

    /// Select targets for building
    Select {
        /// Target identifiers (e.g. linux-x64) or triples
        targets: Vec<String>,

        /// Select every buildable target
        #[arg(long, conflicts_with = "targets")]
        all: bool,
    },

    /// Deselect targets
    Deselect {
        /// Target identifiers (e.g. linux-x64) or triples
        targets: Vec<String>,

        /// Deselect every buildable target
        #[arg(long, conflicts_with = "targets")]
        all: bool,
    },

    /// Show or set the active build target
    Active {
        /// Target to make active
        target: Option<String>,
    },

    /// Build selected targets one after another
    Build {
        /// Build these targets instead of the saved selection
        #[arg(short, long = "target")]
        targets: Vec<String>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Targets => targets::execute(ctx).await,
            Commands::Select { targets, all } => select::execute(ctx, &targets, all, true).await,
            Commands::Deselect { targets, all } => {
                select::execute(ctx, &targets, all, false).await
            }
            Commands::Active { target } => active::execute(ctx, target.as_deref()).await,
            Commands::Build { targets } => build::execute(ctx, &targets).await,
        }
    }
}
