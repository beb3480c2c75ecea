//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no orchestration logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{CommandContext, Commands};
use output::OutputConfig;

/// Multibuild - build one project for many platforms
///
/// Discovers which targets the installed toolchain can build, remembers which
/// ones you selected, and builds them one after another.
#[derive(Parser, Debug)]
#[command(name = "multibuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "project", global = true, default_value = ".")]
    pub project: PathBuf,

    /// rustup binary used to discover installed targets
    #[arg(long, global = true, env = "MULTIBUILD_RUSTUP", hide = true)]
    pub rustup: Option<PathBuf>,

    /// cargo binary used to build targets
    #[arg(long, global = true, env = "MULTIBUILD_CARGO", hide = true)]
    pub cargo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Output configuration implied by the global flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            project_dir: self.project.clone(),
            output: self.output_config(),
            rustup: self.rustup.clone(),
            cargo: self.cargo.clone(),
        };

        if let Some(cmd) = self.command {
            cmd.run(&ctx).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
