//! Cargo build backend
//!
//! Builds one target with `cargo build --target <triple>`. Building switches
//! the project's active target first, the same way an editor switches
//! platforms before producing a player build.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use crate::config::defaults::DIAGNOSTIC_TAIL_LINES;
use crate::core::backend::{BuildBackend, BuildResult};
use crate::core::environment::EnvironmentState;
use crate::core::options::BuildOptions;

/// Backend that shells out to cargo
#[derive(Debug, Clone)]
pub struct CargoBackend<E> {
    program: PathBuf,
    env: E,
}

impl<E: EnvironmentState + Sync> CargoBackend<E> {
    /// Use the cargo binary at `program`, switching `env` before each build
    pub fn new(program: impl Into<PathBuf>, env: E) -> Self {
        Self {
            program: program.into(),
            env,
        }
    }

    /// Cargo binary in use
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for one invocation
    pub fn build_args(options: &BuildOptions) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--target".to_string(),
            options.target.triple().to_string(),
            "--target-dir".to_string(),
            options.scratch_dir().display().to_string(),
        ];
        match options.profile.as_str() {
            "dev" | "debug" => {}
            "release" => args.push("--release".to_string()),
            other => {
                args.push("--profile".to_string());
                args.push(other.to_string());
            }
        }
        args.extend(options.extra_args.iter().cloned());
        args
    }

    /// Where cargo leaves the binary for `options`
    pub fn produced_artifact(options: &BuildOptions) -> Option<PathBuf> {
        let file_name = options.artifact_path.file_name()?;
        let profile_dir = match options.profile.as_str() {
            "dev" | "debug" => "debug",
            other => other,
        };
        Some(
            options
                .scratch_dir()
                .join(options.target.triple())
                .join(profile_dir)
                .join(file_name),
        )
    }
}

impl<E: EnvironmentState + Sync> BuildBackend for CargoBackend<E> {
    async fn build(&self, options: &BuildOptions) -> BuildResult {
        let start = Instant::now();
        let target = options.target;

        if let Err(e) = self.env.set_active_target(target) {
            return BuildResult::failure(
                start.elapsed(),
                format!("cannot switch active target to {target}: {e}"),
            );
        }

        if let Err(e) = tokio::fs::create_dir_all(&options.output_dir).await {
            return BuildResult::failure(
                start.elapsed(),
                format!(
                    "cannot create output directory {}: {e}",
                    options.output_dir.display()
                ),
            );
        }

        let args = Self::build_args(options);
        tracing::debug!("Running {} {}", self.program.display(), args.join(" "));

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&args)
            .current_dir(&options.project_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        // Out of the terminal's foreground group, Ctrl-C is handled between targets
        #[cfg(unix)]
        command.process_group(0);

        let output = command.output().await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                return BuildResult::failure(
                    start.elapsed(),
                    format!("failed to run {}: {e}", self.program.display()),
                );
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return BuildResult::failure(
                start.elapsed(),
                format!("cargo exited with {}\n{}", output.status, tail(&stderr)),
            );
        }

        if let Some(produced) = Self::produced_artifact(options) {
            if produced.exists() {
                if let Err(e) = tokio::fs::copy(&produced, &options.artifact_path).await {
                    return BuildResult::failure(
                        start.elapsed(),
                        format!(
                            "cannot copy {} to {}: {e}",
                            produced.display(),
                            options.artifact_path.display()
                        ),
                    );
                }
                tracing::info!("Artifact: {}", options.artifact_path.display());
            } else {
                tracing::debug!("No binary at {}, leaving output as is", produced.display());
            }
        }

        BuildResult::success(start.elapsed())
    }
}

/// Last lines of a process's stderr
fn tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    lines[start..].join("\n")
}
