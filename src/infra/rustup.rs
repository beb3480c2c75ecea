//! Installed-target discovery via rustup
//!
//! A target is buildable when its standard library is installed for the
//! active toolchain, as reported by `rustup target list --installed`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::catalog::TargetProbe;
use crate::core::target::Target;
use crate::error::CatalogError;

/// Probe answering from the installed rustup targets
#[derive(Debug, Clone)]
pub struct RustupProbe {
    installed: HashSet<String>,
}

impl RustupProbe {
    /// Locate `rustup` in PATH and query it
    pub async fn query() -> Result<Self, CatalogError> {
        let program = which::which("rustup").map_err(|_| CatalogError::ProbeUnavailable {
            tool: "rustup".to_string(),
        })?;
        Self::query_with(&program).await
    }

    /// Query installed targets using a specific rustup binary
    pub async fn query_with(program: &Path) -> Result<Self, CatalogError> {
        let command = format!("{} target list --installed", program.display());
        tracing::debug!("Running {command}");

        let output = tokio::process::Command::new(program)
            .args(["target", "list", "--installed"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CatalogError::ProbeUnavailable {
                        tool: program.display().to_string(),
                    }
                } else {
                    CatalogError::ProbeFailed {
                        command: command.clone(),
                        error: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            return Err(CatalogError::ProbeFailed {
                command,
                error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(Self::from_output(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Build a probe from `rustup target list --installed` output
    pub fn from_output(stdout: &str) -> Self {
        let installed = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { installed }
    }
}

impl TargetProbe for RustupProbe {
    fn is_buildable(&self, target: Target) -> Result<bool, CatalogError> {
        Ok(self.installed.contains(target.triple()))
    }
}

/// Resolve a tool from an explicit override or PATH
pub fn locate(tool: &str, override_path: Option<&Path>) -> Option<PathBuf> {
    match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => which::which(tool).ok(),
    }
}
