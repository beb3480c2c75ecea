//! Build backend interface
//!
//! The backend performs the actual compile/link/package step for a single
//! target. It may take minutes and may switch the environment's active target.

use std::future::Future;
use std::time::Duration;

use crate::core::options::BuildOptions;

/// Outcome of building a single target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Target built in the given wall time
    Succeeded(Duration),
    /// Target failed with a reason
    Failed(String),
}

impl BuildOutcome {
    /// Whether the target built
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Raw result reported by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Whether the build succeeded
    pub succeeded: bool,
    /// Wall time spent
    pub elapsed: Duration,
    /// Diagnostic output, usually present on failure
    pub diagnostic: Option<String>,
}

impl BuildResult {
    /// Successful build
    pub fn success(elapsed: Duration) -> Self {
        Self {
            succeeded: true,
            elapsed,
            diagnostic: None,
        }
    }

    /// Failed build with a diagnostic message
    pub fn failure(elapsed: Duration, diagnostic: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            elapsed,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Collapse into a [`BuildOutcome`]
    pub fn into_outcome(self) -> BuildOutcome {
        if self.succeeded {
            BuildOutcome::Succeeded(self.elapsed)
        } else {
            BuildOutcome::Failed(
                self.diagnostic
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| "build failed without diagnostics".to_string()),
            )
        }
    }
}

/// Performs the build for one target
pub trait BuildBackend {
    /// Build the target described by `options`
    fn build(&self, options: &BuildOptions) -> impl Future<Output = BuildResult> + Send;
}
