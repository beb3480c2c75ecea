//! File-backed active target
//!
//! The active target is stored as a single identifier line in
//! `.multibuild/active-target`. Without that file the host target is active.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::environment::EnvironmentState;
use crate::core::target::Target;
use crate::error::EnvironmentError;

/// Target the running binary was compiled for, when it is a known target
pub fn host_target() -> Target {
    option_env!("VERGEN_CARGO_TARGET_TRIPLE")
        .and_then(Target::from_triple)
        .unwrap_or(Target::Linux64)
}

/// Active target persisted in a project's state directory
#[derive(Debug, Clone)]
pub struct FileEnvironment {
    path: PathBuf,
    fallback: Target,
}

impl FileEnvironment {
    /// Track the active target stored at `path`, defaulting to the host
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fallback(path, host_target())
    }

    /// Track the active target stored at `path` with an explicit default
    pub fn with_fallback(path: impl Into<PathBuf>, fallback: Target) -> Self {
        Self {
            path: path.into(),
            fallback,
        }
    }

    /// File backing this environment
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EnvironmentState for FileEnvironment {
    fn active_target(&self) -> Result<Target, EnvironmentError> {
        if !self.path.exists() {
            return Ok(self.fallback);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| EnvironmentError::Read {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        let value = content.trim();
        value.parse().map_err(|_| EnvironmentError::Corrupt {
            path: self.path.clone(),
            value: value.to_string(),
        })
    }

    fn set_active_target(&self, target: Target) -> Result<(), EnvironmentError> {
        let write_err = |e: std::io::Error| EnvironmentError::Write {
            path: self.path.clone(),
            error: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, format!("{}\n", target.identifier())).map_err(write_err)?;
        tracing::debug!("Active target set to {target}");
        Ok(())
    }
}
