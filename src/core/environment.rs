//! Active build target state
//!
//! The backend builds for whatever target the environment currently has
//! active, and switches it as part of building. A run takes an
//! [`EnvironmentSnapshot`] before the first build and restores it on every
//! exit path.

use std::fmt;

use crate::core::target::Target;
use crate::error::EnvironmentError;

/// Read/write access to the active build target
pub trait EnvironmentState {
    /// Currently active target
    fn active_target(&self) -> Result<Target, EnvironmentError>;

    /// Make `target` the active target
    fn set_active_target(&self, target: Target) -> Result<(), EnvironmentError>;
}

impl<E: EnvironmentState + ?Sized> EnvironmentState for &E {
    fn active_target(&self) -> Result<Target, EnvironmentError> {
        (**self).active_target()
    }

    fn set_active_target(&self, target: Target) -> Result<(), EnvironmentError> {
        (**self).set_active_target(target)
    }
}

/// Result of putting the active target back after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreStatus {
    /// Active target already matched the snapshot; nothing written
    Unchanged,
    /// Active target was set back to the snapshot
    Restored(Target),
    /// Restoration did not take effect
    Failed(String),
}

impl RestoreStatus {
    /// Whether the environment ended up at the snapshot
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => f.write_str("active target unchanged"),
            Self::Restored(target) => write!(f, "active target restored to {target}"),
            Self::Failed(reason) => write!(f, "failed to restore active target: {reason}"),
        }
    }
}

/// Active target captured before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    original: Target,
}

impl EnvironmentSnapshot {
    /// Capture the current active target
    pub fn take(env: &impl EnvironmentState) -> Result<Self, EnvironmentError> {
        let original = env.active_target()?;
        tracing::debug!("Snapshot of active target: {original}");
        Ok(Self { original })
    }

    /// Target captured by the snapshot
    pub fn original(&self) -> Target {
        self.original
    }

    /// Set the environment back to the snapshot if it drifted
    ///
    /// Never fails: problems are folded into [`RestoreStatus::Failed`] so the
    /// caller's build outcome stays intact.
    pub fn restore(&self, env: &impl EnvironmentState) -> RestoreStatus {
        match env.active_target() {
            Ok(current) if current == self.original => {
                tracing::debug!("Active target still {current}, no restore needed");
                return RestoreStatus::Unchanged;
            }
            Ok(current) => {
                tracing::debug!("Active target is {current}, restoring {}", self.original);
            }
            Err(e) => {
                tracing::warn!("Cannot read active target before restore ({e}), restoring anyway");
            }
        }

        if let Err(e) = env.set_active_target(self.original) {
            tracing::warn!("Restoring active target {} failed: {e}", self.original);
            return RestoreStatus::Failed(e.to_string());
        }

        match env.active_target() {
            Ok(current) if current == self.original => RestoreStatus::Restored(self.original),
            Ok(current) => {
                let reason = format!("expected {}, environment reports {current}", self.original);
                tracing::warn!("Restore did not take effect: {reason}");
                RestoreStatus::Failed(reason)
            }
            Err(e) => {
                tracing::warn!("Cannot verify restored active target: {e}");
                RestoreStatus::Failed(e.to_string())
            }
        }
    }
}
