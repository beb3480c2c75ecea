//! Error types for multibuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::target::Target;

/// Target identifier errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Identifier or triple does not name a known target
    #[error("Unknown target '{input}'. Run 'multibuild targets' to list buildable targets")]
    Unknown { input: String },
}

/// Catalog refresh errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The tool used to query installed targets is missing
    #[error("Cannot query installed targets: '{tool}' not found in PATH")]
    ProbeUnavailable { tool: String },

    /// The probe ran but failed
    #[error("Target query '{command}' failed: {error}")]
    ProbeFailed { command: String, error: String },
}

/// Selection store errors
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Toggle requested for a target outside the current catalog
    #[error("Target '{target}' is not buildable in this environment")]
    NotCataloged { target: Target },

    /// Failed to read or write the selection file
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Selection file is malformed
    #[error("Failed to parse selection file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Active-target environment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// Reading the active target failed
    #[error("Failed to read active target from '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Writing the active target failed
    #[error("Failed to set active target in '{path}': {error}")]
    Write { path: PathBuf, error: String },

    /// The stored value is not a known target
    #[error("Active target file '{path}' holds unknown target '{value}'")]
    Corrupt { path: PathBuf, value: String },
}

/// Build run errors
///
/// A failing backend is not an error here: it is reported through the run
/// outcome. These variants are the conditions that prevent a run from being
/// carried out at all.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A requested target is not in the current catalog
    #[error("Target '{target}' is not buildable in this environment")]
    UnsupportedTarget { target: Target },

    /// The pre-run snapshot of the active target could not be taken
    #[error("Cannot snapshot active target: {0}")]
    Snapshot(#[from] EnvironmentError),
}

/// Project manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest in the project directory
    #[error("Manifest not found at '{path}'. Create a multibuild.toml with a [project] table.")]
    NotFound { path: PathBuf },

    /// IO error while reading the manifest
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Manifest is malformed
    #[error("Failed to parse manifest: {error}")]
    Parse { error: String },

    /// Manifest references a target identifier that does not exist
    #[error("Manifest lists unknown target: {0}")]
    Target(#[from] TargetError),
}

/// Top-level multibuild error type
#[derive(Error, Debug)]
pub enum MultibuildError {
    /// Target error
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    /// Catalog error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Selection error
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    /// Environment error
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}
