//! Core business logic module
//!
//! Orchestration logic lives here. Process spawning and the concrete
//! environment implementations belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`target`] - The closed set of build targets
//! - [`catalog`] - Discovery of buildable targets
//! - [`selection`] - Persisted target selection and reconciliation
//! - [`progress`] - Hierarchical progress reporting interface
//! - [`environment`] - Active-target state and snapshot/restore
//! - [`options`] - Per-target build options
//! - [`backend`] - Build backend interface
//! - [`orchestrator`] - Sequential build pipeline
//! - [`manifest`] - Manifest (multibuild.toml) parsing
//! - [`project`] - Project session and state file locations

pub mod backend;
pub mod catalog;
pub mod environment;
pub mod manifest;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod project;
pub mod selection;
pub mod target;
