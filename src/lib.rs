//! Multibuild - sequential multi-platform build orchestrator
//!
//! This library builds one project for several platform targets, one target
//! at a time, with hierarchical progress and guaranteed restoration of the
//! active build target.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Target catalog, selection store and build orchestrator
//! - [`infra`] - Concrete collaborators (rustup, cargo, state files)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
