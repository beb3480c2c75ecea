//! Output formatting and progress indicators
//!
//! This module provides the terminal progress sink used during builds,
//! status prefixes, and error display.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::core::progress::{ProgressSink, ScopeId, ScopeStatus};

/// Output preferences derived from global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress everything but errors
    pub quiet: bool,
    /// Emit JSON instead of human-readable text
    pub json: bool,
    /// Verbosity count from `-v`
    pub verbose: u8,
}

impl OutputConfig {
    /// Create output configuration from CLI flags
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Tracing level implied by the flags
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, _) => tracing::Level::DEBUG,
        }
    }

    /// Whether progress bars should be drawn
    pub fn progress_enabled(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// Create a progress bar for the overall run
pub fn create_build_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} targets ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Create a spinner for a single target build
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("  {spinner:.blue} {msg} [{elapsed}]")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

struct Scope {
    bar: ProgressBar,
    label: String,
}

/// Progress sink drawing the run as nested indicatif bars
pub struct TerminalProgress {
    multi: MultiProgress,
    scopes: Mutex<HashMap<ScopeId, Scope>>,
    next_id: AtomicU64,
}

impl TerminalProgress {
    /// Create a sink; a disabled sink draws nothing
    pub fn new(enabled: bool) -> Self {
        let multi = if enabled {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        Self {
            multi,
            scopes: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl ProgressSink for TerminalProgress {
    fn begin_scope(&self, label: &str, total: u64, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut scopes = self.scopes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let bar = match parent.and_then(|p| scopes.get(&p)) {
            Some(parent) => self.multi.insert_after(&parent.bar, create_spinner(label)),
            None => {
                let bar = self.multi.add(create_build_bar(total));
                bar.set_message(label.to_string());
                bar
            }
        };

        scopes.insert(
            id,
            Scope {
                bar,
                label: label.to_string(),
            },
        );
        id
    }

    fn report(&self, scope: ScopeId, completed: u64, total: u64) {
        let scopes = self.scopes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(scope) = scopes.get(&scope) {
            scope.bar.set_length(total);
            scope.bar.set_position(completed);
        }
    }

    fn finish(&self, scope: ScopeId, status: ScopeStatus) {
        let mut scopes = self.scopes.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(scope) = scopes.remove(&scope) {
            let prefix = match status {
                ScopeStatus::Succeeded => status::SUCCESS,
                ScopeStatus::Failed => status::ERROR,
            };
            scope
                .bar
                .finish_with_message(format!("{prefix} {}", scope.label));
        }
    }
}

/// Print an error and its cause chain to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
