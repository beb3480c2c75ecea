//! Hierarchical progress reporting
//!
//! A run opens one overall scope and one child scope per target. Sinks get an
//! explicit parent handle instead of relying on a global progress tracker.

use std::fmt;

/// Handle to an open progress scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Wrap a raw id handed out by a sink
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal status of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeStatus {
    /// Work finished without error
    Succeeded,
    /// Work stopped on error or cancellation
    Failed,
}

/// Surface that displays progress for a run
pub trait ProgressSink {
    /// Open a scope sized to `total` steps, optionally nested under `parent`
    fn begin_scope(&self, label: &str, total: u64, parent: Option<ScopeId>) -> ScopeId;

    /// Report `completed` of `total` steps
    fn report(&self, scope: ScopeId, completed: u64, total: u64);

    /// Close a scope
    fn finish(&self, scope: ScopeId, status: ScopeStatus);
}

/// Sink that discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin_scope(&self, _label: &str, _total: u64, _parent: Option<ScopeId>) -> ScopeId {
        ScopeId::new(0)
    }

    fn report(&self, _scope: ScopeId, _completed: u64, _total: u64) {}

    fn finish(&self, _scope: ScopeId, _status: ScopeStatus) {}
}
