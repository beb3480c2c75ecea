//! Common test utilities and helpers
//!
//! Recording fakes for the orchestrator's collaborators, plus a temporary
//! project helper for CLI tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;

use multibuild::core::backend::{BuildBackend, BuildResult};
use multibuild::core::environment::EnvironmentState;
use multibuild::core::options::{BuildOptions, ProjectMetadata};
use multibuild::core::progress::{ProgressSink, ScopeId, ScopeStatus};
use multibuild::core::target::Target;
use multibuild::error::EnvironmentError;

/// In-memory active target with call accounting
pub struct MemoryEnvironment {
    active: Mutex<Target>,
    writes: Mutex<Vec<Target>>,
    reads: AtomicUsize,
    fail_reads: bool,
    refuse: Option<Target>,
}

impl MemoryEnvironment {
    /// Environment with `active` as the active target
    pub fn new(active: Target) -> Arc<Self> {
        Arc::new(Self::build(active, false, None))
    }

    /// Environment whose reads always fail
    pub fn unreadable(active: Target) -> Arc<Self> {
        Arc::new(Self::build(active, true, None))
    }

    /// Environment that rejects switching to `refused`
    pub fn refusing(active: Target, refused: Target) -> Arc<Self> {
        Arc::new(Self::build(active, false, Some(refused)))
    }

    fn build(active: Target, fail_reads: bool, refuse: Option<Target>) -> Self {
        Self {
            active: Mutex::new(active),
            writes: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            fail_reads,
            refuse,
        }
    }

    /// Current value without counting a read
    pub fn current(&self) -> Target {
        *self.active.lock().unwrap()
    }

    /// Every successful write, in order
    pub fn writes(&self) -> Vec<Target> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of reads
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl EnvironmentState for MemoryEnvironment {
    fn active_target(&self) -> Result<Target, EnvironmentError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(EnvironmentError::Read {
                path: PathBuf::from("memory"),
                error: "unreadable".to_string(),
            });
        }
        Ok(self.current())
    }

    fn set_active_target(&self, target: Target) -> Result<(), EnvironmentError> {
        if self.refuse == Some(target) {
            return Err(EnvironmentError::Write {
                path: PathBuf::from("memory"),
                error: format!("{target} is locked"),
            });
        }
        *self.active.lock().unwrap() = target;
        self.writes.lock().unwrap().push(target);
        Ok(())
    }
}

/// Backend that records invocations and switches the environment
pub struct RecordingBackend {
    calls: Mutex<Vec<BuildOptions>>,
    failures: HashMap<Target, String>,
    env: Option<Arc<MemoryEnvironment>>,
    cancel_after_first: Option<watch::Sender<bool>>,
}

impl RecordingBackend {
    /// Backend that succeeds for every target and leaves the environment alone
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: HashMap::new(),
            env: None,
            cancel_after_first: None,
        }
    }

    /// Switch `env` to each target before building it
    pub fn switching(mut self, env: &Arc<MemoryEnvironment>) -> Self {
        self.env = Some(Arc::clone(env));
        self
    }

    /// Fail the build for `target`
    pub fn failing(mut self, target: Target, reason: &str) -> Self {
        self.failures.insert(target, reason.to_string());
        self
    }

    /// Request cancellation while the first target builds
    pub fn cancelling(mut self, tx: watch::Sender<bool>) -> Self {
        self.cancel_after_first = Some(tx);
        self
    }

    /// Targets built so far, in order
    pub fn built(&self) -> Vec<Target> {
        self.calls.lock().unwrap().iter().map(|o| o.target).collect()
    }

    /// Options received so far
    pub fn options(&self) -> Vec<BuildOptions> {
        self.calls.lock().unwrap().clone()
    }
}

impl BuildBackend for RecordingBackend {
    async fn build(&self, options: &BuildOptions) -> BuildResult {
        self.calls.lock().unwrap().push(options.clone());
        if let Some(env) = &self.env {
            env.set_active_target(options.target).unwrap();
        }
        if let Some(tx) = &self.cancel_after_first {
            let _ = tx.send(true);
        }
        tokio::task::yield_now().await;

        match self.failures.get(&options.target) {
            Some(reason) => BuildResult::failure(Duration::from_millis(5), reason.clone()),
            None => BuildResult::success(Duration::from_millis(10)),
        }
    }
}

/// A progress call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Begin {
        scope: ScopeId,
        label: String,
        total: u64,
        parent: Option<ScopeId>,
    },
    Report {
        scope: ScopeId,
        completed: u64,
        total: u64,
    },
    Finish {
        scope: ScopeId,
        status: ScopeStatus,
    },
}

/// Progress sink that records every call
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
    next_id: AtomicU64,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call, in order
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Terminal status recorded for `scope`
    pub fn status_of(&self, scope: ScopeId) -> Option<ScopeStatus> {
        self.events().into_iter().find_map(|e| match e {
            ProgressEvent::Finish { scope: s, status } if s == scope => Some(status),
            _ => None,
        })
    }

    /// Scopes opened without a parent
    pub fn roots(&self) -> Vec<ScopeId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Begin {
                    scope,
                    parent: None,
                    ..
                } => Some(scope),
                _ => None,
            })
            .collect()
    }

    /// Child scopes of `parent` with their labels
    pub fn children(&self, parent: ScopeId) -> Vec<(ScopeId, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Begin {
                    scope,
                    label,
                    parent: Some(p),
                    ..
                } if p == parent => Some((scope, label)),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn begin_scope(&self, label: &str, total: u64, parent: Option<ScopeId>) -> ScopeId {
        let scope = ScopeId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.events.lock().unwrap().push(ProgressEvent::Begin {
            scope,
            label: label.to_string(),
            total,
            parent,
        });
        scope
    }

    fn report(&self, scope: ScopeId, completed: u64, total: u64) {
        self.events.lock().unwrap().push(ProgressEvent::Report {
            scope,
            completed,
            total,
        });
    }

    fn finish(&self, scope: ScopeId, status: ScopeStatus) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Finish { scope, status });
    }
}

/// Metadata for a project named `demo`
pub fn demo_project() -> ProjectMetadata {
    ProjectMetadata {
        name: "demo".to_string(),
        project_dir: PathBuf::from("/work/demo"),
        output_dir: PathBuf::from("/work/demo/builds"),
        profile: "release".to_string(),
        extra_args: Vec::new(),
    }
}

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write an executable shell script
    #[cfg(unix)]
    pub fn create_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample manifest TOML for testing
pub const SAMPLE_MANIFEST: &str = r#"
[project]
name = "demo"
output_dir = "builds"

[build]
profile = "release"
"#;
