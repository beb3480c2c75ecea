//! Sequential build orchestration
//!
//! Drives the backend through each target of a [`BuildRun`] one at a time.
//! The run stops at the first failure, and the environment's active target
//! is restored to its pre-run value on every exit path.
//!
//! Run lifecycle:
//!
//! ```text
//! NotStarted -> Running(0) -> Running(1) -> ... -> Running(n-1) -> Succeeded
//!                   \              \                    \
//!                    +--------------+--------------------+--> AbortedAt(i) | Cancelled(i)
//! ```

use std::time::Duration;
use tokio::sync::watch;

use crate::core::backend::{BuildBackend, BuildOutcome};
use crate::core::catalog::TargetCatalog;
use crate::core::environment::{EnvironmentSnapshot, EnvironmentState, RestoreStatus};
use crate::core::options::{DefaultResolver, OptionsResolver, ProjectMetadata};
use crate::core::progress::{ProgressSink, ScopeStatus};
use crate::core::selection::TargetSelectionStore;
use crate::core::target::Target;
use crate::error::BuildError;

/// Validated, single-use list of targets to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRun {
    targets: Vec<Target>,
}

impl BuildRun {
    /// Create a run, rejecting any target outside the catalog
    pub fn new(
        catalog: &TargetCatalog,
        targets: impl IntoIterator<Item = Target>,
    ) -> Result<Self, BuildError> {
        let mut run: Vec<Target> = Vec::new();
        for target in targets {
            catalog.ensure_contains(target)?;
            if run.contains(&target) {
                tracing::debug!("{target} requested more than once, building it once");
            } else {
                run.push(target);
            }
        }
        Ok(Self { targets: run })
    }

    /// Snapshot the selected targets of `store`
    ///
    /// Later changes to the store do not affect the returned run.
    pub fn from_selection(
        store: &TargetSelectionStore,
        catalog: &TargetCatalog,
    ) -> Result<Self, BuildError> {
        Self::new(catalog, store.selected())
    }

    /// Targets in build order
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the run has nothing to build
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Position of a run in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started yet
    NotStarted,
    /// Building the target at this index
    Running(usize),
    /// Every target built
    Succeeded,
    /// Target at this index failed
    AbortedAt(usize),
    /// Cancelled before the target at this index
    Cancelled(usize),
}

impl RunState {
    /// Whether the run is finished
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::AbortedAt(_) | Self::Cancelled(_)
        )
    }

    /// Check whether `next` is a legal successor for a run of `len` targets
    pub fn can_transition_to(self, next: RunState, len: usize) -> bool {
        match (self, next) {
            (Self::NotStarted, Self::Running(0) | Self::Cancelled(0)) => len > 0,
            (Self::Running(i), Self::Running(j)) => j == i + 1 && j < len,
            (Self::Running(i), Self::Succeeded) => i + 1 == len,
            (Self::Running(i), Self::AbortedAt(j)) => i == j,
            (Self::Running(i), Self::Cancelled(j)) => j == i + 1 && j < len,
            _ => false,
        }
    }
}

/// Run-level outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every target built
    AllSucceeded,
    /// A target failed; later targets were not attempted
    AbortedAt {
        /// Failing target
        target: Target,
        /// Backend diagnostic
        reason: String,
    },
    /// Cancellation was requested between targets
    Cancelled {
        /// First target that was not started
        before: Target,
    },
}

impl RunOutcome {
    /// Whether the run completed every target
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AllSucceeded)
    }
}

/// Result for one attempted target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResult {
    /// Target that was built
    pub target: Target,
    /// How the build went
    pub outcome: BuildOutcome,
}

/// Everything a finished run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Terminal outcome
    pub outcome: RunOutcome,
    /// Per-target results, in build order, for attempted targets only
    pub results: Vec<TargetResult>,
    /// What happened to the active target afterwards
    pub restore: RestoreStatus,
}

impl RunReport {
    fn empty() -> Self {
        Self {
            outcome: RunOutcome::AllSucceeded,
            results: Vec::new(),
            restore: RestoreStatus::Unchanged,
        }
    }

    /// Whether every target built
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Sum of reported build times of successful targets
    pub fn total_elapsed(&self) -> Duration {
        self.results
            .iter()
            .filter_map(|r| match r.outcome {
                BuildOutcome::Succeeded(elapsed) => Some(elapsed),
                BuildOutcome::Failed(_) => None,
            })
            .sum()
    }
}

/// Drives a backend over a sequence of targets
pub struct BuildOrchestrator<B, E, P, R = DefaultResolver> {
    backend: B,
    env: E,
    progress: P,
    resolver: R,
    project: ProjectMetadata,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl<B, E, P> BuildOrchestrator<B, E, P>
where
    B: BuildBackend,
    E: EnvironmentState,
    P: ProgressSink,
{
    /// Create an orchestrator using the default options resolver
    pub fn new(backend: B, env: E, progress: P, project: ProjectMetadata) -> Self {
        Self {
            backend,
            env,
            progress,
            resolver: DefaultResolver,
            project,
            cancel_rx: None,
        }
    }
}

impl<B, E, P, R> BuildOrchestrator<B, E, P, R>
where
    B: BuildBackend,
    E: EnvironmentState,
    P: ProgressSink,
    R: OptionsResolver,
{
    /// Swap the options resolver
    pub fn with_resolver<R2: OptionsResolver>(
        self,
        resolver: R2,
    ) -> BuildOrchestrator<B, E, P, R2> {
        BuildOrchestrator {
            backend: self.backend,
            env: self.env,
            progress: self.progress,
            resolver,
            project: self.project,
            cancel_rx: self.cancel_rx,
        }
    }

    /// Stop between targets once `cancel_rx` reads `true`
    #[must_use]
    pub fn with_cancellation(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Environment in use
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Progress sink in use
    pub fn progress(&self) -> &P {
        &self.progress
    }

    fn cancel_requested(&self) -> bool {
        self.cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Execute `run` to completion, first failure, or cancellation
    ///
    /// An empty run returns immediately without touching the environment or
    /// the progress sink. The only error after validation is failing to
    /// snapshot the active target; backend failures are reported through
    /// [`RunOutcome::AbortedAt`].
    pub async fn run(&self, run: BuildRun) -> Result<RunReport, BuildError> {
        if run.is_empty() {
            tracing::info!("No targets selected, nothing to build");
            return Ok(RunReport::empty());
        }

        tokio::task::yield_now().await;

        let total = run.len() as u64;
        let overall = self.progress.begin_scope(
            &format!("Building {} for {total} targets", self.project.name),
            total,
            None,
        );

        let snapshot = match EnvironmentSnapshot::take(&self.env) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.progress.finish(overall, ScopeStatus::Failed);
                return Err(BuildError::Snapshot(e));
            }
        };

        let mut state = RunState::NotStarted;
        let mut results = Vec::with_capacity(run.len());
        let mut outcome = RunOutcome::AllSucceeded;

        for (index, target) in run.targets.iter().copied().enumerate() {
            if index > 0 {
                tokio::task::yield_now().await;
            }

            if self.cancel_requested() {
                tracing::warn!("Cancellation requested, stopping before {target}");
                advance(&mut state, RunState::Cancelled(index), run.len());
                outcome = RunOutcome::Cancelled { before: target };
                break;
            }
            advance(&mut state, RunState::Running(index), run.len());

            self.progress.report(overall, index as u64, total);
            let scope = self
                .progress
                .begin_scope(target.display_name(), 1, Some(overall));

            let options = self.resolver.resolve(target, &self.project);
            tracing::info!(
                "[{}/{total}] Building {target} into {}",
                index + 1,
                options.output_dir.display()
            );

            let target_outcome = self.backend.build(&options).await.into_outcome();
            match &target_outcome {
                BuildOutcome::Succeeded(elapsed) => {
                    tracing::info!("Built {target} in {:.1}s", elapsed.as_secs_f64());
                    self.progress.report(scope, 1, 1);
                    self.progress.finish(scope, ScopeStatus::Succeeded);
                }
                BuildOutcome::Failed(reason) => {
                    tracing::warn!("Build for {target} failed: {reason}");
                    self.progress.finish(scope, ScopeStatus::Failed);
                    advance(&mut state, RunState::AbortedAt(index), run.len());
                    outcome = RunOutcome::AbortedAt {
                        target,
                        reason: reason.clone(),
                    };
                }
            }
            results.push(TargetResult {
                target,
                outcome: target_outcome,
            });

            if !outcome.is_success() {
                break;
            }
        }

        if outcome.is_success() {
            advance(&mut state, RunState::Succeeded, run.len());
            self.progress.report(overall, total, total);
            self.progress.finish(overall, ScopeStatus::Succeeded);
        } else {
            self.progress.finish(overall, ScopeStatus::Failed);
        }

        let restore = snapshot.restore(&self.env);
        match &restore {
            RestoreStatus::Failed(reason) => tracing::warn!("Environment not restored: {reason}"),
            status => tracing::info!("Run finished, {status}"),
        }

        tokio::task::yield_now().await;

        Ok(RunReport {
            outcome,
            results,
            restore,
        })
    }
}

fn advance(state: &mut RunState, next: RunState, len: usize) {
    debug_assert!(
        state.can_transition_to(next, len),
        "illegal run transition {state:?} -> {next:?}"
    );
    tracing::debug!("Run state {state:?} -> {next:?}");
    *state = next;
}
