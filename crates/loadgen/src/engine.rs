//! Load engine
//!
//! Spawns one task per virtual user, releases them together, and keeps them
//! iterating until the test duration elapses, the iteration budget runs out,
//! or shutdown is requested.
//!
//! # Stopping
//!
//! ```text
//! duration / shutdown ──► stop token cancelled (no new iterations, pauses end)
//!                             │
//!                             ├──► tasks finish within graceful_stop ──► done
//!                             │
//!                             └──► graceful_stop elapsed ──► abort_all
//!                                  (in-flight iterations counted as interrupted)
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crudload_config::LoadConfig;
use crudload_metrics::{MetricsCollector, MetricsSnapshot};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::scenario::{IterationOutcome, Scenario};
use crate::vu::VirtualUser;

/// Engine settings
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Concurrent virtual users
    pub vus: usize,
    /// How long new iterations may start
    pub duration: Duration,
    /// Window for in-flight iterations after `duration`
    pub graceful_stop: Duration,
    /// Total iterations across all VUs
    pub iterations: Option<u64>,
    /// Base seed for per-VU RNGs
    pub seed: Option<u64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&LoadConfig::default())
    }
}

impl From<&LoadConfig> for LoadOptions {
    fn from(config: &LoadConfig) -> Self {
        Self {
            vus: config.vus,
            duration: config.duration,
            graceful_stop: config.graceful_stop,
            iterations: config.iterations,
            seed: config.seed,
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured duration elapsed
    DurationElapsed,
    /// Every iteration in the budget ran
    IterationsExhausted,
    /// Shutdown was requested (Ctrl+C)
    Shutdown,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::DurationElapsed => write!(f, "duration elapsed"),
            StopReason::IterationsExhausted => write!(f, "iterations exhausted"),
            StopReason::Shutdown => write!(f, "shutdown requested"),
        }
    }
}

/// Result of a finished run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reason: StopReason,
    /// Wall time from VU release to the last task ending
    pub elapsed: Duration,
    pub snapshot: MetricsSnapshot,
}

/// Shared cap on iterations across all VUs
struct IterationBudget {
    remaining: Option<AtomicU64>,
}

impl IterationBudget {
    fn new(limit: Option<u64>) -> Self {
        Self {
            remaining: limit.map(AtomicU64::new),
        }
    }

    /// Claim one iteration; `false` once the budget is spent
    fn try_acquire(&self) -> bool {
        match &self.remaining {
            None => true,
            Some(remaining) => remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok(),
        }
    }
}

/// Counts a VU as stopped, and its iteration as interrupted, however the task
/// ends (including abort)
struct VuGuard {
    metrics: MetricsCollector,
    in_iteration: bool,
}

impl VuGuard {
    fn new(metrics: MetricsCollector) -> Self {
        metrics.vu_started();
        Self {
            metrics,
            in_iteration: false,
        }
    }
}

impl Drop for VuGuard {
    fn drop(&mut self) {
        if self.in_iteration {
            self.metrics.iteration_interrupted();
        }
        self.metrics.vu_stopped();
    }
}

/// Runs a [`Scenario`] with a fixed number of virtual users
pub struct LoadEngine {
    options: LoadOptions,
    metrics: MetricsCollector,
}

impl LoadEngine {
    /// Create an engine recording into `metrics`
    pub fn new(options: LoadOptions, metrics: MetricsCollector) -> Self {
        Self { options, metrics }
    }

    /// Run until the duration elapses, the iteration budget is spent, or
    /// `shutdown` is cancelled
    pub async fn run<S: Scenario>(&self, scenario: Arc<S>, shutdown: CancellationToken) -> RunSummary {
        let options = &self.options;
        let stop = CancellationToken::new();
        let budget = Arc::new(IterationBudget::new(options.iterations));

        // Semaphore to synchronize start (initially no permits)
        let start_signal = Arc::new(Semaphore::new(0));

        let mut tasks = JoinSet::new();
        for id in 1..=options.vus {
            let vu = VirtualUser::new(id, options.seed, self.metrics.clone(), stop.clone());
            tasks.spawn(run_vu(
                vu,
                Arc::clone(&scenario),
                Arc::clone(&budget),
                Arc::clone(&start_signal),
            ));
        }

        info!(
            scenario = scenario.name(),
            vus = options.vus,
            duration = ?options.duration,
            iterations = ?options.iterations,
            "load test started"
        );

        let started = Instant::now();
        start_signal.add_permits(options.vus);

        let reason = tokio::select! {
            _ = tokio::time::sleep(options.duration) => StopReason::DurationElapsed,
            _ = shutdown.cancelled() => StopReason::Shutdown,
            _ = drain(&mut tasks) => StopReason::IterationsExhausted,
        };

        stop.cancel();

        if !tasks.is_empty() {
            info!(
                reason = %reason,
                graceful_stop = ?options.graceful_stop,
                "stopping, waiting for in-flight iterations"
            );

            if tokio::time::timeout(options.graceful_stop, drain(&mut tasks))
                .await
                .is_err()
            {
                warn!(
                    remaining = tasks.len(),
                    "graceful stop elapsed, interrupting iterations"
                );
                tasks.abort_all();
                drain(&mut tasks).await;
            }
        }

        let elapsed = started.elapsed();
        info!(reason = %reason, elapsed = ?elapsed, "load test finished");

        RunSummary {
            reason,
            elapsed,
            snapshot: self.metrics.snapshot(),
        }
    }
}

/// One VU's loop
async fn run_vu<S: Scenario>(
    mut vu: VirtualUser,
    scenario: Arc<S>,
    budget: Arc<IterationBudget>,
    start_signal: Arc<Semaphore>,
) {
    let mut guard = VuGuard::new(vu.metrics().clone());

    // Wait for start signal
    let _ = start_signal.acquire().await;

    while !vu.is_stopping() && budget.try_acquire() {
        guard.metrics.iteration_started();
        guard.in_iteration = true;

        let outcome = scenario.iteration(&mut vu).await;

        guard.in_iteration = false;
        match outcome {
            IterationOutcome::Completed => guard.metrics.iteration_completed(),
            IterationOutcome::Aborted => guard.metrics.iteration_aborted(),
        }
        vu.advance();
    }

    debug!(vu = vu.id(), iterations = vu.iteration(), "virtual user finished");
}

/// Wait for every task, logging panics
async fn drain(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result
            && !e.is_cancelled()
        {
            error!(error = %e, "virtual user task failed");
        }
    }
}
