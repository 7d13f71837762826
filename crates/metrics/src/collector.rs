//! Shared metrics collector
//!
//! Counters are atomics; per-endpoint latency histograms and check tallies sit
//! behind short-lived `parking_lot` locks. One collector is shared by every
//! virtual user through cheap clones.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use parking_lot::Mutex;

use crate::snapshot::{
    CheckSnapshot, EndpointSnapshot, IterationSnapshot, LatencyStats, MetricsSnapshot,
};

/// Histogram precision
const SIGNIFICANT_DIGITS: u8 = 3;

/// Histogram range in microseconds; slower requests are clamped to one hour
const LATENCY_LOW_MICROS: u64 = 1;
const LATENCY_HIGH_MICROS: u64 = 3_600_000_000;

/// Thread-safe collector for a load run
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Inner>,
}

struct Inner {
    started_at: Instant,
    iterations_started: AtomicU64,
    iterations_completed: AtomicU64,
    iterations_aborted: AtomicU64,
    iterations_interrupted: AtomicU64,
    vus_active: AtomicU64,
    vus_max: AtomicU64,
    endpoints: Mutex<Vec<EndpointStats>>,
    checks: Mutex<Vec<CheckSnapshot>>,
}

struct EndpointStats {
    name: String,
    /// Microseconds
    latency: Histogram<u64>,
    statuses: BTreeMap<u16, u64>,
    transport_errors: u64,
}

impl EndpointStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            latency: Histogram::new_with_bounds(
                LATENCY_LOW_MICROS,
                LATENCY_HIGH_MICROS,
                SIGNIFICANT_DIGITS,
            )
            .expect("latency histogram bounds are valid"),
            statuses: BTreeMap::new(),
            transport_errors: 0,
        }
    }

    fn record_latency(&mut self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.latency.saturating_record(micros);
    }

    fn snapshot(&self) -> EndpointSnapshot {
        EndpointSnapshot {
            name: self.name.clone(),
            count: self.latency.len(),
            statuses: self.statuses.clone(),
            transport_errors: self.transport_errors,
            latency: latency_stats(&self.latency),
        }
    }
}

fn latency_stats(hist: &Histogram<u64>) -> LatencyStats {
    if hist.is_empty() {
        return LatencyStats::default();
    }

    let ms = |micros: u64| micros as f64 / 1000.0;
    LatencyStats {
        min_ms: ms(hist.min()),
        mean_ms: hist.mean() / 1000.0,
        p50_ms: ms(hist.value_at_quantile(0.50)),
        p90_ms: ms(hist.value_at_quantile(0.90)),
        p95_ms: ms(hist.value_at_quantile(0.95)),
        p99_ms: ms(hist.value_at_quantile(0.99)),
        max_ms: ms(hist.max()),
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Create a collector; elapsed time is measured from here
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                started_at: Instant::now(),
                iterations_started: AtomicU64::new(0),
                iterations_completed: AtomicU64::new(0),
                iterations_aborted: AtomicU64::new(0),
                iterations_interrupted: AtomicU64::new(0),
                vus_active: AtomicU64::new(0),
                vus_max: AtomicU64::new(0),
                endpoints: Mutex::new(Vec::new()),
                checks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Time since the collector was created
    pub fn elapsed(&self) -> Duration {
        self.inner.started_at.elapsed()
    }

    /// Record a request that produced an HTTP response
    pub fn record_request(&self, endpoint: &str, status: u16, elapsed: Duration) {
        self.with_endpoint(endpoint, |stats| {
            stats.record_latency(elapsed);
            *stats.statuses.entry(status).or_insert(0) += 1;
        });
    }

    /// Record a request that failed before a response arrived
    pub fn record_transport_error(&self, endpoint: &str, elapsed: Duration) {
        self.with_endpoint(endpoint, |stats| {
            stats.record_latency(elapsed);
            stats.transport_errors += 1;
        });
    }

    /// Tally one evaluation of a named check
    pub fn record_check(&self, name: &str, passed: bool) {
        let mut checks = self.inner.checks.lock();
        let index = match checks.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                checks.push(CheckSnapshot {
                    name: name.to_string(),
                    ..Default::default()
                });
                checks.len() - 1
            }
        };

        if passed {
            checks[index].passes += 1;
        } else {
            checks[index].fails += 1;
        }
    }

    pub fn iteration_started(&self) {
        self.inner.iterations_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn iteration_completed(&self) {
        self.inner.iterations_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn iteration_aborted(&self) {
        self.inner.iterations_aborted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn iteration_interrupted(&self) {
        self.inner
            .iterations_interrupted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn vu_started(&self) {
        let active = self.inner.vus_active.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.vus_max.fetch_max(active, Ordering::Relaxed);
    }

    pub fn vu_stopped(&self) {
        // Never underflow, even if a stop is reported twice
        let _ = self
            .inner
            .vus_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Copy out the current state
    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self
            .inner
            .endpoints
            .lock()
            .iter()
            .map(EndpointStats::snapshot)
            .collect();
        let checks = self.inner.checks.lock().clone();

        MetricsSnapshot {
            elapsed_secs: self.elapsed().as_secs_f64(),
            vus_active: self.inner.vus_active.load(Ordering::Relaxed),
            vus_max: self.inner.vus_max.load(Ordering::Relaxed),
            iterations: IterationSnapshot {
                started: self.inner.iterations_started.load(Ordering::Relaxed),
                completed: self.inner.iterations_completed.load(Ordering::Relaxed),
                aborted: self.inner.iterations_aborted.load(Ordering::Relaxed),
                interrupted: self.inner.iterations_interrupted.load(Ordering::Relaxed),
            },
            requests,
            checks,
        }
    }

    fn with_endpoint(&self, endpoint: &str, f: impl FnOnce(&mut EndpointStats)) {
        let mut endpoints = self.inner.endpoints.lock();
        match endpoints.iter_mut().find(|e| e.name == endpoint) {
            Some(stats) => f(stats),
            None => {
                let mut stats = EndpointStats::new(endpoint);
                f(&mut stats);
                endpoints.push(stats);
            }
        }
    }
}
