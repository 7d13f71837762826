//! Virtual user state

use std::time::Duration;

use crudload_metrics::MetricsCollector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One simulated client
///
/// Owned by exactly one engine task, so nothing here is shared with other
/// virtual users except the metrics collector.
pub struct VirtualUser {
    id: usize,
    iteration: u64,
    rng: StdRng,
    metrics: MetricsCollector,
    stop: CancellationToken,
}

impl VirtualUser {
    /// Create a virtual user
    ///
    /// `id` is 1-based. With a `seed`, the RNG is seeded from `seed + id` so
    /// every VU draws a distinct but reproducible sequence.
    pub fn new(
        id: usize,
        seed: Option<u64>,
        metrics: MetricsCollector,
        stop: CancellationToken,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_os_rng(),
        };

        Self {
            id,
            iteration: 0,
            rng,
            metrics,
            stop,
        }
    }

    /// 1-based VU number
    pub fn id(&self) -> usize {
        self.id
    }

    /// 0-based iteration number of this VU
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub(crate) fn advance(&mut self) {
        self.iteration += 1;
    }

    /// Per-VU random number generator
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Shared metrics collector
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Record a named check and return `passed`
    ///
    /// A failed check is tallied and logged; it never stops the iteration.
    pub fn check(&self, name: &str, passed: bool) -> bool {
        self.metrics.record_check(name, passed);
        if !passed {
            debug!(vu = self.id, iteration = self.iteration, check = name, "check failed");
        }
        passed
    }

    /// Record a request that got an HTTP response
    pub fn record_request(&self, endpoint: &str, status: u16, elapsed: Duration) {
        self.metrics.record_request(endpoint, status, elapsed);
    }

    /// Record a request that failed before a response arrived
    pub fn record_transport_error(&self, endpoint: &str, elapsed: Duration) {
        self.metrics.record_transport_error(endpoint, elapsed);
    }

    /// Sleep for `duration`, returning early once the run is stopping
    ///
    /// Returns `true` if the full duration elapsed.
    pub async fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return true;
        }

        tokio::select! {
            _ = self.stop.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    /// Whether the engine has stopped scheduling new iterations
    pub fn is_stopping(&self) -> bool {
        self.stop.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn vu(id: usize, seed: Option<u64>) -> VirtualUser {
        VirtualUser::new(id, seed, MetricsCollector::new(), CancellationToken::new())
    }

    fn draws(vu: &mut VirtualUser) -> Vec<u32> {
        (0..8).map(|_| vu.rng().random_range(0..1000)).collect()
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        assert_eq!(draws(&mut vu(3, Some(42))), draws(&mut vu(3, Some(42))));
    }

    #[test]
    fn test_seeded_rng_differs_per_vu() {
        assert_ne!(draws(&mut vu(1, Some(42))), draws(&mut vu(2, Some(42))));
    }

    #[test]
    fn test_check_records_and_returns() {
        let vu = vu(1, None);
        assert!(vu.check("login status 200", true));
        assert!(!vu.check("login status 200", false));

        let snap = vu.metrics().snapshot();
        let check = snap.check("login status 200").expect("check recorded");
        assert_eq!((check.passes, check.fails), (1, 1));
    }

    #[test]
    fn test_iteration_counter() {
        let mut vu = vu(1, None);
        assert_eq!(vu.iteration(), 0);
        vu.advance();
        vu.advance();
        assert_eq!(vu.iteration(), 2);
    }

    #[tokio::test]
    async fn test_pause_full_duration() {
        let vu = vu(1, None);
        assert!(vu.pause(Duration::from_millis(5)).await);
        assert!(vu.pause(Duration::ZERO).await);
    }

    #[tokio::test]
    async fn test_pause_ends_on_stop() {
        let stop = CancellationToken::new();
        let vu = VirtualUser::new(1, None, MetricsCollector::new(), stop.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            stop.cancel();
        });

        let paused = tokio::time::timeout(Duration::from_secs(5), vu.pause(Duration::from_secs(60)))
            .await
            .expect("pause should end on stop");
        assert!(!paused);
        assert!(vu.is_stopping());
        canceller.await.expect("canceller task");
    }
}
