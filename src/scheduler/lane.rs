//! A single throttling lane: bounded concurrency plus minimum spacing between starts

use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tracing::trace;

use super::{LaneConfig, QueueClass};
use crate::error::AppError;

/// Counters exposed for monitoring and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneStats {
    pub class: QueueClass,
    pub completed: u64,
    pub failed: u64,
    pub retries: u64,
    pub in_flight: usize,
    pub peak_in_flight: usize,
}

#[derive(Debug)]
pub(super) struct Lane {
    class: QueueClass,
    // tokio's semaphore hands out permits in request order, which gives the lane its FIFO
    permits: Semaphore,
    min_interval: Duration,
    next_slot: Mutex<Option<Instant>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: AtomicU64,
    failed: AtomicU64,
    retries: AtomicU64,
}

impl Lane {
    pub(super) fn new(class: QueueClass, config: LaneConfig) -> Self {
        Self {
            class,
            permits: Semaphore::new(config.max_concurrent.max(1)),
            min_interval: Duration::from_millis(config.min_interval_ms),
            next_slot: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Runs one attempt once a permit and a start slot are available.
    pub(super) async fn run_attempt<T, F, Fut>(&self, task: &mut F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let _permit = self.permits.acquire().await.map_err(|_| {
            AppError::config_error(format!("scheduler lane {} is closed", self.class))
        })?;
        self.wait_for_slot().await;

        let _in_flight = InFlight::enter(self);
        task().await
    }

    async fn wait_for_slot(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let start = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *next {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next = Some(start + self.min_interval);
            start
        };
        trace!(
            "Lane {} waiting {:?} for its start slot",
            self.class,
            start.saturating_duration_since(Instant::now())
        );
        tokio::time::sleep_until(start).await;
    }

    pub(super) fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn stats(&self) -> LaneStats {
        LaneStats {
            class: self.class,
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            peak_in_flight: self.peak_in_flight.load(Ordering::Relaxed),
        }
    }
}

struct InFlight<'a> {
    lane: &'a Lane,
}

impl<'a> InFlight<'a> {
    fn enter(lane: &'a Lane) -> Self {
        let now = lane.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        lane.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { lane }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.lane.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
