//! Per-resource-class request scheduling with retry
//!
//! Each [`QueueClass`] owns an independent lane with its own concurrency cap and
//! minimum spacing between request starts, so a backlog of match-detail fetches
//! never delays an account lookup. Retry policy for the whole crate lives here:
//! a retryable failure releases its slot, waits, and re-enters the lane at the
//! back of the queue.

mod lane;

pub use lane::LaneStats;

use lane::Lane;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::{lanes, retry};
use crate::error::AppError;

/// Throttling lane for one category of upstream resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueClass {
    MatchIdListing,
    MatchDetail,
    MatchTimeline,
    General,
}

impl QueueClass {
    pub const ALL: [QueueClass; 4] = [
        QueueClass::MatchIdListing,
        QueueClass::MatchDetail,
        QueueClass::MatchTimeline,
        QueueClass::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueClass::MatchIdListing => "match-id-listing",
            QueueClass::MatchDetail => "match-detail",
            QueueClass::MatchTimeline => "match-timeline",
            QueueClass::General => "general",
        }
    }
}

impl fmt::Display for QueueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub max_concurrent: usize,
    pub min_interval_ms: u64,
}

impl LaneConfig {
    pub const fn new(max_concurrent: usize, min_interval_ms: u64) -> Self {
        Self {
            max_concurrent,
            min_interval_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub match_id_listing: LaneConfig,
    pub match_detail: LaneConfig,
    pub match_timeline: LaneConfig,
    pub general: LaneConfig,
    pub max_retries: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            match_id_listing: LaneConfig::new(
                lanes::MATCH_IDS_MAX_CONCURRENT,
                lanes::MATCH_IDS_MIN_INTERVAL_MS,
            ),
            match_detail: LaneConfig::new(
                lanes::MATCH_DETAIL_MAX_CONCURRENT,
                lanes::MATCH_DETAIL_MIN_INTERVAL_MS,
            ),
            match_timeline: LaneConfig::new(
                lanes::MATCH_TIMELINE_MAX_CONCURRENT,
                lanes::MATCH_TIMELINE_MIN_INTERVAL_MS,
            ),
            general: LaneConfig::new(lanes::GENERAL_MAX_CONCURRENT, lanes::GENERAL_MIN_INTERVAL_MS),
            max_retries: retry::MAX_RETRIES,
        }
    }
}

impl SchedulerConfig {
    /// No spacing between requests; concurrency caps are kept. Meant for local mocks.
    pub fn unthrottled() -> Self {
        let defaults = Self::default();
        Self {
            match_id_listing: LaneConfig::new(defaults.match_id_listing.max_concurrent, 0),
            match_detail: LaneConfig::new(defaults.match_detail.max_concurrent, 0),
            match_timeline: LaneConfig::new(defaults.match_timeline.max_concurrent, 0),
            general: LaneConfig::new(defaults.general.max_concurrent, 0),
            max_retries: defaults.max_retries,
        }
    }

    pub fn lane(&self, class: QueueClass) -> LaneConfig {
        match class {
            QueueClass::MatchIdListing => self.match_id_listing,
            QueueClass::MatchDetail => self.match_detail,
            QueueClass::MatchTimeline => self.match_timeline,
            QueueClass::General => self.general,
        }
    }
}

#[derive(Debug)]
pub struct Scheduler {
    match_id_listing: Lane,
    match_detail: Lane,
    match_timeline: Lane,
    general: Lane,
    max_retries: u32,
}

impl Scheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            match_id_listing: Lane::new(
                QueueClass::MatchIdListing,
                config.lane(QueueClass::MatchIdListing),
            ),
            match_detail: Lane::new(QueueClass::MatchDetail, config.lane(QueueClass::MatchDetail)),
            match_timeline: Lane::new(
                QueueClass::MatchTimeline,
                config.lane(QueueClass::MatchTimeline),
            ),
            general: Lane::new(QueueClass::General, config.lane(QueueClass::General)),
            max_retries: config.max_retries,
        }
    }

    fn lane(&self, class: QueueClass) -> &Lane {
        match class {
            QueueClass::MatchIdListing => &self.match_id_listing,
            QueueClass::MatchDetail => &self.match_detail,
            QueueClass::MatchTimeline => &self.match_timeline,
            QueueClass::General => &self.general,
        }
    }

    pub fn stats(&self, class: QueueClass) -> LaneStats {
        self.lane(class).stats()
    }

    /// Runs `task` in the lane for `class`, retrying transient failures.
    ///
    /// `task` is invoked once per attempt. Rate limits wait for the upstream hint,
    /// timeouts and 5xx back off exponentially. After `max_retries` re-enqueues a
    /// rate limit surfaces as [`AppError::RetriesExhausted`]; other transient
    /// errors surface as their last occurrence. Non-retryable errors return at once.
    pub async fn schedule<T, F, Fut>(&self, class: QueueClass, mut task: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let lane = self.lane(class);
        let mut attempt = 0u32;
        let mut backoff = Duration::from_millis(retry::BASE_BACKOFF_MS);

        loop {
            match lane.run_attempt(&mut task).await {
                Ok(value) => {
                    lane.record_success();
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let wait = match e.retry_after() {
                        Some(hint) => hint,
                        None => {
                            let jitter = rand::rng().random_range(0..=retry::BACKOFF_JITTER_MS);
                            let wait = backoff + Duration::from_millis(jitter);
                            backoff = backoff.saturating_mul(2);
                            wait
                        }
                    };
                    attempt += 1;
                    lane.record_retry();
                    warn!(
                        "Transient failure in lane {}: {}. Re-enqueueing in {:?} (retry {}/{})",
                        class, e, wait, attempt, self.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    lane.record_failure();
                    if let AppError::ApiRateLimit { retry_after, .. } = e {
                        warn!(
                            "Lane {} exhausted {} retries against upstream rate limiting",
                            class, self.max_retries
                        );
                        return Err(AppError::RetriesExhausted {
                            attempts: attempt + 1,
                            retry_after,
                        });
                    }
                    debug!("Lane {} task failed without retry: {}", class, e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use tokio::sync::Mutex;
    use tokio::time::Instant;

    fn single_lane(max_concurrent: usize, min_interval_ms: u64) -> Scheduler {
        let mut config = SchedulerConfig::unthrottled();
        config.general = LaneConfig::new(max_concurrent, min_interval_ms);
        Scheduler::new(&config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_concurrent_is_never_exceeded() {
        let scheduler = single_lane(2, 0);
        let current = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let (current, peak) = (&current, &peak);

        let tasks = (0..8).map(|_| {
            scheduler.schedule(QueueClass::General, move || async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, AppError>(())
            })
        });
        let results = futures::future::join_all(tasks).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        let stats = scheduler.stats(QueueClass::General);
        assert_eq!(stats.peak_in_flight, 2);
        assert_eq!(stats.completed, 8);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tasks_start_in_submission_order() {
        let scheduler = single_lane(1, 0);
        let order = Mutex::new(Vec::new());

        let tasks = (0..5).map(|i| {
            let order = &order;
            scheduler.schedule(QueueClass::General, move || async move {
                order.lock().await.push(i);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok::<_, AppError>(i)
            })
        });
        futures::future::join_all(tasks).await;

        assert_eq!(*order.lock().await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_spaces_request_starts() {
        let scheduler = single_lane(4, 400);
        let starts = Mutex::new(Vec::new());

        let tasks = (0..3).map(|_| {
            let starts = &starts;
            scheduler.schedule(QueueClass::General, move || async move {
                starts.lock().await.push(Instant::now());
                Ok::<_, AppError>(())
            })
        });
        futures::future::join_all(tasks).await;

        let starts = starts.lock().await;
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(400));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_twice_then_succeeds_uses_two_retries() {
        let scheduler = single_lane(1, 0);
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;

        let result = scheduler
            .schedule(QueueClass::General, move || async move {
                let call = calls_ref.fetch_add(1, Ordering::SeqCst) + 1;
                if call <= 2 {
                    Err(AppError::api_rate_limit(None, "url"))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.stats(QueueClass::General).retries, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_on_every_attempt_is_exhausted() {
        let scheduler = single_lane(1, 0);
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;

        let result: Result<(), AppError> = scheduler
            .schedule(QueueClass::General, move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err(AppError::api_rate_limit(Some(Duration::from_secs(2)), "url"))
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::RetriesExhausted { attempts: 4, .. }));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));
        assert_eq!(calls.load(Ordering::SeqCst), retry::MAX_RETRIES + 1);
        assert_eq!(scheduler.stats(QueueClass::General).failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_for_upstream_hint() {
        let scheduler = single_lane(1, 0);
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;
        let started = Instant::now();

        scheduler
            .schedule(QueueClass::General, move || async move {
                if calls_ref.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::api_rate_limit(Some(Duration::from_secs(5)), "url"))
                } else {
                    Ok(())
                }
            })
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_errors_are_not_retried() {
        let scheduler = single_lane(1, 0);
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;

        let result: Result<(), AppError> = scheduler
            .schedule(QueueClass::General, move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err(AppError::api_forbidden("url"))
            })
            .await;

        assert!(matches!(result, Err(AppError::ApiForbidden { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_errors_surface_after_budget() {
        let scheduler = single_lane(1, 0);
        let calls = AtomicU32::new(0);
        let calls_ref = &calls;

        let result: Result<(), AppError> = scheduler
            .schedule(QueueClass::General, move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err(AppError::api_server_error(503, "Service Unavailable", "url"))
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::ApiServerError { status: 503, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lanes_do_not_block_each_other() {
        let scheduler = Arc::new(Scheduler::new(&SchedulerConfig::default()));
        let finished = Arc::new(Mutex::new(Vec::new()));

        let slow = {
            let scheduler = scheduler.clone();
            let finished = finished.clone();
            tokio::spawn(async move {
                scheduler
                    .schedule(QueueClass::MatchDetail, || async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok::<_, AppError>(())
                    })
                    .await
                    .unwrap();
                finished.lock().await.push(QueueClass::MatchDetail);
            })
        };
        tokio::task::yield_now().await;

        scheduler
            .schedule(QueueClass::General, || async { Ok::<_, AppError>(()) })
            .await
            .unwrap();
        finished.lock().await.push(QueueClass::General);

        slow.await.unwrap();
        assert_eq!(
            *finished.lock().await,
            vec![QueueClass::General, QueueClass::MatchDetail]
        );
    }
}
