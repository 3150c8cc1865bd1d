//! Aggregators: one denormalized view per use case
//!
//! Aggregators never perform network I/O themselves. They compose the shard
//! resolver with the scheduled, cached endpoints on [`GameApi`].
//!
//! Failure semantics shared by all of them:
//! - fatal credential errors abort the whole aggregation and propagate as-is;
//! - any other failure of a single item in a batch drops that item and adds a
//!   warning naming the error kind;
//! - rate limiting that outlives the scheduler's retry budget propagates as a
//!   retryable failure.

pub mod champion_stats;
pub mod live;
pub mod mastery;
pub mod match_summary;
pub mod overview;
pub mod recent;
pub mod stats;
pub mod timeline;

use futures::future::try_join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::MatchCache;
use crate::config::Config;
use crate::error::{AppError, ErrorKind};
use crate::models::MatchDetail;
use crate::resolver::{
    self, IdentityRouting, LocateOptions, Located, PlayerIdentity, PlayerRef, ProbeTrace,
    ShardLocation, resolve_identity,
};
use crate::scheduler::Scheduler;
use crate::upstream::{Cluster, GameApi, Platform, UpstreamClient};

pub use crate::resolver::{NotLocated, Outcome};

/// A view plus the best-effort markers collected while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> Report<T> {
    pub fn complete(data: T) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self { data, warnings }
    }

    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Who to look up, plus optional routing hints.
#[derive(Debug, Clone)]
pub struct PlayerQuery {
    pub player: PlayerRef,
    pub platform: Option<Platform>,
    pub cluster: Option<Cluster>,
}

impl PlayerQuery {
    pub fn new(player: PlayerRef) -> Self {
        Self {
            player,
            platform: None,
            cluster: None,
        }
    }

    pub fn on_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn in_cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    pub fn routing(&self) -> IdentityRouting {
        IdentityRouting {
            cluster: self.cluster,
            platform_hint: self.platform,
        }
    }
}

/// Process-lifetime owner of the upstream client, scheduler and match cache.
#[derive(Debug)]
pub struct AppContext {
    api: GameApi,
    probe_order: Vec<Platform>,
    default_platform: Platform,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        config.validate()?;
        let client = UpstreamClient::new(config)?;
        let scheduler = Scheduler::new(&config.scheduler);
        let cache = MatchCache::with_system_clock(
            config.match_cache_capacity,
            Duration::from_secs(config.match_cache_ttl_seconds),
        );
        info!(
            "Upstream client ready with key {} (cache ttl {}s, {} probe shards)",
            config.api_key,
            config.match_cache_ttl_seconds,
            config.probe_order.len()
        );
        Ok(Self::from_parts(
            GameApi::new(client, scheduler, cache),
            config.probe_order.clone(),
            config.default_platform,
        ))
    }

    pub fn from_parts(api: GameApi, probe_order: Vec<Platform>, default_platform: Platform) -> Self {
        Self {
            api,
            probe_order,
            default_platform,
        }
    }

    pub fn api(&self) -> &GameApi {
        &self.api
    }

    pub fn aggregator(&self) -> Aggregator<'_> {
        Aggregator {
            api: &self.api,
            probe_order: &self.probe_order,
            default_platform: self.default_platform,
        }
    }
}

/// Borrowed handle used by every aggregation.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    api: &'a GameApi,
    probe_order: &'a [Platform],
    default_platform: Platform,
}

/// Result of the `locate` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedPlayer {
    pub identity: PlayerIdentity,
    #[serde(flatten)]
    pub location: ShardLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ProbeTrace>,
}

impl<'a> Aggregator<'a> {
    pub fn api(&self) -> &'a GameApi {
        self.api
    }

    pub fn default_platform(&self) -> Platform {
        self.default_platform
    }

    /// Cluster for requests that only know a platform hint.
    pub fn cluster_for(&self, query: &PlayerQuery) -> Cluster {
        query.routing().cluster()
    }

    pub async fn resolve(&self, query: &PlayerQuery) -> Result<PlayerIdentity, AppError> {
        resolve_identity(self.api, &query.player, query.routing()).await
    }

    /// Global id without an identity round trip when the caller already has one.
    pub async fn global_id(&self, query: &PlayerQuery) -> Result<String, AppError> {
        match &query.player {
            PlayerRef::GlobalId(id) => Ok(id.clone()),
            PlayerRef::RiotId(_) => Ok(self.resolve(query).await?.global_id),
        }
    }

    pub async fn locate_identity(
        &self,
        identity: &PlayerIdentity,
        preferred: Option<Platform>,
    ) -> Result<Located, AppError> {
        let options = LocateOptions {
            preferred,
            display_name: None,
        };
        resolver::locate_traced(self.api, identity, self.probe_order, options).await
    }

    /// Resolves the identity, then probes shards for it.
    pub async fn locate(
        &self,
        query: &PlayerQuery,
        with_trace: bool,
    ) -> Result<Outcome<LocatedPlayer>, AppError> {
        let identity = self.resolve(query).await?;
        let Located { outcome, trace } = self.locate_identity(&identity, query.platform).await?;
        Ok(match outcome {
            Outcome::Found(location) => Outcome::Found(LocatedPlayer {
                identity,
                location,
                trace: with_trace.then_some(trace),
            }),
            Outcome::NotLocated(mut missing) => {
                if with_trace {
                    missing.trace = Some(trace);
                }
                Outcome::NotLocated(missing)
            }
        })
    }

    /// Fetches match details through the match-detail lane, in submission order.
    ///
    /// A match that fails on its own is dropped with a warning. Fatal credential
    /// errors and exhausted rate limits cancel the fetches still queued and are
    /// returned.
    pub async fn fetch_match_details(
        &self,
        cluster: Cluster,
        ids: &[String],
        warnings: &mut Vec<String>,
    ) -> Result<Vec<MatchDetail>, AppError> {
        let api = self.api;
        let fetches = ids.iter().map(|id| async move {
            match api.match_by_id(cluster, id).await {
                Ok(detail) => Ok(Ok(detail)),
                Err(e) if aborts_batch(&e) => Err(e),
                Err(e) => Ok(Err(e.kind())),
            }
        });
        let results = try_join_all(fetches).await?;

        let mut details = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(detail) => details.push(detail),
                Err(ErrorKind::NotFound) => {
                    warn!("Match {} is no longer available upstream", id);
                    warnings.push(format!("match {id} unavailable; omitted"));
                }
                Err(kind) => {
                    warn!("Omitting match {} after {} failure", id, kind.as_str());
                    warnings.push(format!("match {id} unavailable ({}); omitted", kind.as_str()));
                }
            }
        }
        Ok(details)
    }
}

/// Failures that end the whole request instead of a single item or section.
fn aborts_batch(e: &AppError) -> bool {
    e.is_fatal() || e.kind() == ErrorKind::RateLimited
}

/// Absorbs failures of an optional section into a warning.
///
/// Fatal credential errors and exhausted rate limits still abort the request.
pub(crate) fn optional_section<T: Default>(
    result: Result<T, AppError>,
    section: &str,
    warnings: &mut Vec<String>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if aborts_batch(&e) => Err(e),
        Err(e) => {
            warn!("Skipping {} section: {}", section, e);
            warnings.push(format!("{section} unavailable ({})", e.kind().as_str()));
            Ok(T::default())
        }
    }
}

/// Removes duplicate ids keeping the first occurrence, then truncates.
pub(crate) fn dedup_ids(ids: impl IntoIterator<Item = String>, limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .take(limit)
        .collect()
}
