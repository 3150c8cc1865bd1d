//! Shard resolution
//!
//! A player's game profile lives on exactly one platform shard, and which one is
//! unknown until probed. [`locate`] walks an ordered probe list one shard at a
//! time and stops at the first authoritative hit. Running out of shards is the
//! ordinary [`Outcome::NotLocated`] result, not an error.

pub mod identity;

pub use identity::{IdentityRouting, PlayerIdentity, PlayerRef, RiotId, resolve_identity};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, ErrorKind};
use crate::models::Summoner;
use crate::upstream::{GameApi, Platform};

/// How a shard was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeMethod {
    ByGlobalId,
    ByDisplayName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardLocation {
    pub shard: Platform,
    pub via_method: ProbeMethod,
    pub summoner: Summoner,
}

/// Identity that resolved globally but has no profile on any probed shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotLocated {
    pub identity: PlayerIdentity,
    pub probed: Vec<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<ProbeTrace>,
}

/// Result of a resolver-backed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    NotLocated(NotLocated),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::NotLocated(missing) => Outcome::NotLocated(missing),
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::NotLocated(_) => None,
        }
    }

    pub fn is_located(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeResult {
    Hit,
    Miss,
    Error { kind: ErrorKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeAttempt {
    pub shard: Platform,
    pub method: ProbeMethod,
    #[serde(flatten)]
    pub result: ProbeResult,
}

/// Every probe issued by one [`locate_traced`] call, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeTrace {
    pub probe_list: Vec<Platform>,
    pub attempts: Vec<ProbeAttempt>,
}

impl ProbeTrace {
    fn record(&mut self, shard: Platform, method: ProbeMethod, result: ProbeResult) {
        self.attempts.push(ProbeAttempt {
            shard,
            method,
            result,
        });
    }
}

#[derive(Debug, Clone)]
pub struct Located {
    pub outcome: Outcome<ShardLocation>,
    pub trace: ProbeTrace,
}

/// Options for one probe run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocateOptions<'a> {
    pub preferred: Option<Platform>,
    /// Falls back to the identity's game name when unset.
    pub display_name: Option<&'a str>,
}

/// Preferred shard first, then the default order, without duplicates.
pub fn build_probe_list(preferred: Option<Platform>, default_order: &[Platform]) -> Vec<Platform> {
    let mut list = Vec::with_capacity(default_order.len() + 1);
    for shard in preferred.into_iter().chain(default_order.iter().copied()) {
        if !list.contains(&shard) {
            list.push(shard);
        }
    }
    list
}

enum Probe {
    Hit(Summoner),
    Miss,
}

fn classify(result: Result<Summoner, AppError>) -> Result<Probe, AppError> {
    match result {
        Ok(summoner) if summoner.is_authoritative() => Ok(Probe::Hit(summoner)),
        Ok(_) => Ok(Probe::Miss),
        Err(e) if e.is_not_found() => Ok(Probe::Miss),
        Err(e) => Err(e),
    }
}

pub async fn locate(
    api: &GameApi,
    identity: &PlayerIdentity,
    default_order: &[Platform],
    options: LocateOptions<'_>,
) -> Result<Outcome<ShardLocation>, AppError> {
    locate_traced(api, identity, default_order, options)
        .await
        .map(|located| located.outcome)
}

/// Probes shards sequentially for `identity`.
///
/// Fatal credential errors abort immediately. Other upstream failures are
/// recorded and probing continues; if no shard hits, the first such failure is
/// returned instead of `NotLocated`, since the player may live on the shard
/// that failed. After every shard misses by global id, one lookup by display
/// name is made against the preferred shard only.
#[instrument(skip(api, identity, default_order), fields(global_id = %identity.global_id))]
pub async fn locate_traced(
    api: &GameApi,
    identity: &PlayerIdentity,
    default_order: &[Platform],
    options: LocateOptions<'_>,
) -> Result<Located, AppError> {
    let probe_list = build_probe_list(options.preferred, default_order);
    let mut trace = ProbeTrace {
        probe_list: probe_list.clone(),
        attempts: Vec::new(),
    };
    let mut deferred: Option<AppError> = None;

    for &shard in &probe_list {
        let result = classify(api.summoner_by_puuid(shard, &identity.global_id).await);
        match result {
            Ok(Probe::Hit(summoner)) => {
                trace.record(shard, ProbeMethod::ByGlobalId, ProbeResult::Hit);
                info!("Located player on {} after {} probes", shard, trace.attempts.len());
                return Ok(Located {
                    outcome: Outcome::Found(ShardLocation {
                        shard,
                        via_method: ProbeMethod::ByGlobalId,
                        summoner,
                    }),
                    trace,
                });
            }
            Ok(Probe::Miss) => {
                debug!("No profile on {}", shard);
                trace.record(shard, ProbeMethod::ByGlobalId, ProbeResult::Miss);
            }
            Err(e) if e.is_fatal() => {
                warn!("Aborting shard probe on {}: {}", shard, e);
                return Err(e);
            }
            Err(e) => {
                warn!("Probe on {} failed: {}", shard, e);
                trace.record(
                    shard,
                    ProbeMethod::ByGlobalId,
                    ProbeResult::Error { kind: e.kind() },
                );
                deferred.get_or_insert(e);
            }
        }
    }

    let display_name = options
        .display_name
        .map(str::trim)
        .or(Some(identity.game_name.trim()))
        .filter(|name| !name.is_empty());
    if let (Some(shard), Some(name)) = (options.preferred, display_name) {
        debug!("Falling back to display name lookup on {}", shard);
        match classify(api.summoner_by_name(shard, name).await) {
            Ok(Probe::Hit(summoner)) => {
                trace.record(shard, ProbeMethod::ByDisplayName, ProbeResult::Hit);
                return Ok(Located {
                    outcome: Outcome::Found(ShardLocation {
                        shard,
                        via_method: ProbeMethod::ByDisplayName,
                        summoner,
                    }),
                    trace,
                });
            }
            Ok(Probe::Miss) => {
                trace.record(shard, ProbeMethod::ByDisplayName, ProbeResult::Miss);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                trace.record(
                    shard,
                    ProbeMethod::ByDisplayName,
                    ProbeResult::Error { kind: e.kind() },
                );
                deferred.get_or_insert(e);
            }
        }
    }

    if let Some(e) = deferred {
        return Err(e);
    }

    info!("Player not located on any of {} shards", probe_list.len());
    Ok(Located {
        outcome: Outcome::NotLocated(NotLocated {
            identity: identity.clone(),
            probed: probe_list,
            trace: None,
        }),
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_list_puts_preferred_first_without_duplicates() {
        let list = build_probe_list(Some(Platform::Kr), &Platform::DEFAULT_PROBE_ORDER);
        assert_eq!(list.first(), Some(&Platform::Kr));
        assert_eq!(list.len(), Platform::DEFAULT_PROBE_ORDER.len());
        assert_eq!(list.iter().filter(|p| **p == Platform::Kr).count(), 1);
        assert_eq!(list[1], Platform::La1);
    }

    #[test]
    fn test_probe_list_with_new_preferred_shard() {
        let list = build_probe_list(Some(Platform::Vn2), &[Platform::La1, Platform::Na1]);
        assert_eq!(list, vec![Platform::Vn2, Platform::La1, Platform::Na1]);
    }

    #[test]
    fn test_probe_list_is_deterministic() {
        let a = build_probe_list(None, &Platform::DEFAULT_PROBE_ORDER);
        let b = build_probe_list(None, &Platform::DEFAULT_PROBE_ORDER);
        assert_eq!(a, b);
        assert_eq!(a, Platform::DEFAULT_PROBE_ORDER.to_vec());
    }

    #[test]
    fn test_probe_trace_serializes_errors_with_kind() {
        let mut trace = ProbeTrace::default();
        trace.record(
            Platform::Euw1,
            ProbeMethod::ByGlobalId,
            ProbeResult::Error {
                kind: ErrorKind::Timeout,
            },
        );
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["attempts"][0]["shard"], "euw1");
        assert_eq!(json["attempts"][0]["method"], "byGlobalId");
        assert_eq!(json["attempts"][0]["result"], "error");
        assert_eq!(json["attempts"][0]["kind"], "timeout");
    }
}
