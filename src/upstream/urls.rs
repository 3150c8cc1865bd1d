//! URL building utilities for upstream endpoints

use reqwest::Url;

use super::routing::{Cluster, Platform};
use crate::constants::HOST_PLACEHOLDER;
use crate::error::AppError;

/// Expands the configured host template for platforms and clusters.
///
/// The template holds a single `{host}` placeholder. The production template
/// puts it in the subdomain; local mocks put it in the first path segment.
#[derive(Debug, Clone)]
pub struct HostResolver {
    template: String,
}

impl HostResolver {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn platform_base(&self, platform: Platform) -> String {
        self.template.replace(HOST_PLACEHOLDER, platform.code())
    }

    pub fn cluster_base(&self, cluster: Cluster) -> String {
        self.template.replace(HOST_PLACEHOLDER, cluster.code())
    }
}

/// Joins percent-encoded path segments and query pairs onto a base URL.
///
/// # Example
/// ```
/// use rift_aggregator::upstream::build_url;
///
/// let url = build_url("https://la1.example.com", &["lol", "by-name", "Señor Zed"], &[]).unwrap();
/// assert_eq!(url.as_str(), "https://la1.example.com/lol/by-name/Se%C3%B1or%20Zed");
/// ```
pub fn build_url(base: &str, segments: &[&str], query: &[(&str, String)]) -> Result<Url, AppError> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::config_error(format!("invalid upstream base '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| AppError::config_error(format!("upstream base '{base}' cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

pub fn account_by_riot_id_url(
    hosts: &HostResolver,
    cluster: Cluster,
    game_name: &str,
    tag_line: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.cluster_base(cluster),
        &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        &[],
    )
}

pub fn account_by_puuid_url(
    hosts: &HostResolver,
    cluster: Cluster,
    puuid: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.cluster_base(cluster),
        &["riot", "account", "v1", "accounts", "by-puuid", puuid],
        &[],
    )
}

pub fn summoner_by_puuid_url(
    hosts: &HostResolver,
    platform: Platform,
    puuid: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.platform_base(platform),
        &["lol", "summoner", "v4", "summoners", "by-puuid", puuid],
        &[],
    )
}

pub fn summoner_by_name_url(
    hosts: &HostResolver,
    platform: Platform,
    name: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.platform_base(platform),
        &["lol", "summoner", "v4", "summoners", "by-name", name],
        &[],
    )
}

pub fn masteries_by_puuid_url(
    hosts: &HostResolver,
    platform: Platform,
    puuid: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.platform_base(platform),
        &["lol", "champion-mastery", "v4", "champion-masteries", "by-puuid", puuid],
        &[],
    )
}

pub fn league_entries_url(
    hosts: &HostResolver,
    platform: Platform,
    summoner_id: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.platform_base(platform),
        &["lol", "league", "v4", "entries", "by-summoner", summoner_id],
        &[],
    )
}

pub fn active_game_url(
    hosts: &HostResolver,
    platform: Platform,
    puuid: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.platform_base(platform),
        &["lol", "spectator", "v5", "active-games", "by-summoner", puuid],
        &[],
    )
}

pub fn match_ids_url(
    hosts: &HostResolver,
    cluster: Cluster,
    puuid: &str,
    start: usize,
    count: usize,
    queue: Option<u32>,
) -> Result<Url, AppError> {
    let mut query = vec![("start", start.to_string()), ("count", count.to_string())];
    if let Some(queue) = queue {
        query.push(("queue", queue.to_string()));
    }
    build_url(
        &hosts.cluster_base(cluster),
        &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        &query,
    )
}

pub fn match_url(hosts: &HostResolver, cluster: Cluster, match_id: &str) -> Result<Url, AppError> {
    build_url(
        &hosts.cluster_base(cluster),
        &["lol", "match", "v5", "matches", match_id],
        &[],
    )
}

pub fn match_timeline_url(
    hosts: &HostResolver,
    cluster: Cluster,
    match_id: &str,
) -> Result<Url, AppError> {
    build_url(
        &hosts.cluster_base(cluster),
        &["lol", "match", "v5", "matches", match_id, "timeline"],
        &[],
    )
}
