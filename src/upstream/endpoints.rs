//! Typed upstream endpoints
//!
//! Every call is routed through the [`Scheduler`] lane for its resource class.
//! Match details additionally go through the ephemeral cache. Mutable resources
//! (mastery, league standing, live games) always bypass it.

use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::client::UpstreamClient;
use super::routing::{Cluster, Platform};
use super::urls::{
    account_by_puuid_url, account_by_riot_id_url, active_game_url, league_entries_url,
    masteries_by_puuid_url, match_ids_url, match_timeline_url, match_url, summoner_by_name_url,
    summoner_by_puuid_url,
};
use crate::cache::MatchCache;
use crate::error::AppError;
use crate::models::{
    Account, ActiveGame, LeagueEntry, MasteryEntry, MatchDetail, MatchTimeline, Summoner,
};
use crate::scheduler::{QueueClass, Scheduler};

/// The upstream API as the resolver and aggregators see it.
#[derive(Debug)]
pub struct GameApi {
    client: UpstreamClient,
    scheduler: Scheduler,
    match_cache: MatchCache,
}

impl GameApi {
    pub fn new(client: UpstreamClient, scheduler: Scheduler, match_cache: MatchCache) -> Self {
        Self {
            client,
            scheduler,
            match_cache,
        }
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn match_cache(&self) -> &MatchCache {
        &self.match_cache
    }

    async fn scheduled<T: DeserializeOwned>(&self, class: QueueClass, url: Url) -> Result<T, AppError> {
        let client = &self.client;
        self.scheduler
            .schedule(class, move || client.get_json::<T>(url.clone()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn account_by_riot_id(
        &self,
        cluster: Cluster,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, AppError> {
        let url = account_by_riot_id_url(self.client.hosts(), cluster, game_name, tag_line)?;
        self.scheduled(QueueClass::General, url).await
    }

    #[instrument(skip(self))]
    pub async fn account_by_puuid(&self, cluster: Cluster, puuid: &str) -> Result<Account, AppError> {
        let url = account_by_puuid_url(self.client.hosts(), cluster, puuid)?;
        self.scheduled(QueueClass::General, url).await
    }

    #[instrument(skip(self))]
    pub async fn summoner_by_puuid(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Summoner, AppError> {
        let url = summoner_by_puuid_url(self.client.hosts(), platform, puuid)?;
        self.scheduled(QueueClass::General, url).await
    }

    #[instrument(skip(self))]
    pub async fn summoner_by_name(&self, platform: Platform, name: &str) -> Result<Summoner, AppError> {
        let url = summoner_by_name_url(self.client.hosts(), platform, name)?;
        self.scheduled(QueueClass::General, url).await
    }

    /// All champion masteries. A player without masteries yields an empty list.
    #[instrument(skip(self))]
    pub async fn masteries(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Vec<MasteryEntry>, AppError> {
        let url = masteries_by_puuid_url(self.client.hosts(), platform, puuid)?;
        absent_as_default(self.scheduled(QueueClass::General, url).await)
    }

    /// Ranked standing keyed by the shard-internal summoner id.
    #[instrument(skip(self))]
    pub async fn league_entries(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<Vec<LeagueEntry>, AppError> {
        let url = league_entries_url(self.client.hosts(), platform, summoner_id)?;
        absent_as_default(self.scheduled(QueueClass::General, url).await)
    }

    #[instrument(skip(self))]
    pub async fn match_ids(
        &self,
        cluster: Cluster,
        puuid: &str,
        start: usize,
        count: usize,
        queue: Option<u32>,
    ) -> Result<Vec<String>, AppError> {
        let url = match_ids_url(self.client.hosts(), cluster, puuid, start, count, queue)?;
        absent_as_default(self.scheduled(QueueClass::MatchIdListing, url).await)
    }

    /// Finished match details, served from the cache when possible.
    #[instrument(skip(self))]
    pub async fn match_by_id(&self, cluster: Cluster, match_id: &str) -> Result<MatchDetail, AppError> {
        if let Some(cached) = self.match_cache.get(match_id).await {
            debug!("Match {} served from cache", match_id);
            return Ok(cached);
        }

        let url = match_url(self.client.hosts(), cluster, match_id)?;
        let detail: MatchDetail = self.scheduled(QueueClass::MatchDetail, url).await?;
        self.match_cache
            .put(match_id, detail.clone(), self.match_cache.default_ttl())
            .await;
        Ok(detail)
    }

    #[instrument(skip(self))]
    pub async fn match_timeline(
        &self,
        cluster: Cluster,
        match_id: &str,
    ) -> Result<MatchTimeline, AppError> {
        let url = match_timeline_url(self.client.hosts(), cluster, match_id)?;
        self.scheduled(QueueClass::MatchTimeline, url).await
    }

    /// The player's current game, or `None` when they are not in one.
    #[instrument(skip(self))]
    pub async fn active_game(
        &self,
        platform: Platform,
        puuid: &str,
    ) -> Result<Option<ActiveGame>, AppError> {
        let url = active_game_url(self.client.hosts(), platform, puuid)?;
        match self.scheduled::<ActiveGame>(QueueClass::General, url).await {
            Ok(game) => Ok(Some(game)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn match_cache_ttl(&self) -> Duration {
        self.match_cache.default_ttl()
    }
}

fn absent_as_default<T: Default>(result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Err(e) if e.is_not_found() => Ok(T::default()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::scheduler::SchedulerConfig;
    use crate::testing_utils::TestDataBuilder;
    use crate::upstream::credential::ApiKey;
    use crate::upstream::http_client::create_test_http_client;
    use crate::upstream::urls::HostResolver;
    use std::sync::Arc;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn api_for(server: &MockServer, clock: Arc<ManualClock>) -> GameApi {
        let client = UpstreamClient::with_http(
            create_test_http_client(),
            ApiKey::new("RGAPI-endpoint-tests"),
            HostResolver::new(format!("{}/{{host}}", server.uri())),
        );
        GameApi::new(
            client,
            Scheduler::new(&SchedulerConfig::unthrottled()),
            MatchCache::new(16, Duration::from_secs(300), clock),
        )
    }

    #[tokio::test]
    async fn test_match_detail_is_cached_until_ttl() {
        let server = MockServer::start().await;
        let detail = TestDataBuilder::match_detail("LA1_1", 1_000)
            .with_participant(TestDataBuilder::participant("p1", 103, true))
            .build();
        Mock::given(method("GET"))
            .and(path("/americas/lol/match/v5/matches/LA1_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&detail))
            .expect(2)
            .mount(&server)
            .await;

        let clock = Arc::new(ManualClock::new());
        let api = api_for(&server, clock.clone());

        let first = api.match_by_id(Cluster::Americas, "LA1_1").await.unwrap();
        let second = api.match_by_id(Cluster::Americas, "LA1_1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(api.match_cache().stats().await.hits, 1);

        clock.advance(Duration::from_secs(301));
        api.match_by_id(Cluster::Americas, "LA1_1").await.unwrap();
    }

    #[tokio::test]
    async fn test_timeouts_are_retried_until_the_budget_is_spent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/la1/lol/summoner/v4/summoners/by-puuid/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestDataBuilder::summoner("s1", "slow", "Slow"))
                    .set_delay(Duration::from_secs(3)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = UpstreamClient::with_http(
            crate::upstream::create_http_client_with_timeout(1).unwrap(),
            ApiKey::new("RGAPI-endpoint-tests"),
            HostResolver::new(format!("{}/{{host}}", server.uri())),
        );
        let mut config = SchedulerConfig::unthrottled();
        config.max_retries = 1;
        let api = GameApi::new(
            client,
            Scheduler::new(&config),
            MatchCache::new(4, Duration::from_secs(300), Arc::new(ManualClock::new())),
        );

        let err = api.summoner_by_puuid(Platform::La1, "slow").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Timeout);

        let stats = api.scheduler().stats(QueueClass::General);
        assert_eq!(stats.retries, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completed, 0);
    }

    #[tokio::test]
    async fn test_absent_collections_are_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(ManualClock::new()));
        assert!(api.masteries(Platform::Na1, "p").await.unwrap().is_empty());
        assert!(api.league_entries(Platform::Na1, "s").await.unwrap().is_empty());
        assert!(
            api.match_ids(Cluster::Americas, "p", 0, 5, None)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(api.active_game(Platform::Na1, "p").await.unwrap().is_none());

        let err = api.summoner_by_puuid(Platform::Na1, "p").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_match_ids_pass_queue_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/europe/lol/match/v5/matches/by-puuid/p1/ids"))
            .and(query_param("queue", "420"))
            .and(query_param("count", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(["EUW1_1", "EUW1_2"]))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server, Arc::new(ManualClock::new()));
        let ids = api
            .match_ids(Cluster::Europe, "p1", 0, 5, Some(420))
            .await
            .unwrap();
        assert_eq!(ids, vec!["EUW1_1", "EUW1_2"]);
    }
}
