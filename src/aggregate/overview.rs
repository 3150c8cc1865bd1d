//! Profile overview: identity, rank, mastery and a summary of recent matches

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::stats::{cs_per_minute, kda, round_to, win_rate_one_decimal, win_rate_whole};
use super::{Aggregator, Outcome, PlayerQuery, Report, optional_section};
use crate::constants::limits;
use crate::error::AppError;
use crate::models::{LeagueEntry, MasteryEntry, MatchDetail, Participant};
use crate::resolver::{Located, PlayerIdentity};
use crate::upstream::Platform;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerCard {
    pub id: Option<String>,
    pub name: Option<String>,
    pub level: u32,
    pub profile_icon_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub queue_type: String,
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub wins: u32,
    pub losses: u32,
}

impl From<LeagueEntry> for RankEntry {
    fn from(entry: LeagueEntry) -> Self {
        Self {
            queue_type: entry.queue_type,
            tier: entry.tier,
            division: entry.rank,
            league_points: entry.league_points,
            wins: entry.wins,
            losses: entry.losses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionRecord {
    pub champion_id: u32,
    pub games: u32,
    /// Whole percent
    pub win_rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSummary {
    pub games: u32,
    pub wins: u32,
    /// One decimal
    pub win_rate: f64,
    pub kda: f64,
    pub cs_per_min: f64,
    pub lanes: BTreeMap<String, u32>,
    pub champions: Vec<ChampionRecord>,
    /// Approximate lane opponents, with the player's win rate against each
    pub vs_opponents: Vec<ChampionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverview {
    pub account: PlayerIdentity,
    pub platform: Platform,
    pub summoner: SummonerCard,
    pub rank: Vec<RankEntry>,
    pub mastery_top: Vec<MasteryEntry>,
    pub match_ids: Vec<String>,
    pub summary: OverviewSummary,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    games: u32,
    wins: u32,
}

impl Tally {
    fn add(&mut self, win: bool) {
        self.games += 1;
        self.wins += u32::from(win);
    }
}

fn ranked_records(tallies: BTreeMap<u32, Tally>) -> Vec<ChampionRecord> {
    let mut records: Vec<ChampionRecord> = tallies
        .into_iter()
        .map(|(champion_id, tally)| ChampionRecord {
            champion_id,
            games: tally.games,
            win_rate: win_rate_whole(tally.wins, tally.games),
        })
        .collect();
    records.sort_by(|a, b| b.games.cmp(&a.games));
    records.truncate(limits::OVERVIEW_CHAMPION_ROWS);
    records
}

/// Same position on the other team, else the first enemy listed.
fn lane_opponent<'m>(match_detail: &'m MatchDetail, me: &Participant) -> Option<&'m Participant> {
    let enemies = || {
        match_detail
            .info
            .participants
            .iter()
            .filter(move |p| p.team_id != me.team_id)
    };
    enemies()
        .find(|p| p.position().is_some() && p.position() == me.position())
        .or_else(|| enemies().next())
}

/// Folds a player's matches into the overview summary.
pub fn summarize(puuid: &str, matches: &[MatchDetail]) -> OverviewSummary {
    let mut summary = OverviewSummary::default();
    let (mut kills, mut deaths, mut assists, mut creep_score) = (0u32, 0u32, 0u32, 0u32);
    let mut minutes = 0.0;
    let mut champions: BTreeMap<u32, Tally> = BTreeMap::new();
    let mut opponents: BTreeMap<u32, Tally> = BTreeMap::new();

    for detail in matches {
        let Some(me) = detail.info.participant(puuid) else {
            continue;
        };
        summary.games += 1;
        summary.wins += u32::from(me.win);
        kills += me.kills;
        deaths += me.deaths;
        assists += me.assists;
        creep_score += me.creep_score();
        minutes += detail.info.game_duration as f64 / 60.0;

        let lane = me.position().unwrap_or("UNKNOWN").to_uppercase();
        *summary.lanes.entry(lane).or_default() += 1;
        champions.entry(me.champion_id).or_default().add(me.win);
        if let Some(opponent) = lane_opponent(detail, me) {
            opponents.entry(opponent.champion_id).or_default().add(me.win);
        }
    }

    summary.win_rate = win_rate_one_decimal(summary.wins, summary.games);
    summary.kda = round_to(kda(kills, deaths, assists), 2);
    summary.cs_per_min = round_to(cs_per_minute(creep_score, minutes), 2);
    summary.champions = ranked_records(champions);
    summary.vs_opponents = ranked_records(opponents);
    summary
}

impl Aggregator<'_> {
    /// Locate, then mastery and rank concurrently, then the last `count` matches.
    #[instrument(skip(self))]
    pub async fn overview(
        &self,
        query: &PlayerQuery,
        count: usize,
    ) -> Result<Outcome<Report<ProfileOverview>>, AppError> {
        let count = count.clamp(1, limits::OVERVIEW_MAX_MATCHES);
        let identity = self.resolve(query).await?;
        let Located { outcome, .. } = self.locate_identity(&identity, query.platform).await?;
        let location = match outcome {
            Outcome::Found(location) => location,
            Outcome::NotLocated(missing) => return Ok(Outcome::NotLocated(missing)),
        };

        let api = self.api();
        let platform = location.shard;
        let puuid = identity.global_id.as_str();
        let mut warnings = Vec::new();

        let summoner_id = location.summoner.internal_id();
        let rank_fetch = async {
            match summoner_id {
                Some(id) => api.league_entries(platform, id).await,
                None => Ok(Vec::new()),
            }
        };
        let (masteries, rank) = tokio::join!(api.masteries(platform, puuid), rank_fetch);
        if summoner_id.is_none() {
            warnings.push("rank unavailable (no summoner id)".to_string());
        }
        let mut mastery_top = optional_section(masteries, "mastery", &mut warnings)?;
        let rank = optional_section(rank, "rank", &mut warnings)?;

        mastery_top.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
        mastery_top.truncate(limits::OVERVIEW_MASTERY_TOP);

        let cluster = platform.cluster();
        let match_ids = api.match_ids(cluster, puuid, 0, count, None).await?;
        let matches = self
            .fetch_match_details(cluster, &match_ids, &mut warnings)
            .await?;
        debug!("Summarizing {} of {} matches", matches.len(), match_ids.len());

        let summary = summarize(puuid, &matches);
        let summoner = SummonerCard {
            id: location.summoner.id.clone(),
            name: location.summoner.name.clone(),
            level: location.summoner.summoner_level,
            profile_icon_id: location.summoner.profile_icon_id,
        };

        Ok(Outcome::Found(Report::with_warnings(
            ProfileOverview {
                account: identity,
                platform,
                summoner,
                rank: rank.into_iter().map(RankEntry::from).collect(),
                mastery_top,
                match_ids,
                summary,
            },
            warnings,
        )))
    }
}
