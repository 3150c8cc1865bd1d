//! Per-champion performance over the last matches

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

use super::stats::{kda, round_to, win_rate_whole};
use super::{Aggregator, PlayerQuery, Report};
use crate::error::AppError;
use crate::models::MatchDetail;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStatsRow {
    pub champion_id: u32,
    pub champion_name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    /// Nearest whole percent
    pub win_rate: u32,
    pub kda: f64,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionStats {
    pub global_id: String,
    pub matches: usize,
    pub champions: Vec<ChampionStatsRow>,
}

#[derive(Default)]
struct Totals {
    name: String,
    games: u32,
    wins: u32,
    kills: u32,
    deaths: u32,
    assists: u32,
}

/// Aggregates the player's games per champion, most played first.
///
/// `queues` keeps only matches from those queue ids; empty keeps everything.
pub fn champion_rows(puuid: &str, matches: &[MatchDetail], queues: &[u32]) -> Vec<ChampionStatsRow> {
    let mut totals: BTreeMap<u32, Totals> = BTreeMap::new();
    for detail in matches {
        if !queues.is_empty() && !detail.info.queue_id.is_some_and(|q| queues.contains(&q)) {
            continue;
        }
        let Some(me) = detail.info.participant(puuid) else {
            continue;
        };
        let entry = totals.entry(me.champion_id).or_default();
        if entry.name.is_empty() {
            entry.name = me
                .champion_name
                .clone()
                .unwrap_or_else(|| me.champion_id.to_string());
        }
        entry.games += 1;
        entry.wins += u32::from(me.win);
        entry.kills += me.kills;
        entry.deaths += me.deaths;
        entry.assists += me.assists;
    }

    let mut rows: Vec<ChampionStatsRow> = totals
        .into_iter()
        .map(|(champion_id, t)| {
            let games = f64::from(t.games);
            ChampionStatsRow {
                champion_id,
                champion_name: t.name,
                games: t.games,
                wins: t.wins,
                losses: t.games - t.wins,
                win_rate: win_rate_whole(t.wins, t.games),
                kda: round_to(kda(t.kills, t.deaths, t.assists), 2),
                avg_kills: round_to(f64::from(t.kills) / games, 1),
                avg_deaths: round_to(f64::from(t.deaths) / games, 1),
                avg_assists: round_to(f64::from(t.assists) / games, 1),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.games.cmp(&a.games));
    rows
}

impl Aggregator<'_> {
    #[instrument(skip(self))]
    pub async fn champion_stats(
        &self,
        query: &PlayerQuery,
        count: usize,
        queues: &[u32],
    ) -> Result<Report<ChampionStats>, AppError> {
        let count = count.max(1);
        let cluster = self.cluster_for(query);
        let global_id = self.global_id(query).await?;

        let ids = self
            .api()
            .match_ids(cluster, &global_id, 0, count, None)
            .await?;
        let mut warnings = Vec::new();
        let matches = self
            .fetch_match_details(cluster, &ids, &mut warnings)
            .await?;
        let champions = champion_rows(&global_id, &matches, queues);

        Ok(Report::with_warnings(
            ChampionStats {
                global_id,
                matches: matches.len(),
                champions,
            },
            warnings,
        ))
    }
}
