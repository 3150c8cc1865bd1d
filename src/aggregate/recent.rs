//! Recently and frequently played champions

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::stats::win_rate_one_decimal;
use super::{Aggregator, PlayerQuery, Report, dedup_ids};
use crate::constants::limits;
use crate::error::AppError;
use crate::models::MatchDetail;
use crate::upstream::Cluster;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionUsage {
    pub champion_id: u32,
    pub champion_name: String,
    pub games: u32,
    pub wins: u32,
    /// One decimal
    pub win_rate: f64,
    /// Epoch milliseconds of the latest game on this champion
    pub last_played: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentChampions {
    pub global_id: String,
    pub region_cluster: Cluster,
    pub matches: usize,
    pub recent: Vec<ChampionUsage>,
    pub frequent: Vec<ChampionUsage>,
}

/// Match ids requested per queue filter: the total budget split evenly, at least one.
pub fn per_queue_share(count: usize, queues: usize) -> usize {
    if queues == 0 {
        return count;
    }
    (count / queues).max(1)
}

/// Groups a player's games by champion. Returns (most recent first, most played first).
pub fn group_by_champion(
    puuid: &str,
    matches: &[MatchDetail],
) -> (Vec<ChampionUsage>, Vec<ChampionUsage>) {
    let mut grouped: BTreeMap<u32, ChampionUsage> = BTreeMap::new();
    for detail in matches {
        let Some(me) = detail.info.participant(puuid) else {
            continue;
        };
        let usage = grouped
            .entry(me.champion_id)
            .or_insert_with(|| ChampionUsage {
                champion_id: me.champion_id,
                champion_name: me
                    .champion_name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("#{}", me.champion_id)),
                games: 0,
                wins: 0,
                win_rate: 0.0,
                last_played: 0,
            });
        usage.games += 1;
        usage.wins += u32::from(me.win);
        usage.last_played = usage.last_played.max(detail.info.played_at());
    }

    let grouped: Vec<ChampionUsage> = grouped
        .into_values()
        .map(|mut usage| {
            usage.win_rate = win_rate_one_decimal(usage.wins, usage.games);
            usage
        })
        .collect();

    let mut recent = grouped.clone();
    recent.sort_by(|a, b| b.last_played.cmp(&a.last_played));
    let mut frequent = grouped;
    frequent.sort_by(|a, b| b.games.cmp(&a.games));
    (recent, frequent)
}

impl Aggregator<'_> {
    /// Match ids for the player, optionally split across queue filters.
    pub async fn recent_match_ids(
        &self,
        cluster: Cluster,
        puuid: &str,
        count: usize,
        queues: &[u32],
    ) -> Result<Vec<String>, AppError> {
        if queues.is_empty() {
            return self.api().match_ids(cluster, puuid, 0, count, None).await;
        }
        let share = per_queue_share(count, queues.len());
        let mut ids = Vec::new();
        for &queue in queues {
            let part = self
                .api()
                .match_ids(cluster, puuid, 0, share, Some(queue))
                .await?;
            debug!("Queue {} contributed {} match ids", queue, part.len());
            ids.extend(part);
        }
        Ok(dedup_ids(ids, count))
    }

    #[instrument(skip(self))]
    pub async fn recent_champions(
        &self,
        query: &PlayerQuery,
        count: usize,
        queues: &[u32],
    ) -> Result<Report<RecentChampions>, AppError> {
        let count = count.clamp(1, limits::RECENT_MAX_MATCHES);
        let cluster = self.cluster_for(query);
        let global_id = self.global_id(query).await?;

        let ids = self
            .recent_match_ids(cluster, &global_id, count, queues)
            .await?;
        let mut warnings = Vec::new();
        let matches = self
            .fetch_match_details(cluster, &ids, &mut warnings)
            .await?;
        let (recent, frequent) = group_by_champion(&global_id, &matches);

        Ok(Report::with_warnings(
            RecentChampions {
                global_id,
                region_cluster: cluster,
                matches: matches.len(),
                recent,
                frequent,
            },
            warnings,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;

    fn played(id: &str, champion: u32, win: bool, ended_at: i64) -> MatchDetail {
        TestDataBuilder::match_detail(id, ended_at - 2_000)
            .ended_at(ended_at)
            .with_participant(TestDataBuilder::participant("me", champion, win))
            .build()
    }

    #[test]
    fn test_share_is_split_evenly_with_floor_of_one() {
        assert_eq!(per_queue_share(10, 2), 5);
        assert_eq!(per_queue_share(10, 3), 3);
        assert_eq!(per_queue_share(2, 5), 1);
        assert_eq!(per_queue_share(7, 0), 7);
    }

    #[test]
    fn test_win_rate_uses_one_decimal() {
        let mut matches: Vec<MatchDetail> = (0..3)
            .map(|i| played(&format!("W{i}"), 99, true, 10 + i))
            .collect();
        matches.extend((0..4).map(|i| played(&format!("L{i}"), 99, false, 20 + i)));

        let (recent, _) = group_by_champion("me", &matches);
        assert_eq!(recent[0].games, 7);
        assert_eq!(recent[0].win_rate, 42.9);
        assert_eq!(recent[0].last_played, 23);
    }

    #[test]
    fn test_last_played_falls_back_to_creation() {
        let detail = TestDataBuilder::match_detail("M1", 5_000)
            .with_participant(TestDataBuilder::participant("me", 1, true))
            .build();
        let (recent, _) = group_by_champion("me", &[detail]);
        assert_eq!(recent[0].last_played, 5_000);
        assert_eq!(recent[0].champion_name, "Champion1");
    }
}
