//! One participant's view of a single match

use serde::Serialize;
use tracing::instrument;

use super::Aggregator;
use super::stats::kda;
use crate::error::AppError;
use crate::models::MatchDetail;
use crate::upstream::Cluster;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub match_id: String,
    pub champion_id: u32,
    pub champion_name: Option<String>,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub kda: f64,
    pub cs: u32,
    /// Milliseconds
    pub game_duration: i64,
    pub game_mode: Option<String>,
    pub game_start_timestamp: Option<i64>,
    pub items: Vec<u32>,
    pub summoner_spells: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perks: Option<serde_json::Value>,
    pub role: Option<String>,
    pub lane: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchView {
    Summary(Box<ParticipantSummary>),
    Raw(Box<MatchDetail>),
}

/// Builds the summary for `puuid`, or `None` if they did not play in the match.
pub fn summarize_participant(detail: &MatchDetail, puuid: &str) -> Option<ParticipantSummary> {
    let info = &detail.info;
    let me = info.participant(puuid)?;
    Some(ParticipantSummary {
        match_id: detail.metadata.match_id.clone(),
        champion_id: me.champion_id,
        champion_name: me.champion_name.clone(),
        win: me.win,
        kills: me.kills,
        deaths: me.deaths,
        assists: me.assists,
        kda: kda(me.kills, me.deaths, me.assists),
        cs: me.creep_score(),
        game_duration: info.game_duration * 1000,
        game_mode: info
            .game_mode
            .clone()
            .or_else(|| info.queue_id.map(|q| q.to_string())),
        game_start_timestamp: info.game_start_timestamp,
        items: me.items(),
        summoner_spells: [me.summoner1_id, me.summoner2_id]
            .into_iter()
            .flatten()
            .collect(),
        perks: me.perks.clone(),
        role: me.role.clone(),
        lane: me.lane.clone(),
    })
}

impl Aggregator<'_> {
    /// A single match, summarized for `puuid` when given.
    #[instrument(skip(self))]
    pub async fn match_summary(
        &self,
        cluster: Cluster,
        match_id: &str,
        puuid: Option<&str>,
    ) -> Result<MatchView, AppError> {
        let detail = self.api().match_by_id(cluster, match_id).await?;
        match puuid {
            None => Ok(MatchView::Raw(Box::new(detail))),
            Some(puuid) => summarize_participant(&detail, puuid)
                .map(|summary| MatchView::Summary(Box::new(summary)))
                .ok_or_else(|| {
                    AppError::api_not_found(format!("match {match_id} participant {puuid}"))
                }),
        }
    }
}
