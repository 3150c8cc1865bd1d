use serde::{Deserialize, Serialize};

/// Spectator view of a game in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGame {
    #[serde(default)]
    pub game_id: Option<i64>,
    #[serde(default)]
    pub game_mode: Option<String>,
    #[serde(default)]
    pub game_start_time: Option<i64>,
    #[serde(default)]
    pub game_queue_config_id: Option<u32>,
    #[serde(default)]
    pub participants: Vec<LiveParticipant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveParticipant {
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub riot_id: Option<String>,
    #[serde(default)]
    pub summoner_name: Option<String>,
    pub champion_id: u32,
    pub team_id: u32,
    #[serde(default)]
    pub spell1_id: Option<u32>,
    #[serde(default)]
    pub spell2_id: Option<u32>,
    #[serde(default)]
    pub perks: Option<LivePerks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePerks {
    #[serde(default)]
    pub perk_ids: Vec<u32>,
    #[serde(default)]
    pub perk_style: Option<u32>,
    #[serde(default)]
    pub perk_sub_style: Option<u32>,
}
