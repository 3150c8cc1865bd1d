use serde::{Deserialize, Serialize};

/// Champion mastery record. Mutable upstream, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryEntry {
    pub champion_id: u32,
    #[serde(default)]
    pub champion_level: u32,
    #[serde(default)]
    pub champion_points: u64,
    #[serde(default)]
    pub last_play_time: i64,
}

/// Ranked standing in one queue. Mutable upstream, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    pub queue_type: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub league_points: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}
