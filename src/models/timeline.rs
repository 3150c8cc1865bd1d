use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minute-by-minute timeline of a finished match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTimeline {
    #[serde(default)]
    pub metadata: Option<super::MatchMetadata>,
    pub info: TimelineInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfo {
    #[serde(default)]
    pub frame_interval: Option<i64>,
    #[serde(default)]
    pub frames: Vec<TimelineFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub timestamp: i64,
    /// Keyed by participant id as a string, "1" through "10"
    #[serde(default)]
    pub participant_frames: HashMap<String, ParticipantFrame>,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantFrame {
    #[serde(default)]
    pub participant_id: Option<u32>,
    #[serde(default)]
    pub total_gold: u32,
    #[serde(default)]
    pub minions_killed: u32,
    #[serde(default)]
    pub jungle_minions_killed: u32,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub participant_id: Option<u32>,
    #[serde(default)]
    pub skill_slot: Option<u32>,
    #[serde(default)]
    pub level_up_type: Option<String>,
    #[serde(default)]
    pub item_id: Option<u32>,
    #[serde(default)]
    pub killer_id: Option<u32>,
    #[serde(default)]
    pub killer_team_id: Option<u32>,
    #[serde(default)]
    pub team_id: Option<u32>,
    #[serde(default)]
    pub monster_type: Option<String>,
    #[serde(default)]
    pub monster_sub_type: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
    #[serde(default)]
    pub tower_type: Option<String>,
    #[serde(default)]
    pub lane_type: Option<String>,
}
