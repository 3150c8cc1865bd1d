use serde::{Deserialize, Serialize};

/// A finished match. Immutable once published, which makes it cache-eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(default)]
    pub game_creation: i64,
    /// Seconds
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: Option<i64>,
    #[serde(default)]
    pub game_end_timestamp: Option<i64>,
    #[serde(default)]
    pub game_mode: Option<String>,
    #[serde(default)]
    pub queue_id: Option<u32>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub puuid: String,
    pub champion_id: u32,
    #[serde(default)]
    pub champion_name: Option<String>,
    #[serde(default)]
    pub team_id: u32,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub team_position: Option<String>,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub item0: Option<u32>,
    #[serde(default)]
    pub item1: Option<u32>,
    #[serde(default)]
    pub item2: Option<u32>,
    #[serde(default)]
    pub item3: Option<u32>,
    #[serde(default)]
    pub item4: Option<u32>,
    #[serde(default)]
    pub item5: Option<u32>,
    #[serde(default)]
    pub item6: Option<u32>,
    #[serde(default)]
    pub summoner1_id: Option<u32>,
    #[serde(default)]
    pub summoner2_id: Option<u32>,
    #[serde(default)]
    pub perks: Option<serde_json::Value>,
}

impl MatchInfo {
    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }

    /// When the match was last played: end timestamp, else creation timestamp.
    pub fn played_at(&self) -> i64 {
        self.game_end_timestamp.unwrap_or(self.game_creation)
    }
}

impl Participant {
    /// Lane and jungle creeps combined
    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    /// Assigned position, falling back to the detected lane.
    pub fn position(&self) -> Option<&str> {
        self.team_position
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.lane.as_deref().filter(|l| !l.is_empty()))
    }

    pub fn items(&self) -> Vec<u32> {
        [
            self.item0, self.item1, self.item2, self.item3, self.item4, self.item5, self.item6,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
