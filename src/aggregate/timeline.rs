//! Match timeline reduced to per-side series and filtered event streams
//!
//! Participant ids 1 to 5 are the first side (team 100), 6 to 10 the second
//! (team 200). That convention is fixed upstream and relied on here.

use serde::Serialize;
use tracing::instrument;

use super::Aggregator;
use crate::error::AppError;
use crate::models::{MatchTimeline, ParticipantFrame, TimelineEvent, TimelineFrame};
use crate::upstream::Cluster;

pub const SKILL_LEVEL_UP: &str = "SKILL_LEVEL_UP";
pub const ITEM_PURCHASED: &str = "ITEM_PURCHASED";
pub const ELITE_MONSTER_KILL: &str = "ELITE_MONSTER_KILL";
pub const BUILDING_KILL: &str = "BUILDING_KILL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    pub fn of_participant(participant_id: u32) -> Option<Side> {
        match participant_id {
            1..=5 => Some(Side::Blue),
            6..=10 => Some(Side::Red),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePoint {
    pub timestamp: i64,
    pub blue: u32,
    pub red: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevelUp {
    pub timestamp: i64,
    pub participant_id: Option<u32>,
    pub skill_slot: Option<u32>,
    pub level_up_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPurchase {
    pub timestamp: i64,
    pub participant_id: Option<u32>,
    pub item_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveKill {
    pub timestamp: i64,
    pub kind: String,
    pub killer_id: Option<u32>,
    pub team_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tower_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub match_id: String,
    pub frame_interval: Option<i64>,
    pub gold: Vec<SidePoint>,
    pub creep_score: Vec<SidePoint>,
    pub skill_level_ups: Vec<SkillLevelUp>,
    pub item_purchases: Vec<ItemPurchase>,
    pub objectives: Vec<ObjectiveKill>,
}

fn side_totals(frame: &TimelineFrame, value: impl Fn(&ParticipantFrame) -> u32) -> SidePoint {
    let mut point = SidePoint {
        timestamp: frame.timestamp,
        blue: 0,
        red: 0,
    };
    for (key, participant) in &frame.participant_frames {
        let id = participant
            .participant_id
            .or_else(|| key.parse().ok())
            .unwrap_or_default();
        match Side::of_participant(id) {
            Some(Side::Blue) => point.blue += value(participant),
            Some(Side::Red) => point.red += value(participant),
            None => {}
        }
    }
    point
}

fn events_of<'t>(
    timeline: &'t MatchTimeline,
    kinds: &'t [&'t str],
) -> impl Iterator<Item = &'t TimelineEvent> + 't {
    timeline
        .info
        .frames
        .iter()
        .flat_map(|frame| frame.events.iter())
        .filter(move |event| kinds.contains(&event.kind.as_str()))
}

pub fn reduce_timeline(match_id: &str, timeline: &MatchTimeline) -> TimelineView {
    let frames = &timeline.info.frames;
    let gold = frames
        .iter()
        .map(|frame| side_totals(frame, |p| p.total_gold))
        .collect();
    let creep_score = frames
        .iter()
        .map(|frame| side_totals(frame, |p| p.minions_killed + p.jungle_minions_killed))
        .collect();

    let skill_level_ups = events_of(timeline, &[SKILL_LEVEL_UP])
        .map(|e| SkillLevelUp {
            timestamp: e.timestamp,
            participant_id: e.participant_id,
            skill_slot: e.skill_slot,
            level_up_type: e.level_up_type.clone(),
        })
        .collect();
    let item_purchases = events_of(timeline, &[ITEM_PURCHASED])
        .map(|e| ItemPurchase {
            timestamp: e.timestamp,
            participant_id: e.participant_id,
            item_id: e.item_id,
        })
        .collect();
    let objectives = events_of(timeline, &[ELITE_MONSTER_KILL, BUILDING_KILL])
        .map(|e| ObjectiveKill {
            timestamp: e.timestamp,
            kind: e.kind.clone(),
            killer_id: e.killer_id,
            team_id: e.killer_team_id.or(e.team_id),
            monster_type: e.monster_type.clone(),
            monster_sub_type: e.monster_sub_type.clone(),
            building_type: e.building_type.clone(),
            tower_type: e.tower_type.clone(),
            lane_type: e.lane_type.clone(),
        })
        .collect();

    TimelineView {
        match_id: timeline
            .metadata
            .as_ref()
            .map(|m| m.match_id.clone())
            .unwrap_or_else(|| match_id.to_string()),
        frame_interval: timeline.info.frame_interval,
        gold,
        creep_score,
        skill_level_ups,
        item_purchases,
        objectives,
    }
}

impl Aggregator<'_> {
    #[instrument(skip(self))]
    pub async fn timeline(&self, cluster: Cluster, match_id: &str) -> Result<TimelineView, AppError> {
        let timeline = self.api().match_timeline(cluster, match_id).await?;
        Ok(reduce_timeline(match_id, &timeline))
    }
}
