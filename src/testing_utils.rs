//! Builders for upstream fixtures used by unit and integration tests

use std::collections::HashMap;

use crate::models::{
    Account, MatchDetail, MatchInfo, MatchMetadata, MatchTimeline, Participant, ParticipantFrame,
    Summoner, TimelineEvent, TimelineFrame, TimelineInfo,
};

/// Test utilities for creating mock upstream data
pub struct TestDataBuilder;

impl TestDataBuilder {
    pub fn account(puuid: &str, game_name: &str, tag_line: &str) -> Account {
        Account {
            puuid: puuid.to_string(),
            game_name: Some(game_name.to_string()),
            tag_line: Some(tag_line.to_string()),
        }
    }

    /// A summoner that counts as an authoritative probe hit
    pub fn summoner(id: &str, puuid: &str, name: &str) -> Summoner {
        Summoner {
            id: Some(id.to_string()),
            puuid: Some(puuid.to_string()),
            name: Some(name.to_string()),
            summoner_level: 30,
            profile_icon_id: Some(29),
        }
    }

    pub fn match_detail(match_id: &str, game_creation: i64) -> MatchBuilder {
        MatchBuilder {
            detail: MatchDetail {
                metadata: MatchMetadata {
                    match_id: match_id.to_string(),
                    participants: Vec::new(),
                },
                info: MatchInfo {
                    game_creation,
                    game_duration: 1_800,
                    game_start_timestamp: Some(game_creation),
                    game_end_timestamp: None,
                    game_mode: None,
                    queue_id: None,
                    participants: Vec::new(),
                },
            },
        }
    }

    /// Blue-side participant with a 0/0/0 scoreline
    pub fn participant(puuid: &str, champion_id: u32, win: bool) -> ParticipantBuilder {
        ParticipantBuilder {
            participant: Participant {
                puuid: puuid.to_string(),
                champion_id,
                champion_name: Some(format!("Champion{champion_id}")),
                team_id: 100,
                win,
                kills: 0,
                deaths: 0,
                assists: 0,
                total_minions_killed: 0,
                neutral_minions_killed: 0,
                team_position: None,
                lane: None,
                role: None,
                item0: None,
                item1: None,
                item2: None,
                item3: None,
                item4: None,
                item5: None,
                item6: None,
                summoner1_id: Some(4),
                summoner2_id: Some(14),
                perks: None,
            },
        }
    }

    pub fn timeline() -> TimelineBuilder {
        TimelineBuilder { frames: Vec::new() }
    }

    pub fn frame(timestamp: i64) -> FrameBuilder {
        FrameBuilder {
            frame: TimelineFrame {
                timestamp,
                participant_frames: HashMap::new(),
                events: Vec::new(),
            },
        }
    }

    pub fn event(kind: &str, timestamp: i64) -> EventBuilder {
        EventBuilder {
            event: TimelineEvent {
                kind: kind.to_string(),
                timestamp,
                participant_id: None,
                skill_slot: None,
                level_up_type: None,
                item_id: None,
                killer_id: None,
                killer_team_id: None,
                team_id: None,
                monster_type: None,
                monster_sub_type: None,
                building_type: None,
                tower_type: None,
                lane_type: None,
            },
        }
    }
}

pub struct MatchBuilder {
    detail: MatchDetail,
}

impl MatchBuilder {
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.detail.info.game_duration = seconds;
        self
    }

    pub fn ended_at(mut self, timestamp: i64) -> Self {
        self.detail.info.game_end_timestamp = Some(timestamp);
        self
    }

    pub fn in_queue(mut self, queue_id: u32) -> Self {
        self.detail.info.queue_id = Some(queue_id);
        self
    }

    pub fn with_mode(mut self, mode: &str) -> Self {
        self.detail.info.game_mode = Some(mode.to_string());
        self
    }

    pub fn with_participant(mut self, participant: impl Into<Participant>) -> Self {
        let participant = participant.into();
        self.detail
            .metadata
            .participants
            .push(participant.puuid.clone());
        self.detail.info.participants.push(participant);
        self
    }

    pub fn build(self) -> MatchDetail {
        self.detail
    }
}

pub struct ParticipantBuilder {
    participant: Participant,
}

impl ParticipantBuilder {
    pub fn with_kda(mut self, kills: u32, deaths: u32, assists: u32) -> Self {
        self.participant.kills = kills;
        self.participant.deaths = deaths;
        self.participant.assists = assists;
        self
    }

    pub fn with_creeps(mut self, lane: u32, neutral: u32) -> Self {
        self.participant.total_minions_killed = lane;
        self.participant.neutral_minions_killed = neutral;
        self
    }

    pub fn with_position(mut self, position: &str) -> Self {
        self.participant.team_position = Some(position.to_string());
        self
    }

    pub fn on_team(mut self, team_id: u32) -> Self {
        self.participant.team_id = team_id;
        self
    }

    /// Fills `item0` onwards in order
    pub fn with_items<const N: usize>(mut self, items: [u32; N]) -> Self {
        let slots = [
            &mut self.participant.item0,
            &mut self.participant.item1,
            &mut self.participant.item2,
            &mut self.participant.item3,
            &mut self.participant.item4,
            &mut self.participant.item5,
            &mut self.participant.item6,
        ];
        for (slot, item) in slots.into_iter().zip(items) {
            *slot = Some(item);
        }
        self
    }

    pub fn build(self) -> Participant {
        self.participant
    }
}

impl From<ParticipantBuilder> for Participant {
    fn from(builder: ParticipantBuilder) -> Self {
        builder.build()
    }
}

pub struct TimelineBuilder {
    frames: Vec<TimelineFrame>,
}

impl TimelineBuilder {
    pub fn with_frame(mut self, frame: FrameBuilder) -> Self {
        self.frames.push(frame.frame);
        self
    }

    pub fn build(self) -> MatchTimeline {
        MatchTimeline {
            metadata: None,
            info: TimelineInfo {
                frame_interval: Some(60_000),
                frames: self.frames,
            },
        }
    }
}

pub struct FrameBuilder {
    frame: TimelineFrame,
}

impl FrameBuilder {
    pub fn with_participant(
        mut self,
        participant_id: u32,
        total_gold: u32,
        minions_killed: u32,
        jungle_minions_killed: u32,
    ) -> Self {
        self.frame.participant_frames.insert(
            participant_id.to_string(),
            ParticipantFrame {
                participant_id: Some(participant_id),
                total_gold,
                minions_killed,
                jungle_minions_killed,
                ..ParticipantFrame::default()
            },
        );
        self
    }

    pub fn with_event(mut self, event: EventBuilder) -> Self {
        self.frame.events.push(event.event);
        self
    }
}

pub struct EventBuilder {
    event: TimelineEvent,
}

impl EventBuilder {
    /// Acting participant: the leveller or buyer, or the killer for kills
    pub fn by(mut self, participant_id: u32) -> Self {
        self.event.participant_id = Some(participant_id);
        self.event.killer_id = Some(participant_id);
        self
    }

    pub fn item(mut self, item_id: u32) -> Self {
        self.event.item_id = Some(item_id);
        self
    }

    pub fn skill(mut self, slot: u32) -> Self {
        self.event.skill_slot = Some(slot);
        self.event.level_up_type = Some("NORMAL".to_string());
        self
    }

    pub fn team(mut self, team_id: u32) -> Self {
        self.event.killer_team_id = Some(team_id);
        self
    }
}
