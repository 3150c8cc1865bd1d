//! Live game snapshot

use serde::Serialize;
use tracing::{debug, instrument};

use super::{Aggregator, Outcome, PlayerQuery};
use crate::error::AppError;
use crate::models::{ActiveGame, LiveParticipant};
use crate::resolver::Located;
use crate::upstream::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePlayer {
    pub display_name: Option<String>,
    pub champion_id: u32,
    pub team_id: u32,
    pub spell_ids: Vec<u32>,
    pub perk_ids: Vec<u32>,
}

impl From<LiveParticipant> for LivePlayer {
    fn from(p: LiveParticipant) -> Self {
        Self {
            display_name: p
                .riot_id
                .filter(|id| !id.is_empty())
                .or(p.summoner_name.filter(|name| !name.is_empty())),
            champion_id: p.champion_id,
            team_id: p.team_id,
            spell_ids: [p.spell1_id, p.spell2_id].into_iter().flatten().collect(),
            perk_ids: p.perks.map(|perks| perks.perk_ids).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameSnapshot {
    pub platform: Platform,
    pub game_id: Option<i64>,
    pub game_mode: Option<String>,
    pub game_start_time: Option<i64>,
    pub queue_id: Option<u32>,
    pub participants: Vec<LivePlayer>,
}

impl LiveGameSnapshot {
    fn from_game(platform: Platform, game: ActiveGame) -> Self {
        Self {
            platform,
            game_id: game.game_id,
            game_mode: game.game_mode,
            game_start_time: game.game_start_time,
            queue_id: game.game_queue_config_id,
            participants: game.participants.into_iter().map(LivePlayer::from).collect(),
        }
    }
}

/// Being out of a game is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LiveGameView {
    InGame(LiveGameSnapshot),
    NotInGame { platform: Platform },
}

impl Aggregator<'_> {
    #[instrument(skip(self))]
    pub async fn live_game(&self, query: &PlayerQuery) -> Result<Outcome<LiveGameView>, AppError> {
        let identity = self.resolve(query).await?;
        let Located { outcome, .. } = self.locate_identity(&identity, query.platform).await?;
        let location = match outcome {
            Outcome::Found(location) => location,
            Outcome::NotLocated(missing) => return Ok(Outcome::NotLocated(missing)),
        };

        let platform = location.shard;
        let view = match self.api().active_game(platform, &identity.global_id).await? {
            Some(game) => LiveGameView::InGame(LiveGameSnapshot::from_game(platform, game)),
            None => {
                debug!("Player is not in a game on {}", platform);
                LiveGameView::NotInGame { platform }
            }
        };
        Ok(Outcome::Found(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LivePerks;

    #[test]
    fn test_display_name_prefers_riot_id() {
        let participant = LiveParticipant {
            puuid: Some("p".into()),
            riot_id: Some("Kister#NGC".into()),
            summoner_name: Some("Kister".into()),
            champion_id: 103,
            team_id: 100,
            spell1_id: Some(4),
            spell2_id: Some(14),
            perks: Some(LivePerks {
                perk_ids: vec![8112, 8139],
                perk_style: Some(8100),
                perk_sub_style: Some(8300),
            }),
        };
        let player = LivePlayer::from(participant.clone());
        assert_eq!(player.display_name.as_deref(), Some("Kister#NGC"));
        assert_eq!(player.spell_ids, vec![4, 14]);
        assert_eq!(player.perk_ids, vec![8112, 8139]);

        let player = LivePlayer::from(LiveParticipant {
            riot_id: None,
            ..participant
        });
        assert_eq!(player.display_name.as_deref(), Some("Kister"));
    }

    #[test]
    fn test_not_in_game_serializes_with_status() {
        let json = serde_json::to_value(LiveGameView::NotInGame {
            platform: Platform::Kr,
        })
        .unwrap();
        assert_eq!(json["status"], "not_in_game");
        assert_eq!(json["platform"], "kr");
    }
}
