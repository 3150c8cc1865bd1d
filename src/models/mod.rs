//! Wire models for the upstream API. Field names follow the upstream camelCase JSON.

pub mod account;
pub mod league;
pub mod live;
pub mod matches;
pub mod timeline;

pub use account::{Account, Summoner};
pub use league::{LeagueEntry, MasteryEntry};
pub use live::{ActiveGame, LiveParticipant, LivePerks};
pub use matches::{MatchDetail, MatchInfo, MatchMetadata, Participant};
pub use timeline::{MatchTimeline, ParticipantFrame, TimelineEvent, TimelineFrame, TimelineInfo};
