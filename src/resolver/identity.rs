//! Player identity parsing and global-identity lookup

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::models::Account;
use crate::upstream::{Cluster, GameApi, Platform};

/// Human-facing `Name#Tag` pair. Not unique across regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl FromStr for RiotId {
    type Err = AppError;

    /// Splits on the first `#`; both halves are trimmed and must be non-empty.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AppError::validation(format!(
                "invalid Riot id '{}': use the format 'Name#Tag'",
                raw.trim()
            ))
        };
        let (name, tag) = raw.split_once('#').ok_or_else(invalid)?;
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            game_name: name.to_string(),
            tag_line: tag.to_string(),
        })
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

/// What the caller knows about a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRef {
    RiotId(RiotId),
    GlobalId(String),
}

impl PlayerRef {
    pub fn riot_id(raw: &str) -> Result<Self, AppError> {
        raw.parse().map(PlayerRef::RiotId)
    }

    pub fn global_id(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("global id must not be empty"));
        }
        Ok(PlayerRef::GlobalId(trimmed.to_string()))
    }
}

/// Resolved identity. `global_id` is the only safe join key between resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdentity {
    pub game_name: String,
    pub tag_line: String,
    pub global_id: String,
}

impl PlayerIdentity {
    fn from_account(account: Account) -> Self {
        Self {
            game_name: account.game_name.unwrap_or_default(),
            tag_line: account.tag_line.unwrap_or_default(),
            global_id: account.puuid,
        }
    }
}

/// Which identity cluster to ask. An explicit cluster beats the platform hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityRouting {
    pub cluster: Option<Cluster>,
    pub platform_hint: Option<Platform>,
}

impl IdentityRouting {
    pub fn cluster(&self) -> Cluster {
        self.cluster
            .unwrap_or_else(|| Cluster::for_hint(self.platform_hint))
    }
}

/// Looks the player up in the global identity service.
///
/// Homonyms: if a `Name#Tag` pair exists in several regions, whatever the
/// identity service returns first is taken as authoritative. No disambiguation
/// is attempted.
#[instrument(skip(api))]
pub async fn resolve_identity(
    api: &GameApi,
    player: &PlayerRef,
    routing: IdentityRouting,
) -> Result<PlayerIdentity, AppError> {
    let cluster = routing.cluster();
    let account = match player {
        PlayerRef::RiotId(id) => {
            api.account_by_riot_id(cluster, &id.game_name, &id.tag_line)
                .await?
        }
        PlayerRef::GlobalId(puuid) => api.account_by_puuid(cluster, puuid).await?,
    };
    debug!("Resolved identity via {} cluster", cluster);
    Ok(PlayerIdentity::from_account(account))
}
