use serde::{Deserialize, Serialize};

/// Global account record from the regional identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

/// Game-specific profile living on exactly one platform shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub puuid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summoner_level: u32,
    #[serde(default)]
    pub profile_icon_id: Option<u32>,
}

impl Summoner {
    /// Shard-internal id, when the upstream still provides one.
    pub fn internal_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// A probe hit only counts when the profile carries a usable identifier.
    pub fn is_authoritative(&self) -> bool {
        self.internal_id().is_some()
            || self
                .puuid
                .as_deref()
                .is_some_and(|puuid| !puuid.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summoner_deserializes_from_upstream_shape() {
        let json = r#"{"id":"enc-1","puuid":"p1","name":"Kister","summonerLevel":312,"profileIconId":29}"#;
        let summoner: Summoner = serde_json::from_str(json).unwrap();
        assert_eq!(summoner.internal_id(), Some("enc-1"));
        assert_eq!(summoner.summoner_level, 312);
        assert!(summoner.is_authoritative());
    }

    #[test]
    fn test_summoner_without_identifiers_is_not_a_hit() {
        let summoner: Summoner = serde_json::from_str(r#"{"id":"","summonerLevel":1}"#).unwrap();
        assert!(!summoner.is_authoritative());
    }
}
