//! Platform shards, regional clusters and alias normalization

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A platform shard hosting game-specific player data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    La1,
    La2,
    Na1,
    Br1,
    Oc1,
    Euw1,
    Eun1,
    Tr1,
    Ru,
    Jp1,
    Kr,
    Ph2,
    Sg2,
    Th2,
    Tw2,
    Vn2,
}

/// Coarse cluster serving account lookups and match-v5 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Americas,
    Europe,
    Asia,
}

impl Platform {
    pub const ALL: [Platform; 16] = [
        Platform::La1,
        Platform::La2,
        Platform::Na1,
        Platform::Br1,
        Platform::Oc1,
        Platform::Euw1,
        Platform::Eun1,
        Platform::Tr1,
        Platform::Ru,
        Platform::Jp1,
        Platform::Kr,
        Platform::Ph2,
        Platform::Sg2,
        Platform::Th2,
        Platform::Tw2,
        Platform::Vn2,
    ];

    /// Default probe order: the Americas first, then common EU and Asia shards.
    pub const DEFAULT_PROBE_ORDER: [Platform; 11] = [
        Platform::La1,
        Platform::La2,
        Platform::Na1,
        Platform::Br1,
        Platform::Oc1,
        Platform::Euw1,
        Platform::Eun1,
        Platform::Tr1,
        Platform::Ru,
        Platform::Jp1,
        Platform::Kr,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Platform::La1 => "la1",
            Platform::La2 => "la2",
            Platform::Na1 => "na1",
            Platform::Br1 => "br1",
            Platform::Oc1 => "oc1",
            Platform::Euw1 => "euw1",
            Platform::Eun1 => "eun1",
            Platform::Tr1 => "tr1",
            Platform::Ru => "ru",
            Platform::Jp1 => "jp1",
            Platform::Kr => "kr",
            Platform::Ph2 => "ph2",
            Platform::Sg2 => "sg2",
            Platform::Th2 => "th2",
            Platform::Tw2 => "tw2",
            Platform::Vn2 => "vn2",
        }
    }

    pub fn cluster(&self) -> Cluster {
        match self {
            Platform::La1 | Platform::La2 | Platform::Na1 | Platform::Br1 | Platform::Oc1 => {
                Cluster::Americas
            }
            Platform::Euw1 | Platform::Eun1 | Platform::Tr1 | Platform::Ru => Cluster::Europe,
            Platform::Jp1
            | Platform::Kr
            | Platform::Ph2
            | Platform::Sg2
            | Platform::Th2
            | Platform::Tw2
            | Platform::Vn2 => Cluster::Asia,
        }
    }

    /// Accepts canonical codes and the human aliases players type (`lan`, `euw`, `korea`, ...).
    pub fn normalize(raw: &str) -> Option<Platform> {
        let platform = match raw.trim().to_ascii_lowercase().as_str() {
            "la1" | "lan" => Platform::La1,
            "la2" | "las" => Platform::La2,
            "na1" | "na" => Platform::Na1,
            "br1" | "br" => Platform::Br1,
            "oc1" | "oc" | "oce" => Platform::Oc1,
            "euw1" | "euw" => Platform::Euw1,
            "eun1" | "eun" | "eune" => Platform::Eun1,
            "tr1" | "tr" => Platform::Tr1,
            "ru" => Platform::Ru,
            "jp1" | "jp" => Platform::Jp1,
            "kr" | "korea" => Platform::Kr,
            "ph2" | "ph" => Platform::Ph2,
            "sg2" | "sg" => Platform::Sg2,
            "th2" | "th" => Platform::Th2,
            "tw2" | "tw" => Platform::Tw2,
            "vn2" | "vn" => Platform::Vn2,
            _ => return None,
        };
        Some(platform)
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::normalize(s)
            .ok_or_else(|| AppError::validation(format!("unknown platform '{}'", s.trim())))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Cluster {
    pub fn code(&self) -> &'static str {
        match self {
            Cluster::Americas => "americas",
            Cluster::Europe => "europe",
            Cluster::Asia => "asia",
        }
    }

    /// Cluster for an optional platform hint; no hint means the Americas.
    pub fn for_hint(hint: Option<Platform>) -> Cluster {
        hint.map(|p| p.cluster()).unwrap_or(Cluster::Americas)
    }
}

impl FromStr for Cluster {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "americas" => Ok(Cluster::Americas),
            "europe" => Ok(Cluster::Europe),
            "asia" => Ok(Cluster::Asia),
            other => Err(AppError::validation(format!("unknown cluster '{other}'"))),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_normalize_to_platforms() {
        assert_eq!(Platform::normalize("LAN"), Some(Platform::La1));
        assert_eq!(Platform::normalize(" las "), Some(Platform::La2));
        assert_eq!(Platform::normalize("eune"), Some(Platform::Eun1));
        assert_eq!(Platform::normalize("korea"), Some(Platform::Kr));
        assert_eq!(Platform::normalize("oce"), Some(Platform::Oc1));
        assert_eq!(Platform::normalize("atlantis"), None);
    }

    #[test]
    fn test_every_code_round_trips_through_from_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.code().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_unknown_platform_is_validation_error() {
        let err = "zz9".parse::<Platform>().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_platform_to_cluster() {
        assert_eq!(Platform::Br1.cluster(), Cluster::Americas);
        assert_eq!(Platform::Ru.cluster(), Cluster::Europe);
        assert_eq!(Platform::Tw2.cluster(), Cluster::Asia);
        assert_eq!(Cluster::for_hint(None), Cluster::Americas);
        assert_eq!(Cluster::for_hint(Some(Platform::Kr)), Cluster::Asia);
    }

    #[test]
    fn test_serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&Platform::Euw1).unwrap();
        assert_eq!(json, "\"euw1\"");
        let parsed: Cluster = serde_json::from_str("\"europe\"").unwrap();
        assert_eq!(parsed, Cluster::Europe);
    }
}
