//! The upstream access token, redacted everywhere except the request header

use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::constants::CREDENTIAL_FRAGMENT_LEN;

/// Opaque credential. `Debug` and `Display` only ever show the trailing fragment.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Last characters of the key, safe to log for identifying which key is loaded.
    ///
    /// Empty for keys shorter than twice the fragment length, where the tail
    /// would give away too much of the key.
    pub fn fragment(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < CREDENTIAL_FRAGMENT_LEN * 2 {
            return String::new();
        }
        chars[chars.len() - CREDENTIAL_FRAGMENT_LEN..].iter().collect()
    }

    /// Raw value for the request header. Not to be used anywhere else.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(…{})", self.fragment())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "…{}", self.fragment())
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ApiKey::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fragment_is_printed() {
        let key = ApiKey::new("RGAPI-0000-1111-2222-abcdef123456");
        assert_eq!(key.fragment(), "123456");
        assert_eq!(format!("{key}"), "…123456");
        assert_eq!(format!("{key:?}"), "ApiKey(…123456)");
        assert!(!format!("{key:?}").contains("RGAPI"));
    }

    #[test]
    fn test_short_keys_are_fully_masked() {
        for raw in ["abc", "abcdef", "abcdefghijk"] {
            let key = ApiKey::new(raw);
            assert_eq!(key.fragment(), "");
            assert_eq!(format!("{key}"), "…");
            assert_eq!(format!("{key:?}"), "ApiKey(…)");
        }
        assert_eq!(ApiKey::new("abcdefghijkl").fragment(), "ghijkl");
    }

    #[test]
    fn test_short_and_blank_keys() {
        assert!(ApiKey::new("   ").is_blank());
        assert_eq!(ApiKey::new("  key  ").expose(), "key");
    }
}
