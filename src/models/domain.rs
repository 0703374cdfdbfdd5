use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Direction of interest carried by a swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "swipe_kind", rename_all = "lowercase")]
pub enum SwipeKind {
    Like,
    Dislike,
}

impl SwipeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeKind::Like => "like",
            SwipeKind::Dislike => "dislike",
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, SwipeKind::Like)
    }
}

impl fmt::Display for SwipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known swipe kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown swipe kind '{0}'")]
pub struct UnknownSwipeKind(pub String);

impl FromStr for SwipeKind {
    type Err = UnknownSwipeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(SwipeKind::Like),
            "dislike" => Ok(SwipeKind::Dislike),
            _ => Err(UnknownSwipeKind(s.to_string())),
        }
    }
}

/// One directed expression of interest, unique per (swiper, target)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swipe {
    #[serde(rename = "swiperId")]
    pub swiper_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub kind: SwipeKind,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Swipe {
    pub fn new(swiper_id: &str, target_id: &str, kind: SwipeKind) -> Self {
        Self {
            swiper_id: swiper_id.to_string(),
            target_id: target_id.to_string(),
            kind,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Canonical identifier of the match between two users
///
/// The key is `"<low>_<high>"` where `low < high` in byte-wise string order,
/// so both members derive the same key no matter who swiped first. User ids
/// must not contain [`MatchKey::SEPARATOR`], otherwise two pairs could share
/// a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchKey(String);

impl MatchKey {
    pub const SEPARATOR: char = '_';

    pub(crate) fn from_ordered(low: &str, high: &str) -> Self {
        Self(format!("{}{}{}", low, Self::SEPARATOR, high))
    }

    /// Wrap a key received from a client, e.g. a path parameter
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MatchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Confirmed mutual like between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "matchId")]
    pub match_key: MatchKey,
    #[serde(rename = "memberLow")]
    pub member_low: String,
    #[serde(rename = "memberHigh")]
    pub member_high: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "lastMessageAt", default)]
    pub last_message_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "lastMessageSummary", default)]
    pub last_message_summary: Option<String>,
}

/// Result of recording a swipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeOutcome {
    pub matched: bool,
    pub match_key: Option<MatchKey>,
}

impl SwipeOutcome {
    pub fn unmatched() -> Self {
        Self {
            matched: false,
            match_key: None,
        }
    }

    pub fn matched(key: MatchKey) -> Self {
        Self {
            matched: true,
            match_key: Some(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_kind_parsing() {
        assert_eq!("like".parse::<SwipeKind>(), Ok(SwipeKind::Like));
        assert_eq!("Dislike".parse::<SwipeKind>(), Ok(SwipeKind::Dislike));
        assert!("superlike".parse::<SwipeKind>().is_err());
        assert!("".parse::<SwipeKind>().is_err());
    }

    #[test]
    fn test_swipe_kind_serde() {
        assert_eq!(serde_json::to_string(&SwipeKind::Like).unwrap(), "\"like\"");
        let kind: SwipeKind = serde_json::from_str("\"dislike\"").unwrap();
        assert_eq!(kind, SwipeKind::Dislike);
    }

    #[test]
    fn test_unknown_kind_message() {
        let err = "superlike".parse::<SwipeKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown swipe kind 'superlike'");
    }
}
