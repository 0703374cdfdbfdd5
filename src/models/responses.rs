use serde::{Deserialize, Serialize};
use crate::core::EffectStatsSnapshot;
use crate::models::domain::{Match, SwipeOutcome};
use crate::services::CacheStats;

/// Response for the record swipe endpoint
///
/// Mirrors the in-process contract `{ success, matched, matchId?, error? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSwipeResponse {
    pub success: bool,
    pub matched: bool,
    #[serde(rename = "matchId", skip_serializing_if = "Option::is_none", default)]
    pub match_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl RecordSwipeResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            matched: false,
            match_id: None,
            error: Some(error.into()),
        }
    }
}

impl From<SwipeOutcome> for RecordSwipeResponse {
    fn from(outcome: SwipeOutcome) -> Self {
        Self {
            success: true,
            matched: outcome.matched,
            match_id: outcome.match_key.map(|k| k.into_string()),
            error: None,
        }
    }
}

/// Response listing a user's matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matches: Vec<Match>,
    pub count: usize,
}

/// Denormalized per-user lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "swipedTargets")]
    pub swiped_targets: Vec<String>,
    #[serde(rename = "matchedPeers")]
    pub matched_peers: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub effects: EffectStatsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::MatchKey;

    #[test]
    fn test_unmatched_response_omits_optional_fields() {
        let response = RecordSwipeResponse::from(SwipeOutcome::unmatched());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "matched": false}));
    }

    #[test]
    fn test_matched_response_carries_match_id() {
        let outcome = SwipeOutcome::matched(MatchKey::from_raw("u1_u2"));
        let json = serde_json::to_value(RecordSwipeResponse::from(outcome)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "matched": true, "matchId": "u1_u2"})
        );
    }
}
