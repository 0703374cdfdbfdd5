use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record a swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordSwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(alias = "swipeType", rename = "kind")]
    pub kind: String,
}

/// Request to re-run match detection for an already recorded swipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReconcileRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Request to update the last message preview on a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LastMessageRequest {
    #[serde(default)]
    pub at: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(length(max = 280))]
    pub summary: String,
}

/// Query for listing a user's matches
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListMatchesQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_swipe_request_accepts_aliases() {
        let req: RecordSwipeRequest = serde_json::from_str(
            r#"{"user_id":"u1","target_user_id":"u2","swipeType":"like"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, "u1");
        assert_eq!(req.target_user_id, "u2");
        assert_eq!(req.kind, "like");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_record_swipe_request_rejects_empty_ids() {
        let req = RecordSwipeRequest {
            user_id: String::new(),
            target_user_id: "u2".to_string(),
            kind: "like".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
