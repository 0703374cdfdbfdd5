// Unit tests for Lume Swipe

use lume_swipe::core::{canonical_pair, derive_key, validate, ValidationError};
use lume_swipe::models::{RecordSwipeResponse, SwipeKind, SwipeOutcome};

#[test]
fn test_derive_key_symmetric_over_many_pairs() {
    let ids: Vec<String> = (0..40).map(|i| format!("user-{:x}", i * 7919)).collect();

    for a in &ids {
        for b in &ids {
            if a == b {
                continue;
            }
            let key = derive_key(a, b);
            assert_eq!(key, derive_key(b, a));

            let (low, high) = canonical_pair(a, b);
            assert!(low < high);
            assert_eq!(key.as_str(), format!("{}_{}", low, high));
        }
    }
}

#[test]
fn test_derive_key_uses_byte_order() {
    // Uppercase sorts before lowercase in byte order
    assert_eq!(derive_key("bob", "Alice").as_str(), "Alice_bob");
    assert_eq!(derive_key("10", "9").as_str(), "10_9");
}

#[test]
fn test_validate_missing_ids() {
    assert_eq!(validate("", "u2", "like"), Err(ValidationError::MissingSwiper));
    assert_eq!(validate("   ", "u2", "like"), Err(ValidationError::MissingSwiper));
    assert_eq!(validate("u1", "", "like"), Err(ValidationError::MissingTarget));
}

#[test]
fn test_validate_self_swipe() {
    assert_eq!(validate("u1", "u1", "like"), Err(ValidationError::SelfSwipe));
    assert_eq!(validate("u1", "u1", "dislike"), Err(ValidationError::SelfSwipe));
    // Ids are compared exactly
    assert_eq!(validate("u1", "U1", "like"), Ok(SwipeKind::Like));
}

#[test]
fn test_validate_rejects_key_separator() {
    assert_eq!(
        validate("a_b", "c", "like"),
        Err(ValidationError::ReservedSeparator("a_b".to_string()))
    );
    assert_eq!(
        validate("a", "b_c", "like"),
        Err(ValidationError::ReservedSeparator("b_c".to_string()))
    );
}

#[test]
fn test_validate_kind() {
    assert_eq!(validate("u1", "u2", "Dislike"), Ok(SwipeKind::Dislike));
    assert_eq!(
        validate("u1", "u2", "superlike"),
        Err(ValidationError::InvalidKind("superlike".to_string()))
    );
    assert!(validate("u1", "u2", "").is_err());
}

#[test]
fn test_swipe_kind_parsing() {
    assert_eq!("like".parse::<SwipeKind>().unwrap(), SwipeKind::Like);
    assert_eq!("DISLIKE".parse::<SwipeKind>().unwrap(), SwipeKind::Dislike);
    assert!("maybe".parse::<SwipeKind>().is_err());
    assert!(SwipeKind::Like.is_like());
    assert!(!SwipeKind::Dislike.is_like());
}

#[test]
fn test_record_swipe_response_shape() {
    let matched = RecordSwipeResponse::from(SwipeOutcome::matched(derive_key("u2", "u1")));
    let json = serde_json::to_value(&matched).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"success": true, "matched": true, "matchId": "u1_u2"})
    );

    let plain = serde_json::to_value(RecordSwipeResponse::from(SwipeOutcome::unmatched())).unwrap();
    assert_eq!(plain, serde_json::json!({"success": true, "matched": false}));

    let failed = serde_json::to_value(RecordSwipeResponse::failure("duplicate swipe")).unwrap();
    assert_eq!(failed["success"], false);
    assert_eq!(failed["error"], "duplicate swipe");
}
