use crate::core::error::ValidationError;
use crate::models::{MatchKey, SwipeKind};

/// Check the structure of a proposed swipe and parse its kind
///
/// Ids that are empty or only whitespace count as missing. Ids containing
/// the match key separator are rejected so every pair keeps a distinct key.
/// The self-swipe check compares ids exactly.
pub fn validate(swiper_id: &str, target_id: &str, kind: &str) -> Result<SwipeKind, ValidationError> {
    if swiper_id.trim().is_empty() {
        return Err(ValidationError::MissingSwiper);
    }

    if target_id.trim().is_empty() {
        return Err(ValidationError::MissingTarget);
    }

    for id in [swiper_id, target_id] {
        if id.contains(MatchKey::SEPARATOR) {
            return Err(ValidationError::ReservedSeparator(id.to_string()));
        }
    }

    if swiper_id == target_id {
        return Err(ValidationError::SelfSwipe);
    }

    kind.parse::<SwipeKind>()
        .map_err(|_| ValidationError::InvalidKind(kind.to_string()))
}

/// Check a pair of ids without a kind, used when re-evaluating a recorded swipe
pub fn validate_pair(swiper_id: &str, target_id: &str) -> Result<(), ValidationError> {
    validate(swiper_id, target_id, SwipeKind::Like.as_str()).map(|_| ())
}
