use thiserror::Error;

use crate::models::MatchKey;
use crate::services::StorageError;

/// Structural problems with a proposed swipe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("swiper id is missing")]
    MissingSwiper,

    #[error("target id is missing")]
    MissingTarget,

    #[error("user id '{0}' contains the reserved '_' separator")]
    ReservedSeparator(String),

    #[error("users cannot swipe on themselves")]
    SelfSwipe,

    #[error("invalid swipe kind '{0}', expected 'like' or 'dislike'")]
    InvalidKind(String),
}

/// Errors returned by [`crate::core::SwipeMatchEngine`]
#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("invalid swipe: {0}")]
    Invalid(#[from] ValidationError),

    /// The ordered pair already has a swipe. Nothing was written.
    #[error("{swiper} has already swiped on {target}")]
    Duplicate { swiper: String, target: String },

    /// The swipe could not be recorded or looked up.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The swipe is recorded but the match write failed. Retry through
    /// `reconcile_pair`.
    #[error("swipe recorded but match {match_key} could not be created: {source}")]
    MatchCreation {
        match_key: MatchKey,
        #[source]
        source: StorageError,
    },

    /// The derived key is already held by a match between other users.
    #[error("match {match_key} belongs to {existing_low} / {existing_high}")]
    KeyCollision {
        match_key: MatchKey,
        existing_low: String,
        existing_high: String,
    },
}

impl SwipeError {
    /// Whether repeating the call can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, SwipeError::Storage(_) | SwipeError::MatchCreation { .. })
    }
}
