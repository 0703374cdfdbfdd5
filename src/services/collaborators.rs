//! Ports to collaborators that live outside the swipe/match core.
//!
//! Every call made through these traits is best-effort: the side-effect
//! worker logs failures and moves on.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification request failed: {0}")]
    Request(String),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile lookup failed: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Projection update failed: {0}")]
    Unavailable(String),
}

/// Requests a "you matched" signal for a user
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify_match(
        &self,
        recipient_user_id: &str,
        other_user_display_name: &str,
    ) -> Result<(), NotificationError>;
}

/// Resolves user ids to human-readable names
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn display_name(&self, user_id: &str) -> Result<String, ProfileError>;
}

/// Legacy per-user lists kept for read-side convenience
///
/// Writes are add-if-absent so both sides of a match can update
/// concurrently without losing entries.
#[async_trait]
pub trait UserListProjection: Send + Sync {
    async fn add_swiped_target(&self, user_id: &str, target_id: &str) -> Result<(), ProjectionError>;

    async fn add_matched_peer(&self, user_id: &str, peer_id: &str) -> Result<(), ProjectionError>;

    async fn swiped_targets(&self, user_id: &str) -> Result<Vec<String>, ProjectionError>;

    async fn matched_peers(&self, user_id: &str) -> Result<Vec<String>, ProjectionError>;
}
