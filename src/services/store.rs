//! Persistence ports for swipes and matches.
//!
//! Both stores are append-mostly. The write operations are compare-and-set
//! primitives of the backing store: two concurrent writers for the same key
//! always end with one persisted record and one `AlreadyExists`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Match, MatchKey, Swipe};

/// Errors raised by the swipe and match stores
///
/// Conflicts are never errors; they are reported through
/// [`InsertOutcome::AlreadyExists`] and [`CreateOutcome::AlreadyExists`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result of [`SwipeStore::insert_if_absent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Result of [`MatchStore::create_if_absent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Storage of directed swipes keyed by (swiper, target)
#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Point lookup on the ordered pair.
    async fn find(&self, swiper_id: &str, target_id: &str) -> Result<Option<Swipe>, StorageError>;

    /// Persist `swipe` unless a record for its ordered pair exists. Never overwrites.
    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<InsertOutcome, StorageError>;
}

/// Storage of matches keyed by canonical match key
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn exists(&self, key: &MatchKey) -> Result<bool, StorageError>;

    /// Persist a match for `key` unless one exists. Never overwrites.
    async fn create_if_absent(
        &self,
        key: &MatchKey,
        member_low: &str,
        member_high: &str,
    ) -> Result<CreateOutcome, StorageError>;

    async fn get(&self, key: &MatchKey) -> Result<Option<Match>, StorageError>;

    /// All matches `user_id` belongs to, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Match>, StorageError>;

    /// Update the last message preview. Older timestamps than the stored one
    /// are ignored. Returns `false` when the match does not exist.
    async fn record_last_message(
        &self,
        key: &MatchKey,
        at: chrono::DateTime<chrono::Utc>,
        summary: &str,
    ) -> Result<bool, StorageError>;
}
