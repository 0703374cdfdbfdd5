//! In-process store implementations.
//!
//! Each store guards its map with a single mutex and performs the
//! check-and-insert inside one critical section, which gives the same
//! compare-and-set guarantee as the Postgres `ON CONFLICT` statements.
//! No lock is held across an `.await`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{Match, MatchKey, Swipe};
use crate::services::collaborators::{ProjectionError, UserListProjection};
use crate::services::store::{CreateOutcome, InsertOutcome, MatchStore, StorageError, SwipeStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|_| StorageError::Unavailable("in-memory store lock poisoned".to_string()))
}

/// Swipe store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemorySwipeStore {
    swipes: Mutex<HashMap<(String, String), Swipe>>,
}

impl MemorySwipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored swipes
    pub fn len(&self) -> usize {
        self.swipes.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SwipeStore for MemorySwipeStore {
    async fn find(&self, swiper_id: &str, target_id: &str) -> Result<Option<Swipe>, StorageError> {
        let swipes = lock(&self.swipes)?;
        Ok(swipes
            .get(&(swiper_id.to_string(), target_id.to_string()))
            .cloned())
    }

    async fn insert_if_absent(&self, swipe: &Swipe) -> Result<InsertOutcome, StorageError> {
        use std::collections::hash_map::Entry;

        let mut swipes = lock(&self.swipes)?;
        match swipes.entry((swipe.swiper_id.clone(), swipe.target_id.clone())) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(swipe.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}

/// Match store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    matches: Mutex<HashMap<MatchKey, Match>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored matches
    pub fn len(&self) -> usize {
        self.matches.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn exists(&self, key: &MatchKey) -> Result<bool, StorageError> {
        Ok(lock(&self.matches)?.contains_key(key))
    }

    async fn create_if_absent(
        &self,
        key: &MatchKey,
        member_low: &str,
        member_high: &str,
    ) -> Result<CreateOutcome, StorageError> {
        use std::collections::hash_map::Entry;

        let mut matches = lock(&self.matches)?;
        match matches.entry(key.clone()) {
            Entry::Occupied(_) => Ok(CreateOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(Match {
                    match_key: key.clone(),
                    member_low: member_low.to_string(),
                    member_high: member_high.to_string(),
                    created_at: chrono::Utc::now(),
                    last_message_at: None,
                    last_message_summary: None,
                });
                Ok(CreateOutcome::Created)
            }
        }
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<Match>, StorageError> {
        Ok(lock(&self.matches)?.get(key).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Match>, StorageError> {
        let matches = lock(&self.matches)?;
        let mut found: Vec<Match> = matches
            .values()
            .filter(|m| m.member_low == user_id || m.member_high == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn record_last_message(
        &self,
        key: &MatchKey,
        at: chrono::DateTime<chrono::Utc>,
        summary: &str,
    ) -> Result<bool, StorageError> {
        let mut matches = lock(&self.matches)?;
        let Some(m) = matches.get_mut(key) else {
            return Ok(false);
        };

        if m.last_message_at.map_or(true, |current| current <= at) {
            m.last_message_at = Some(at);
            m.last_message_summary = Some(summary.to_string());
        }
        Ok(true)
    }
}

#[derive(Debug, Default)]
struct UserLists {
    swiped_targets: BTreeSet<String>,
    matched_peers: BTreeSet<String>,
}

/// User list projection kept in process memory
#[derive(Debug, Default)]
pub struct MemoryUserLists {
    users: Mutex<HashMap<String, UserLists>>,
}

impl MemoryUserLists {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_user<R>(
        &self,
        user_id: &str,
        f: impl FnOnce(&mut UserLists) -> R,
    ) -> Result<R, ProjectionError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| ProjectionError::Unavailable("user list lock poisoned".to_string()))?;
        Ok(f(users.entry(user_id.to_string()).or_default()))
    }
}

#[async_trait]
impl UserListProjection for MemoryUserLists {
    async fn add_swiped_target(&self, user_id: &str, target_id: &str) -> Result<(), ProjectionError> {
        self.with_user(user_id, |lists| {
            lists.swiped_targets.insert(target_id.to_string());
        })
    }

    async fn add_matched_peer(&self, user_id: &str, peer_id: &str) -> Result<(), ProjectionError> {
        self.with_user(user_id, |lists| {
            lists.matched_peers.insert(peer_id.to_string());
        })
    }

    async fn swiped_targets(&self, user_id: &str) -> Result<Vec<String>, ProjectionError> {
        self.with_user(user_id, |lists| lists.swiped_targets.iter().cloned().collect())
    }

    async fn matched_peers(&self, user_id: &str) -> Result<Vec<String>, ProjectionError> {
        self.with_user(user_id, |lists| lists.matched_peers.iter().cloned().collect())
    }
}
