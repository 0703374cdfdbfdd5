//! Best-effort side effects of recording swipes and creating matches.
//!
//! The engine hands effects to a bounded queue and returns; a background
//! worker applies them. Nothing here can change the result of a swipe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::MatchKey;
use crate::services::collaborators::{NotificationDispatcher, ProfileDirectory, UserListProjection};

/// Name shown in a match notification when the profile lookup fails
pub const FALLBACK_DISPLAY_NAME: &str = "Someone";

/// Work queued for the side-effect worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// A swipe was newly recorded
    SwipeRecorded { swiper_id: String, target_id: String },
    /// A match was newly created by `swiper_id`'s swipe. `target_id` swiped
    /// earlier and is the one notified.
    MatchCreated {
        match_key: MatchKey,
        swiper_id: String,
        target_id: String,
    },
}

/// Counters describing what happened to queued effects
#[derive(Debug, Default)]
pub struct EffectStats {
    dropped: AtomicU64,
    notifications_sent: AtomicU64,
    notification_failures: AtomicU64,
    projection_failures: AtomicU64,
}

/// Point-in-time copy of [`EffectStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EffectStatsSnapshot {
    pub dropped: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub projection_failures: u64,
}

impl EffectStats {
    pub fn snapshot(&self) -> EffectStatsSnapshot {
        EffectStatsSnapshot {
            dropped: self.dropped.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            projection_failures: self.projection_failures.load(Ordering::Relaxed),
        }
    }
}

/// Sending half of the side-effect queue
#[derive(Debug, Clone)]
pub struct EffectQueue {
    tx: mpsc::Sender<SideEffect>,
    stats: Arc<EffectStats>,
}

impl EffectQueue {
    /// Create a queue holding at most `capacity` pending effects
    pub fn channel(capacity: usize) -> (Self, EffectReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let stats = Arc::new(EffectStats::default());
        (
            Self {
                tx,
                stats: stats.clone(),
            },
            EffectReceiver { rx, stats },
        )
    }

    /// Enqueue without waiting. A full or closed queue drops the effect.
    pub fn submit(&self, effect: SideEffect) {
        match self.tx.try_send(effect) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(effect)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Side-effect queue full, dropping {:?}", effect);
            }
            Err(mpsc::error::TrySendError::Closed(effect)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Side-effect worker stopped, dropping {:?}", effect);
            }
        }
    }

    pub fn stats(&self) -> EffectStatsSnapshot {
        self.stats.snapshot()
    }

    /// Shared counters that outlive the queue handle
    pub fn stats_handle(&self) -> Arc<EffectStats> {
        self.stats.clone()
    }
}

/// Receiving half of the side-effect queue
#[derive(Debug)]
pub struct EffectReceiver {
    rx: mpsc::Receiver<SideEffect>,
    stats: Arc<EffectStats>,
}

#[cfg(test)]
impl EffectReceiver {
    pub(crate) fn try_recv(&mut self) -> Option<SideEffect> {
        self.rx.try_recv().ok()
    }
}

/// Applies queued effects against the external collaborators
pub struct EffectWorker {
    queue: EffectReceiver,
    projection: Arc<dyn UserListProjection>,
    profiles: Arc<dyn ProfileDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl EffectWorker {
    pub fn new(
        queue: EffectReceiver,
        projection: Arc<dyn UserListProjection>,
        profiles: Arc<dyn ProfileDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            queue,
            projection,
            profiles,
            notifier,
        }
    }

    /// Run on the current tokio runtime until every [`EffectQueue`] is dropped
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        tracing::info!("Side-effect worker started");
        while let Some(effect) = self.queue.rx.recv().await {
            self.apply(effect).await;
        }
        tracing::info!("Side-effect worker stopped");
    }

    async fn apply(&self, effect: SideEffect) {
        let effect_id = Uuid::new_v4();
        match effect {
            SideEffect::SwipeRecorded {
                swiper_id,
                target_id,
            } => {
                if let Err(e) = self.projection.add_swiped_target(&swiper_id, &target_id).await {
                    self.queue.stats.projection_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        "[{}] Failed to add {} to swiped targets of {}: {}",
                        effect_id,
                        target_id,
                        swiper_id,
                        e
                    );
                }
            }
            SideEffect::MatchCreated {
                match_key,
                swiper_id,
                target_id,
            } => {
                for (user, peer) in [(&swiper_id, &target_id), (&target_id, &swiper_id)] {
                    if let Err(e) = self.projection.add_matched_peer(user, peer).await {
                        self.queue.stats.projection_failures.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            "[{}] Failed to add {} to matched peers of {}: {}",
                            effect_id,
                            peer,
                            user,
                            e
                        );
                    }
                }

                let display_name = match self.profiles.display_name(&swiper_id).await {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!(
                            "[{}] Display name lookup failed for {}: {}",
                            effect_id,
                            swiper_id,
                            e
                        );
                        FALLBACK_DISPLAY_NAME.to_string()
                    }
                };

                match self.notifier.notify_match(&target_id, &display_name).await {
                    Ok(()) => {
                        self.queue.stats.notifications_sent.fetch_add(1, Ordering::Relaxed);
                        tracing::debug!(
                            "[{}] Requested match notification for {} ({})",
                            effect_id,
                            target_id,
                            match_key
                        );
                    }
                    Err(e) => {
                        self.queue.stats.notification_failures.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(
                            "[{}] Match notification for {} ({}) failed: {}",
                            effect_id,
                            target_id,
                            match_key,
                            e
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::match_key::derive_key;
    use crate::services::collaborators::{NotificationError, ProfileError};
    use crate::services::MemoryUserLists;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingNotifier {
        async fn notify_match(&self, recipient: &str, other: &str) -> Result<(), NotificationError> {
            self.sent.lock().unwrap().push((recipient.to_string(), other.to_string()));
            Ok(())
        }
    }

    struct NoProfiles;

    #[async_trait]
    impl ProfileDirectory for NoProfiles {
        async fn display_name(&self, user_id: &str) -> Result<String, ProfileError> {
            Err(ProfileError::NotFound(user_id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_match_effect_updates_both_lists_and_notifies_target() {
        let (queue, rx) = EffectQueue::channel(8);
        let lists = Arc::new(MemoryUserLists::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let worker = EffectWorker::new(rx, lists.clone(), Arc::new(NoProfiles), notifier.clone()).spawn();

        queue.submit(SideEffect::MatchCreated {
            match_key: derive_key("u1", "u2"),
            swiper_id: "u2".to_string(),
            target_id: "u1".to_string(),
        });
        let stats = queue.stats_handle();
        drop(queue);
        worker.await.unwrap();

        assert_eq!(lists.matched_peers("u1").await.unwrap(), vec!["u2"]);
        assert_eq!(lists.matched_peers("u2").await.unwrap(), vec!["u1"]);
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec![("u1".to_string(), FALLBACK_DISPLAY_NAME.to_string())]
        );
        assert_eq!(stats.snapshot().notifications_sent, 1);
    }

    #[tokio::test]
    async fn test_full_queue_drops_effect() {
        let (queue, _rx) = EffectQueue::channel(1);
        let effect = SideEffect::SwipeRecorded {
            swiper_id: "a".to_string(),
            target_id: "b".to_string(),
        };

        queue.submit(effect.clone());
        queue.submit(effect);

        assert_eq!(queue.stats().dropped, 1);
    }
}
