use std::sync::Arc;

use crate::core::effects::{EffectQueue, EffectStatsSnapshot, SideEffect};
use crate::core::error::SwipeError;
use crate::core::match_key::{canonical_pair, derive_key};
use crate::core::validator::{validate, validate_pair};
use crate::models::{MatchKey, Swipe, SwipeOutcome};
use crate::services::store::{CreateOutcome, InsertOutcome, MatchStore, StorageError, SwipeStore};

/// Records swipes and detects mutual likes
///
/// # Flow
/// 1. Validate the request
/// 2. Reject a repeated swipe on the same ordered pair
/// 3. Insert the swipe (compare-and-set)
/// 4. For likes, look up the reciprocal swipe
/// 5. On a reciprocal like, create the match (compare-and-set)
/// 6. Hand list updates and the notification to the side-effect queue
///
/// The engine holds no locks. Steps 3 and 5 are the only writes and both
/// are atomic in the store, so concurrent mutual swipes create one match.
#[derive(Clone)]
pub struct SwipeMatchEngine {
    swipes: Arc<dyn SwipeStore>,
    matches: Arc<dyn MatchStore>,
    effects: EffectQueue,
}

impl SwipeMatchEngine {
    pub fn new(swipes: Arc<dyn SwipeStore>, matches: Arc<dyn MatchStore>, effects: EffectQueue) -> Self {
        Self {
            swipes,
            matches,
            effects,
        }
    }

    /// Record `swiper_id`'s swipe on `target_id`
    ///
    /// Swipe and match records are committed before this returns. List
    /// updates and the notification happen later on the side-effect worker.
    pub async fn record_swipe(
        &self,
        swiper_id: &str,
        target_id: &str,
        kind: &str,
    ) -> Result<SwipeOutcome, SwipeError> {
        let kind = validate(swiper_id, target_id, kind)?;

        if self.swipes.find(swiper_id, target_id).await?.is_some() {
            tracing::debug!("Duplicate swipe {} -> {}", swiper_id, target_id);
            return Err(duplicate(swiper_id, target_id));
        }

        let swipe = Swipe::new(swiper_id, target_id, kind);
        if self.swipes.insert_if_absent(&swipe).await? == InsertOutcome::AlreadyExists {
            tracing::debug!("Concurrent duplicate swipe {} -> {}", swiper_id, target_id);
            return Err(duplicate(swiper_id, target_id));
        }

        tracing::info!("Recorded swipe {} -> {} ({})", swiper_id, target_id, kind);

        self.effects.submit(SideEffect::SwipeRecorded {
            swiper_id: swiper_id.to_string(),
            target_id: target_id.to_string(),
        });

        if !kind.is_like() {
            return Ok(SwipeOutcome::unmatched());
        }

        self.detect_match(swiper_id, target_id).await
    }

    /// Counters for the side-effect queue shared by every clone of this engine
    pub fn effect_stats(&self) -> EffectStatsSnapshot {
        self.effects.stats()
    }

    /// Re-run match detection for a swipe that is already recorded
    ///
    /// Use after [`SwipeError::MatchCreation`]: retrying `record_swipe`
    /// would stop at the duplicate check. Returns `matched: false` when
    /// the swipe is missing or is not a like.
    pub async fn reconcile_pair(&self, swiper_id: &str, target_id: &str) -> Result<SwipeOutcome, SwipeError> {
        validate_pair(swiper_id, target_id)?;

        match self.swipes.find(swiper_id, target_id).await? {
            Some(swipe) if swipe.kind.is_like() => self.detect_match(swiper_id, target_id).await,
            _ => Ok(SwipeOutcome::unmatched()),
        }
    }

    async fn detect_match(&self, swiper_id: &str, target_id: &str) -> Result<SwipeOutcome, SwipeError> {
        let match_key = derive_key(swiper_id, target_id);

        let reciprocal = self
            .swipes
            .find(target_id, swiper_id)
            .await
            .map_err(|source| SwipeError::MatchCreation {
                match_key: match_key.clone(),
                source,
            })?;

        if !reciprocal.is_some_and(|s| s.kind.is_like()) {
            return Ok(SwipeOutcome::unmatched());
        }

        let (low, high) = canonical_pair(swiper_id, target_id);
        let created = match self.matches.create_if_absent(&match_key, low, high).await {
            Ok(outcome) => outcome,
            Err(source) => {
                tracing::error!("Failed to create match {}: {}", match_key, source);
                return Err(SwipeError::MatchCreation { match_key, source });
            }
        };

        match created {
            CreateOutcome::Created => {
                tracing::info!("Match created: {}", match_key);
                self.effects.submit(SideEffect::MatchCreated {
                    match_key: match_key.clone(),
                    swiper_id: swiper_id.to_string(),
                    target_id: target_id.to_string(),
                });
            }
            CreateOutcome::AlreadyExists => {
                tracing::debug!("Match {} already exists", match_key);
                self.check_members(&match_key, low, high).await?;
            }
        }

        Ok(SwipeOutcome::matched(match_key))
    }

    /// Confirm an existing match under `match_key` is the one for `(low, high)`
    async fn check_members(&self, match_key: &MatchKey, low: &str, high: &str) -> Result<(), SwipeError> {
        let existing = self
            .matches
            .get(match_key)
            .await
            .map_err(|source| SwipeError::MatchCreation {
                match_key: match_key.clone(),
                source,
            })?;

        match existing {
            Some(m) if m.member_low == low && m.member_high == high => Ok(()),
            Some(m) => {
                tracing::error!(
                    "Match {} is held by {} / {}, not {} / {}",
                    match_key,
                    m.member_low,
                    m.member_high,
                    low,
                    high
                );
                Err(SwipeError::KeyCollision {
                    match_key: match_key.clone(),
                    existing_low: m.member_low,
                    existing_high: m.member_high,
                })
            }
            None => Err(SwipeError::MatchCreation {
                match_key: match_key.clone(),
                source: StorageError::Corrupt(format!("match {} reported present but not found", match_key)),
            }),
        }
    }
}

fn duplicate(swiper_id: &str, target_id: &str) -> SwipeError {
    SwipeError::Duplicate {
        swiper: swiper_id.to_string(),
        target: target_id.to_string(),
    }
}
