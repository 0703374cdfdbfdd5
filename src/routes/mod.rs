// Route exports
pub mod matches;
pub mod swipes;

use actix_web::web;
use std::sync::Arc;

use crate::core::SwipeMatchEngine;
use crate::services::{CacheManager, MatchStore, PostgresClient, UserListProjection};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: SwipeMatchEngine,
    pub matches: Arc<dyn MatchStore>,
    pub projection: Arc<dyn UserListProjection>,
    /// Probed by the health endpoint when present
    pub postgres: Option<Arc<PostgresClient>>,
    pub cache: Option<Arc<CacheManager>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(swipes::configure)
            .configure(matches::configure),
    );
}
