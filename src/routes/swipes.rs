use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::core::SwipeError;
use crate::models::{HealthResponse, ReconcileRequest, RecordSwipeRequest, RecordSwipeResponse, SwipeOutcome};
use crate::routes::AppState;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/swipes", web::post().to(record_swipe))
        .route("/swipes/reconcile", web::post().to(reconcile_swipe));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = match &state.postgres {
        Some(pg) => pg.health_check().await.unwrap_or(false),
        None => true,
    };
    let cache_healthy = match &state.cache {
        Some(cache) => cache.health_check().await,
        None => true,
    };

    let status = if pg_healthy && cache_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        effects: state.engine.effect_stats(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}

/// Record a swipe
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// { "userId": "string", "targetUserId": "string", "kind": "like" }
/// ```
async fn record_swipe(state: web::Data<AppState>, req: web::Json<RecordSwipeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for record_swipe request: {}", errors);
        return HttpResponse::BadRequest().json(RecordSwipeResponse::failure(errors.to_string()));
    }

    let result = state
        .engine
        .record_swipe(&req.user_id, &req.target_user_id, &req.kind)
        .await;

    swipe_response(result)
}

/// Re-run match detection for a recorded swipe
///
/// POST /api/v1/swipes/reconcile
async fn reconcile_swipe(state: web::Data<AppState>, req: web::Json<ReconcileRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(RecordSwipeResponse::failure(errors.to_string()));
    }

    let result = state
        .engine
        .reconcile_pair(&req.user_id, &req.target_user_id)
        .await;

    swipe_response(result)
}

fn swipe_response(result: Result<SwipeOutcome, SwipeError>) -> HttpResponse {
    let err = match result {
        Ok(outcome) => return HttpResponse::Ok().json(RecordSwipeResponse::from(outcome)),
        Err(err) => err,
    };

    let status = match &err {
        SwipeError::Invalid(_) => StatusCode::BAD_REQUEST,
        SwipeError::Duplicate { .. } => StatusCode::CONFLICT,
        SwipeError::Storage(e) => {
            tracing::error!("Failed to record swipe: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
        SwipeError::MatchCreation { match_key, source } => {
            tracing::error!("Swipe recorded but match {} failed: {}", match_key, source);
            StatusCode::SERVICE_UNAVAILABLE
        }
        SwipeError::KeyCollision { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    HttpResponse::build(status).json(RecordSwipeResponse::failure(err.to_string()))
}
