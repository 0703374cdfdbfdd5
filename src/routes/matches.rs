use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, LastMessageRequest, ListMatchesQuery, MatchKey, MatchesResponse, UserListsResponse};
use crate::routes::AppState;

/// Configure match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/matches", web::get().to(list_matches))
        .route("/matches/{match_id}", web::get().to(get_match))
        .route("/matches/{match_id}/last-message", web::put().to(record_last_message))
        .route("/users/{user_id}/lists", web::get().to(get_user_lists));
}

fn error(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn storage_failure(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    error(
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
        context,
        e.to_string(),
    )
}

/// List a user's matches
///
/// GET /api/v1/matches?userId={userId}
async fn list_matches(state: web::Data<AppState>, query: web::Query<ListMatchesQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    match state.matches.list_for_user(&query.user_id).await {
        Ok(matches) => HttpResponse::Ok().json(MatchesResponse {
            user_id: query.user_id.clone(),
            count: matches.len(),
            matches,
        }),
        Err(e) => storage_failure("Failed to list matches", e),
    }
}

/// GET /api/v1/matches/{matchId}
async fn get_match(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let key = MatchKey::from_raw(path.into_inner());

    match state.matches.get(&key).await {
        Ok(Some(m)) => HttpResponse::Ok().json(m),
        Ok(None) => error(
            actix_web::http::StatusCode::NOT_FOUND,
            "Match not found",
            format!("No match with id {}", key),
        ),
        Err(e) => storage_failure("Failed to fetch match", e),
    }
}

/// Update the last message preview on a match
///
/// PUT /api/v1/matches/{matchId}/last-message
async fn record_last_message(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<LastMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let key = MatchKey::from_raw(path.into_inner());
    let at = req.at.unwrap_or_else(chrono::Utc::now);

    match state.matches.record_last_message(&key, at, &req.summary).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => error(
            actix_web::http::StatusCode::NOT_FOUND,
            "Match not found",
            format!("No match with id {}", key),
        ),
        Err(e) => storage_failure("Failed to update last message", e),
    }
}

/// Denormalized swiped/matched lists for a user
///
/// GET /api/v1/users/{userId}/lists
async fn get_user_lists(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    let swiped_targets = match state.projection.swiped_targets(&user_id).await {
        Ok(ids) => ids,
        Err(e) => return storage_failure("Failed to read swiped targets", e),
    };
    let matched_peers = match state.projection.matched_peers(&user_id).await {
        Ok(ids) => ids,
        Err(e) => return storage_failure("Failed to read matched peers", e),
    };

    HttpResponse::Ok().json(UserListsResponse {
        user_id,
        swiped_targets,
        matched_peers,
    })
}
