// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Match, MatchKey, Swipe, SwipeKind, SwipeOutcome, UnknownSwipeKind};
pub use requests::{LastMessageRequest, ListMatchesQuery, ReconcileRequest, RecordSwipeRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchesResponse, RecordSwipeResponse, UserListsResponse};
