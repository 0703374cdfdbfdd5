//! Lume Swipe - swipe recording and mutual match detection for Lume dating app
//!
//! A swipe is recorded at most once per ordered pair of users. When the
//! second of two reciprocal likes arrives, a match keyed by the canonical
//! pair id is created exactly once and the other user is notified on a
//! background task.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{derive_key, SwipeError, SwipeMatchEngine, ValidationError};
pub use models::{Match, MatchKey, Swipe, SwipeKind, SwipeOutcome};
